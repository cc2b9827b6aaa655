use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ludex_api::config::ServerConfig;
use ludex_api::router::build_app_router;
use ludex_api::state::AppState;
use ludex_ingest::Ingestor;
use ludex_steam::client::StorefrontClient;
use ludex_steam::fetch::AssetFetcher;
use ludex_store::CatalogStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ludex_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, data_dir = %config.data_dir.display(), "Loaded server configuration");

    // --- Catalog store ---
    let store = Arc::new(
        CatalogStore::open(&config.data_dir)
            .await
            .expect("Failed to open the catalog store"),
    );
    tracing::info!("Catalog store opened");

    // Surface any drift between the index and the on-disk folders at
    // startup; drift is logged, not fatal.
    match store.reconcile().await {
        Ok(drift) if drift.is_empty() => {}
        Ok(drift) => tracing::warn!(count = drift.len(), ?drift, "Catalog drift detected"),
        Err(e) => tracing::error!(error = %e, "Catalog reconciliation failed"),
    }

    // --- Storefront client + asset fetcher ---
    let fetch_timeout = Duration::from_secs(config.fetch_timeout_secs);
    let steam = Arc::new(
        StorefrontClient::new(&config.steam_api_url, fetch_timeout)
            .expect("Failed to build the storefront client"),
    );
    let fetcher =
        Arc::new(AssetFetcher::new(fetch_timeout).expect("Failed to build the asset fetcher"));

    // --- Ingestor ---
    let ingestor = Arc::new(Ingestor::new(
        Arc::clone(&store),
        Arc::clone(&steam),
        fetcher,
    ));

    // --- App state + router ---
    let state = AppState {
        store,
        steam,
        ingestor,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
