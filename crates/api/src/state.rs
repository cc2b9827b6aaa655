use std::sync::Arc;

use ludex_ingest::Ingestor;
use ludex_steam::client::StorefrontClient;
use ludex_store::CatalogStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Catalog store (index + manifests).
    pub store: Arc<CatalogStore>,
    /// Storefront metadata client.
    pub steam: Arc<StorefrontClient>,
    /// Ingestion orchestrator.
    pub ingestor: Arc<Ingestor>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
