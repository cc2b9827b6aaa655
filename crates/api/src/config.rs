use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`; `*`
    /// enables permissive CORS (the default — the portal serves its own
    /// frontend and the API is same-origin in practice).
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root of the data directory holding `games.json` and `games/`
    /// (default: `public`).
    pub data_dir: PathBuf,
    /// Base URL of the storefront metadata API.
    pub steam_api_url: String,
    /// Timeout for a single outbound asset/metadata fetch, in seconds
    /// (default: `120`; a timed-out asset settles as an ordinary failure).
    pub fetch_timeout_secs: u64,
    /// Maximum accepted upload size in bytes (default: 5 GiB).
    pub max_upload_bytes: usize,
}

/// Default storefront endpoint (appdetails-style envelope).
const DEFAULT_STEAM_API_URL: &str = "https://store.steampowered.com/api/appdetails";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                         |
    /// |----------------------|-------------------------------------------------|
    /// | `HOST`               | `0.0.0.0`                                       |
    /// | `PORT`               | `3000`                                          |
    /// | `CORS_ORIGINS`       | `*`                                             |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                          |
    /// | `DATA_DIR`           | `public`                                        |
    /// | `STEAM_API_URL`      | `https://store.steampowered.com/api/appdetails` |
    /// | `FETCH_TIMEOUT_SECS` | `120`                                           |
    /// | `MAX_UPLOAD_BYTES`   | `5368709120` (5 GiB)                            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "public".into()));

        let steam_api_url =
            std::env::var("STEAM_API_URL").unwrap_or_else(|_| DEFAULT_STEAM_API_URL.into());

        let fetch_timeout_secs: u64 = std::env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("FETCH_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (5usize * 1024 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_dir,
            steam_api_url,
            fetch_timeout_secs,
            max_upload_bytes,
        }
    }
}
