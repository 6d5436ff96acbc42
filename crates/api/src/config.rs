use crate::auth::jwt::JwtConfig;

/// Which document store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store; data is gone on restart. Good for development.
    Memory,
    /// Postgres-backed store. The binary reads `DATABASE_URL` when selected.
    Postgres,
}

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
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Document store backing the API (default: `memory`).
    pub store_backend: StoreBackend,
    /// Whether simulated photo-request responses are written back to the
    /// store (default: `true`). When off, a response is returned to the
    /// caller but the stored request keeps its previous state.
    pub persist_photo_responses: bool,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `STORE_BACKEND`           | `memory`                   |
    /// | `PERSIST_PHOTO_RESPONSES` | `true`                     |
    ///
    /// `DATABASE_URL` has no default; the binary requires it when
    /// `STORE_BACKEND=postgres`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres,
            other => panic!("STORE_BACKEND must be 'memory' or 'postgres', got '{other}'"),
        };

        let persist_photo_responses: bool = std::env::var("PERSIST_PHOTO_RESPONSES")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("PERSIST_PHOTO_RESPONSES must be 'true' or 'false'");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            persist_photo_responses,
            jwt,
        }
    }
}
