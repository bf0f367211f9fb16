use std::sync::Arc;

use amica_core::config::Config;
use amica_duckdb::DuckDbBackend;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// The DuckDB backend, shared by every request. Handlers pass
    /// `state.db.as_ref()` to code that expects a store trait object.
    pub db: Arc<DuckDbBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Signing secret for session tokens: `AMICA_APP_SECRET`, or the value
    /// persisted in the `settings` table.
    pub jwt_secret: String,
}

impl AppState {
    /// Construct a new `AppState` wrapping the given backend and config.
    pub fn new(db: DuckDbBackend, config: Config, jwt_secret: String) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            jwt_secret,
        }
    }

    /// Resolve the JWT secret (env first, then the database) and build the
    /// state.
    pub async fn init(db: DuckDbBackend, config: Config) -> anyhow::Result<Self> {
        let jwt_secret = match config.app_secret.clone() {
            Some(secret) => secret,
            None => db.ensure_jwt_secret().await?,
        };
        Ok(Self::new(db, config, jwt_secret))
    }
}
