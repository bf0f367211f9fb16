#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub duckdb_memory_limit: String,
    /// JWT signing secret from `AMICA_APP_SECRET`. When unset the server
    /// generates one and persists it in the `settings` table.
    pub app_secret: Option<String>,
    pub https: bool,
    pub session_days: u32,
    /// Argon2 memory cost in KB for newly hashed passwords.
    pub argon2_memory_kb: u32,
    pub debug: bool,
    pub metrics_collector: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the first super admin, created only when no dashboard
/// user exists yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: std::env::var("AMICA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("AMICA_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("AMICA_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            duckdb_memory_limit: std::env::var("AMICA_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            app_secret: std::env::var("AMICA_APP_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            https: env_flag("AMICA_HTTPS", true),
            session_days: std::env::var("AMICA_SESSION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            argon2_memory_kb: std::env::var("AMICA_ARGON2_MEMORY_KB")
                .unwrap_or_else(|_| "65536".to_string())
                .parse()
                .unwrap_or(65536),
            debug: env_flag("AMICA_DEBUG", false),
            metrics_collector: env_flag("AMICA_METRICS_COLLECTOR", true),
            bootstrap_admin: {
                let email = std::env::var("AMICA_BOOTSTRAP_EMAIL").ok();
                let password = std::env::var("AMICA_BOOTSTRAP_PASSWORD").ok();
                match (email, password) {
                    (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
                    (None, None) => None,
                    _ => {
                        return Err(
                            "AMICA_BOOTSTRAP_EMAIL and AMICA_BOOTSTRAP_PASSWORD must be set together"
                                .to_string(),
                        )
                    }
                }
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
