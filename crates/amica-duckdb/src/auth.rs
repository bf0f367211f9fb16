use anyhow::Result;

use crate::backend::rand_hex;
use crate::DuckDbBackend;

/// Failed logins allowed per IP inside [`LOGIN_WINDOW_MINUTES`].
pub const MAX_FAILED_LOGINS: i64 = 5;
pub const LOGIN_WINDOW_MINUTES: i64 = 15;

impl DuckDbBackend {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let result = conn
            .prepare("SELECT value FROM settings WHERE key = ?1")?
            .query_row(duckdb::params![key], |row| row.get::<_, String>(0))
            .ok();
        Ok(result)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            duckdb::params![key, value],
        )?;
        Ok(())
    }

    /// Ensure a JWT secret exists in settings. If not, generate one.
    /// Returns the JWT secret.
    pub async fn ensure_jwt_secret(&self) -> Result<String> {
        if let Some(secret) = self.get_setting("jwt_secret").await? {
            return Ok(secret);
        }
        let secret = rand_hex(32);
        self.set_setting("jwt_secret", &secret).await?;
        Ok(secret)
    }

    /// Record a login attempt for rate limiting.
    pub async fn record_login_attempt(&self, ip: &str, succeeded: bool) -> Result<()> {
        let id = rand_hex(5);
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO login_attempts (id, ip_address, attempted_at, succeeded) \
             VALUES (?1, ?2, CURRENT_TIMESTAMP, ?3)",
            duckdb::params![id, ip, succeeded],
        )?;
        Ok(())
    }

    /// Returns `true` if `ip` may attempt another login (fewer than
    /// [`MAX_FAILED_LOGINS`] failures in the last 15 minutes).
    pub async fn check_login_rate_limit(&self, ip: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare(
                "SELECT COUNT(*) FROM login_attempts \
                 WHERE ip_address = ?1 \
                 AND attempted_at > CAST(NOW() AS TIMESTAMP) - INTERVAL '15 minutes' \
                 AND succeeded = false",
            )?
            .query_row(duckdb::params![ip], |row| row.get(0))?;
        Ok(count < MAX_FAILED_LOGINS)
    }
}
