use anyhow::{anyhow, Result};
use tracing::{info, warn};

use amica_core::config::BootstrapAdmin;
use amica_core::store::UserStore;
use amica_core::user::{validate_new_user, NewUserRecord, Role};

use crate::auth::password::{hash_password, validate_password_strength};

/// Create the first super admin from `AMICA_BOOTSTRAP_*` when the user table
/// is empty. Returns `true` if a user was created.
///
/// Once any user exists the credentials are ignored, so leaving them in the
/// environment cannot reset an account.
pub async fn ensure_bootstrap_admin(
    users: &dyn UserStore,
    admin: Option<&BootstrapAdmin>,
    argon2_memory_kb: u32,
) -> Result<bool> {
    let existing = users.count_users().await?;
    let Some(admin) = admin else {
        if existing == 0 {
            warn!("No dashboard users exist; set AMICA_BOOTSTRAP_EMAIL and AMICA_BOOTSTRAP_PASSWORD to create one");
        }
        return Ok(false);
    };
    if existing > 0 {
        return Ok(false);
    }

    let (email, _) = validate_new_user(&admin.email, Some("Admin"), Role::SuperAdmin, None)?;
    let password = admin.password.trim();
    validate_password_strength(password).map_err(|e| anyhow!("AMICA_BOOTSTRAP_PASSWORD: {e}"))?;

    let created = users
        .create_user(NewUserRecord {
            email,
            password_hash: hash_password(password, argon2_memory_kb)?,
            role: Role::SuperAdmin,
            tenant_id: None,
            first_name: Some("Admin".to_string()),
            last_name: None,
        })
        .await?;
    match created {
        Some(user) => {
            info!(user_id = user.id, email = %user.email, "Bootstrap super admin created");
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use amica_duckdb::DuckDbBackend;

    use super::*;

    fn admin(password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            email: " Root@Salon.com ".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn creates_super_admin_only_once() {
        let db = DuckDbBackend::open_in_memory().expect("db");
        let creds = admin("bootstrap-password-1");
        assert!(ensure_bootstrap_admin(&db, Some(&creds), 4096).await.expect("bootstrap"));
        assert!(!ensure_bootstrap_admin(&db, Some(&creds), 4096).await.expect("bootstrap"));

        let users = db.list_users().await.expect("list");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "root@salon.com");
        assert_eq!(users[0].role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn weak_bootstrap_password_is_an_error() {
        let db = DuckDbBackend::open_in_memory().expect("db");
        assert!(ensure_bootstrap_admin(&db, Some(&admin("short")), 4096).await.is_err());
        assert_eq!(db.count_users().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn nothing_to_do_without_credentials() {
        let db = DuckDbBackend::open_in_memory().expect("db");
        assert!(!ensure_bootstrap_admin(&db, None, 4096).await.expect("bootstrap"));
    }
}
