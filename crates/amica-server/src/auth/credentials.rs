use anyhow::Result;
use tracing::debug;

use amica_core::store::UserStore;
use amica_core::user::{normalize_email, User};

use super::password::verify_password;

/// Check an email/password pair against the user store.
///
/// Returns `Ok(None)` for every kind of rejection (unknown email, empty
/// stored hash, inactive account, wrong password) so callers cannot tell
/// them apart. `Err` is reserved for store failures.
pub async fn authenticate(store: &dyn UserStore, email: &str, password: &str) -> Result<Option<User>> {
    let email = normalize_email(email);
    let password = password.trim();

    let Some(record) = store.lookup_user_by_email(&email).await? else {
        debug!("login rejected: unknown email");
        return Ok(None);
    };
    if record.password_hash.is_empty() {
        debug!(user_id = record.user.id, "login rejected: no password set");
        return Ok(None);
    }
    if !record.user.active {
        debug!(user_id = record.user.id, "login rejected: inactive user");
        return Ok(None);
    }
    if !verify_password(password, &record.password_hash) {
        debug!(user_id = record.user.id, "login rejected: bad password");
        return Ok(None);
    }
    Ok(Some(record.user))
}
