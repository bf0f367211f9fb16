use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Minimum length, in characters, of a new dashboard password.
pub const MIN_PASSWORD_CHARS: usize = 12;

/// Hash a password with Argon2id and a fresh random salt.
///
/// `m_cost` is the memory cost in KB (`AMICA_ARGON2_MEMORY_KB`, default 65536).
pub fn hash_password(password: &str, m_cost: u32) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let params =
        Params::new(m_cost, 3, 1, Some(32)).map_err(|e| anyhow!("argon2 params: {}", e))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash_password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// An empty, corrupt or foreign-format hash is a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(anyhow!("password cannot be empty or whitespace-only"));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(anyhow!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_whitespace_only_password() {
        assert!(validate_password_strength("            ").is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_password_strength("short").is_err());
    }

    #[test]
    fn accepts_valid_password() {
        assert!(validate_password_strength("strong_password_123").is_ok());
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse battery", 4096).expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong horse battery", &hash));
    }

    #[test]
    fn same_password_gets_a_new_salt() {
        let a = hash_password("correct horse battery", 4096).expect("hash");
        let b = hash_password("correct horse battery", 4096).expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_fails_without_panicking() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", "$2b$12$bcryptlookingvalue"));
    }
}
