use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use amica_core::user::{Principal, Role};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Dashboard user id.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Encode a session token for `principal`.
///
/// Returns (token_string, expires_at_rfc3339).
pub fn encode_jwt(
    secret: &str,
    principal: &Principal,
    session_days: u32,
) -> Result<(String, String)> {
    let now = Utc::now();
    let exp = now + Duration::days(session_days as i64);

    let claims = Claims {
        sub: principal.user_id,
        email: principal.email.clone(),
        role: principal.role,
        tenant_id: principal.tenant_id.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("encode_jwt: {}", e))?;

    Ok((token, exp.to_rfc3339()))
}

/// Decode and validate a session token.
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| anyhow!("decode_jwt: {}", e))?;

    Ok(data.claims)
}
