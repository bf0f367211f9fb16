use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use amica_core::user::Principal;

use crate::{error::AppError, state::AppState};

use super::credentials::authenticate;
use super::jwt::encode_jwt;
use super::middleware::SESSION_COOKIE;

// ---------------------------------------------------------------------------
// POST /api/auth/login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login`: Login with email and password.
///
/// Rate limited: 5 failed attempts per 15 min per IP. Unknown email and wrong
/// password produce the same 401 body.
pub async fn auth_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = extract_client_ip(&headers);

    let allowed = state
        .db
        .check_login_rate_limit(&client_ip)
        .await
        .map_err(AppError::Internal)?;
    if !allowed {
        warn!(ip = %client_ip, "Login rate limit reached");
        return Err(AppError::RateLimited);
    }

    let user = authenticate(state.db.as_ref(), &req.email, &req.password)
        .await
        .map_err(AppError::Internal)?;
    let Some(user) = user else {
        state
            .db
            .record_login_attempt(&client_ip, false)
            .await
            .map_err(AppError::Internal)?;
        info!(ip = %client_ip, "Login failed");
        return Err(AppError::Unauthorized);
    };

    state
        .db
        .record_login_attempt(&client_ip, true)
        .await
        .map_err(AppError::Internal)?;

    let principal = Principal::from(&user);
    let (token, expires_at) = encode_jwt(&state.jwt_secret, &principal, state.config.session_days)
        .map_err(AppError::Internal)?;
    info!(user_id = user.id, role = user.role.as_str(), "Login succeeded");

    let cookie = build_session_cookie(&token, state.config.https, state.config.session_days);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "data": { "user": user, "expires_at": expires_at } })),
    ))
}

// ---------------------------------------------------------------------------
// POST /api/auth/logout
// ---------------------------------------------------------------------------

/// `POST /api/auth/logout`: Clear session cookie. Always 200.
pub async fn auth_logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.config.https);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "data": { "ok": true } })),
    )
}

// ---------------------------------------------------------------------------
// GET /api/auth/session
// ---------------------------------------------------------------------------

/// `GET /api/auth/session`: The principal behind the current session.
pub async fn auth_session(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(json!({ "data": principal }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First `X-Forwarded-For` entry, or `"unknown"`.
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn build_session_cookie(token: &str, https: bool, session_days: u32) -> String {
    let secure = if https { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        u64::from(session_days) * 86_400,
        secure,
    )
}

fn clear_session_cookie(https: bool) -> String {
    let secure = if https { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
        SESSION_COOKIE, secure,
    )
}
