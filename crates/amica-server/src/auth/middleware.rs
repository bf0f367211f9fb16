use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use amica_core::user::Principal;

use crate::{error::AppError, state::AppState};

use super::jwt::decode_jwt;

/// Name of the session cookie set by `POST /api/auth/login`.
pub const SESSION_COOKIE: &str = "amica_session";

/// Session token from the `amica_session` cookie, or failing that from an
/// `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str.split(';').find_map(|c| {
                c.trim()
                    .strip_prefix(SESSION_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
            })
        });
    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    })
}

/// Resolve the request's principal, if it carries a valid session token.
///
/// The token only names the user. Role and tenant come from the stored row,
/// so a deleted or deactivated user loses access immediately.
pub async fn authenticated_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> anyhow::Result<Option<Principal>> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };
    let Ok(claims) = decode_jwt(&token, &state.jwt_secret) else {
        return Ok(None);
    };
    let user = state.db.get_user_by_id(claims.sub).await?;
    Ok(user.filter(|u| u.active).map(|u| Principal::from(&u)))
}

/// Require a valid session. On success the [`Principal`] is inserted into the
/// request extensions for handlers to extract with `Extension<Principal>`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticated_principal(&state, request.headers()).await {
        Ok(Some(principal)) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Ok(None) => unauthorized_response(),
        Err(e) => AppError::Internal(e).into_response(),
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": {
                "code": "unauthorized",
                "message": "Not authenticated",
                "field": null
            }
        })),
    )
        .into_response()
}
