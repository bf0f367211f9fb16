use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use amica_core::session::SessionFilter;
use amica_core::store::SessionStore;
use amica_core::user::Principal;

use crate::{error::AppError, state::AppState};

use super::{authorize_tenant, page_bounds, pagination, resolve_range};

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Exact `final_status` match; `all` or empty disables the filter.
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// `GET /api/tenants/:tenant_id/sessions`: Newest-first session list.
///
/// The date filter applies only when `date_from` or `date_to` is given.
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
    Query(query): Query<SessionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let (limit, offset) = page_bounds(query.limit, query.offset);

    let range = if query.date_from.is_some() || query.date_to.is_some() {
        Some(resolve_range(
            query.date_from.as_deref(),
            query.date_to.as_deref(),
        )?)
    } else {
        None
    };
    let status = query
        .status
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "all");

    let filter = SessionFilter {
        status,
        range,
        limit,
        offset,
    };
    let (sessions, total) = state
        .db
        .list_sessions(&tenant_id, &filter)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": sessions,
        "pagination": pagination(total, limit, offset),
    })))
}

/// `GET /api/tenants/:tenant_id/sessions/:session_id/messages`: Chat history,
/// oldest first. 404 when the session belongs to another tenant.
pub async fn session_messages(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;

    let messages = state
        .db
        .session_history(&tenant_id, &session_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    Ok(Json(json!({
        "data": {
            "session_id": session_id,
            "messages": messages,
        }
    })))
}
