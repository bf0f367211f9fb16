use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use amica_core::range::parse_date;
use amica_core::store::MetricsStore;
use amica_core::user::Principal;

use crate::{error::AppError, state::AppState};

use super::{authorize_tenant, resolve_range, tenants::RangeQuery};

/// `GET /api/tenants/:tenant_id/metrics/daily`: Stored daily snapshots in
/// the range, oldest first. Days the collector has not run for are absent.
pub async fn daily_metrics(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let range = resolve_range(query.date_from.as_deref(), query.date_to.as_deref())?;

    let rows = state
        .db
        .list_daily_metrics(&tenant_id, &range)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": rows,
        "range": range,
    })))
}

/// `GET /api/tenants/:tenant_id/metrics/daily/:day`: The stored snapshot for
/// one `YYYY-MM-DD` day. 404 when the collector has not run for it.
pub async fn daily_metrics_for_day(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, day)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let day = parse_date(&day).ok_or(AppError::Validation {
        field: "day",
        message: "day must use the YYYY-MM-DD format".to_string(),
    })?;

    let row = state
        .db
        .get_daily_metrics(&tenant_id, day)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("No metrics collected for {day}")))?;

    Ok(Json(json!({ "data": row })))
}
