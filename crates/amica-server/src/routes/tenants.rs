use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use amica_core::dashboard::{load_funnel, load_kpi_summary};
use amica_core::tenant::TenantSummary;
use amica_core::user::Principal;

use crate::{error::AppError, state::AppState};

use super::{authorize_tenant, resolve_range};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// `GET /api/tenants`: Tenants visible to the caller.
///
/// Super admins get every tenant; everyone else gets at most their own.
pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    let tenants: Vec<TenantSummary> = if principal.is_super_admin() {
        state.db.list_tenants().await.map_err(AppError::Internal)?
    } else {
        match principal.tenant_id.as_deref() {
            Some(tenant_id) => state
                .db
                .get_tenant(tenant_id)
                .await
                .map_err(AppError::Internal)?
                .map(|t| TenantSummary {
                    id: t.id,
                    name: t.name,
                })
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    };

    Ok(Json(json!({ "data": tenants })))
}

/// `GET /api/tenants/:tenant_id/overview`: KPI block and booking funnel.
///
/// Store failures degrade to zeros instead of an error response.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let range = resolve_range(query.date_from.as_deref(), query.date_to.as_deref())?;

    let kpi = load_kpi_summary(state.db.as_ref(), &tenant_id, &range).await;
    let funnel = load_funnel(state.db.as_ref(), &tenant_id, &range).await;

    Ok(Json(json!({
        "data": {
            "tenant_id": tenant_id,
            "range": range,
            "kpi": kpi,
            "funnel": {
                "stages": funnel,
                "steps": funnel.steps(),
            },
        }
    })))
}
