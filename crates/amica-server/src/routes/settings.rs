use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use tracing::info;

use amica_core::tenant::{redact_metadata, Tenant, TenantSettings, TenantSettingsInput};
use amica_core::user::Principal;

use crate::{error::AppError, state::AppState};

use super::authorize_tenant;

/// Tenant lookup shared by both handlers: membership first, then the
/// stricter settings permission (staff are refused).
async fn load_for_settings(
    state: &AppState,
    principal: &Principal,
    raw_tenant_id: &str,
) -> Result<Tenant, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), principal, raw_tenant_id).await?;
    if !principal.can_manage_settings(&tenant_id) {
        return Err(AppError::Forbidden);
    }
    state
        .db
        .get_tenant(&tenant_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))
}

fn settings_body(principal: &Principal, tenant: &Tenant, settings: &TenantSettings) -> serde_json::Value {
    let mut data = json!({
        "tenant_id": tenant.id,
        "name": tenant.name,
        "settings": settings,
        "updated_at": tenant.updated_at,
    });
    if principal.is_super_admin() {
        data["metadata"] = redact_metadata(&tenant.metadata);
    }
    json!({ "data": data })
}

/// `GET /api/tenants/:tenant_id/settings`
///
/// Super admins additionally receive the raw metadata with secret-looking
/// keys removed.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = load_for_settings(&state, &principal, &tenant_id).await?;
    let settings = TenantSettings::from_metadata(&tenant.metadata);
    Ok(Json(settings_body(&principal, &tenant, &settings)))
}

/// `PUT /api/tenants/:tenant_id/settings`: Replace the settings form.
///
/// Keys of the metadata document that the form does not own are kept.
/// Concurrent saves are last-write-wins.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
    Json(req): Json<TenantSettingsInput>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = load_for_settings(&state, &principal, &tenant_id).await?;
    let settings = req.validate()?;
    let metadata = settings.apply_to(&tenant.metadata);

    let updated = state
        .db
        .update_tenant_metadata(&tenant.id, &metadata)
        .await
        .map_err(AppError::Internal)?;
    if !updated {
        return Err(AppError::NotFound("Tenant not found".to_string()));
    }
    info!(user_id = principal.user_id, tenant_id = %tenant.id, "Tenant settings updated");

    let tenant = state
        .db
        .get_tenant(&tenant.id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;
    let settings = TenantSettings::from_metadata(&tenant.metadata);
    Ok(Json(settings_body(&principal, &tenant, &settings)))
}
