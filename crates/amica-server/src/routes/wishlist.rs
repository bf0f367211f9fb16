use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use amica_core::dashboard::load_wishlist_stats;
use amica_core::store::WishlistStore;
use amica_core::user::Principal;
use amica_core::wishlist::{StatusChange, WishlistStatus};

use crate::{error::AppError, state::AppState};

use super::{authorize_tenant, page_bounds, pagination};

#[derive(Debug, Deserialize)]
pub struct WishlistQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// `pending` (default), `converted`, `cancelled` or `all`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWishlistRequest {
    pub status: String,
    pub amount: Option<f64>,
}

/// `GET /api/tenants/:tenant_id/wishlist`: Newest-first wishlist items.
pub async fn list_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
    Query(query): Query<WishlistQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let (limit, offset) = page_bounds(query.limit, query.offset);

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => Some(WishlistStatus::Pending),
        Some("all") => None,
        Some(raw) => Some(WishlistStatus::parse(raw)?),
    };

    let (items, total) = state
        .db
        .list_wishlist_items(&tenant_id, status, limit, offset)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "data": items,
        "pagination": pagination(total, limit, offset),
    })))
}

/// `GET /api/tenants/:tenant_id/wishlist/stats`: Counts per status and
/// converted revenue. Store failures degrade to zeros.
pub async fn wishlist_stats(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let stats = load_wishlist_stats(state.db.as_ref(), &tenant_id).await;
    Ok(Json(json!({ "data": stats })))
}

/// `PATCH /api/tenants/:tenant_id/wishlist/:item_id`: Change an item's status.
///
/// The transition is validated before anything is written; an item that does
/// not exist under this tenant is 404.
pub async fn update_wishlist_item(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, item_id)): Path<(String, i64)>,
    Json(req): Json<UpdateWishlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;
    let change = StatusChange::parse(&req.status, req.amount)?;

    let updated = state
        .db
        .update_wishlist_item(item_id, &tenant_id, &change)
        .await
        .map_err(AppError::Internal)?;
    if !updated {
        return Err(AppError::NotFound("Wishlist item not found".to_string()));
    }
    info!(
        user_id = principal.user_id,
        tenant_id = %tenant_id,
        item_id,
        status = change.status.as_str(),
        "Wishlist item updated"
    );

    Ok(Json(json!({
        "data": {
            "id": item_id,
            "status": change.status,
            "amount": change.amount,
        }
    })))
}

/// `DELETE /api/tenants/:tenant_id/wishlist/:item_id`: Remove an item. 204.
pub async fn delete_wishlist_item(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path((tenant_id, item_id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = authorize_tenant(state.db.as_ref(), &principal, &tenant_id).await?;

    let deleted = state
        .db
        .delete_wishlist_item(item_id, &tenant_id)
        .await
        .map_err(AppError::Internal)?;
    if !deleted {
        return Err(AppError::NotFound("Wishlist item not found".to_string()));
    }
    info!(user_id = principal.user_id, tenant_id = %tenant_id, item_id, "Wishlist item deleted");

    Ok(StatusCode::NO_CONTENT)
}
