use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use amica_core::user::{validate_new_user, NewUserRecord, Principal, Role};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    pub tenant_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn require_user_admin(principal: &Principal) -> Result<(), AppError> {
    if principal.can_manage_users() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// `GET /api/users`: Every dashboard user (super admin only).
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    require_user_admin(&principal)?;
    let users = state.db.list_users().await.map_err(AppError::Internal)?;
    Ok(Json(json!({ "data": users })))
}

/// `POST /api/users`: Create a dashboard user (super admin only). 201.
///
/// Non-super-admin roles must name an existing tenant. A taken email is 409.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_user_admin(&principal)?;

    let role = Role::parse(&req.role)?;
    let (email, tenant_id) = validate_new_user(
        &req.email,
        req.first_name.as_deref(),
        role,
        req.tenant_id.as_deref(),
    )?;
    let password = req.password.trim();
    validate_password_strength(password).map_err(|e| AppError::Validation {
        field: "password",
        message: e.to_string(),
    })?;

    let tenant_id = match tenant_id {
        Some(raw) => {
            let canonical = Uuid::parse_str(&raw)
                .map_err(|_| AppError::Validation {
                    field: "tenant_id",
                    message: "tenant_id must be a UUID".to_string(),
                })?
                .hyphenated()
                .to_string();
            let exists = state
                .db
                .get_tenant(&canonical)
                .await
                .map_err(AppError::Internal)?
                .is_some();
            if !exists {
                return Err(AppError::Validation {
                    field: "tenant_id",
                    message: "tenant does not exist".to_string(),
                });
            }
            Some(canonical)
        }
        None => None,
    };

    let password_hash =
        hash_password(password, state.config.argon2_memory_kb).map_err(AppError::Internal)?;
    let user = state
        .db
        .create_user(NewUserRecord {
            email,
            password_hash,
            role,
            tenant_id,
            first_name: req.first_name.map(|s| s.trim().to_string()),
            last_name: req
                .last_name
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::Conflict("A user with this email already exists".to_string()))?;

    info!(
        created_by = principal.user_id,
        user_id = user.id,
        role = user.role.as_str(),
        "Dashboard user created"
    );
    Ok((StatusCode::CREATED, Json(json!({ "data": user }))))
}

/// `DELETE /api/users/:id`: Remove a dashboard user (super admin only). 204.
///
/// Deleting your own account is refused.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_user_admin(&principal)?;
    if user_id == principal.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let deleted = state
        .db
        .delete_user(user_id)
        .await
        .map_err(AppError::Internal)?;
    if !deleted {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!(deleted_by = principal.user_id, user_id, "Dashboard user deleted");

    Ok(StatusCode::NO_CONTENT)
}
