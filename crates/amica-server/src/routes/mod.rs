pub mod health;
pub mod metrics;
pub mod sessions;
pub mod settings;
pub mod tenants;
pub mod users;
pub mod wishlist;

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use amica_core::range::DateRange;
use amica_core::store::TenantStore;
use amica_core::user::Principal;

use crate::error::AppError;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Validate the `:tenant_id` path segment and check that `principal` may
/// read it. Returns the canonical (lowercase, hyphenated) tenant id.
///
/// Order matters: a malformed id is 400, a foreign tenant is 403, and an
/// unknown tenant is 404.
pub async fn authorize_tenant(
    tenants: &dyn TenantStore,
    principal: &Principal,
    raw_tenant_id: &str,
) -> Result<String, AppError> {
    let tenant_id = Uuid::parse_str(raw_tenant_id)
        .map_err(|_| AppError::Validation {
            field: "tenant_id",
            message: "tenant_id must be a UUID".to_string(),
        })?
        .hyphenated()
        .to_string();
    if !principal.can_access_tenant(&tenant_id) {
        tracing::warn!(
            user_id = principal.user_id,
            tenant_id = %tenant_id,
            "Cross-tenant access denied"
        );
        return Err(AppError::Forbidden);
    }
    if tenants
        .get_tenant(&tenant_id)
        .await
        .map_err(AppError::Internal)?
        .is_none()
    {
        return Err(AppError::NotFound("Tenant not found".to_string()));
    }
    Ok(tenant_id)
}

/// Resolve `date_from` / `date_to` query parameters against today (UTC).
pub fn resolve_range(date_from: Option<&str>, date_to: Option<&str>) -> Result<DateRange, AppError> {
    let range = DateRange::resolve(date_from, date_to, Utc::now().date_naive());
    if range.is_inverted() {
        return Err(AppError::Validation {
            field: "date_from",
            message: "date_from must not be after date_to".to_string(),
        });
    }
    Ok(range)
}

/// `(limit, offset)` from optional query parameters, clamped to sane bounds.
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        offset.unwrap_or(0).clamp(0, i64::MAX - MAX_PAGE_LIMIT),
    )
}

pub fn pagination(total: i64, limit: i64, offset: i64) -> Value {
    json!({
        "total": total,
        "limit": limit,
        "offset": offset,
        "has_more": offset.saturating_add(limit) < total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_are_clamped() {
        assert_eq!(page_bounds(None, None), (20, 0));
        assert_eq!(page_bounds(Some(0), Some(-5)), (1, 0));
        assert_eq!(page_bounds(Some(500), Some(40)), (100, 40));
    }

    #[test]
    fn has_more_reflects_remaining_rows() {
        assert_eq!(pagination(45, 20, 20)["has_more"], true);
        assert_eq!(pagination(40, 20, 20)["has_more"], false);
    }

    #[test]
    fn extreme_offset_does_not_overflow() {
        let (limit, offset) = page_bounds(Some(100), Some(i64::MAX));
        assert_eq!(offset, i64::MAX - MAX_PAGE_LIMIT);
        assert_eq!(pagination(5, limit, offset)["has_more"], false);
        assert_eq!(pagination(5, 20, i64::MAX)["has_more"], false);
        assert_eq!(page_bounds(None, Some(-3)), (DEFAULT_PAGE_LIMIT, 0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            resolve_range(Some("2026-03-05"), Some("2026-03-01")),
            Err(AppError::Validation { field: "date_from", .. })
        ));
        assert!(resolve_range(Some("2026-03-01"), Some("2026-03-05")).is_ok());
    }
}
