//! Dashboard operators and what they are allowed to see.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Staff,
}

impl Role {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

/// Public view of a dashboard user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: bool,
    pub created_at: String,
}

/// A user row as stored, including the credential hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Validated input for a new user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the shape of a new user before hashing anything.
///
/// Every role except `super_admin` must belong to a tenant; a super admin is
/// never bound to one, so any supplied tenant is dropped.
pub fn validate_new_user(
    email: &str,
    first_name: Option<&str>,
    role: Role,
    tenant_id: Option<&str>,
) -> Result<(String, Option<String>), CoreError> {
    let email = normalize_email(email);
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(CoreError::InvalidSetting {
            field: "email",
            reason: "must be a valid email address".to_string(),
        });
    }
    if first_name.map(str::trim).unwrap_or("").is_empty() {
        return Err(CoreError::InvalidSetting {
            field: "first_name",
            reason: "is required".to_string(),
        });
    }
    let tenant_id = match role {
        Role::SuperAdmin => None,
        _ => match tenant_id.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => Some(t.to_string()),
            None => {
                return Err(CoreError::InvalidSetting {
                    field: "tenant_id",
                    reason: format!("is required for role {}", role.as_str()),
                })
            }
        },
    };
    Ok((email, tenant_id))
}

/// The authenticated operator behind a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<String>,
}

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Super admins see every tenant; everyone else only their own.
    pub fn can_access_tenant(&self, tenant_id: &str) -> bool {
        self.is_super_admin() || self.tenant_id.as_deref() == Some(tenant_id)
    }

    /// Tenant settings are editable by super admins and by the tenant's admins.
    pub fn can_manage_settings(&self, tenant_id: &str) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::Admin => self.can_access_tenant(tenant_id),
            Role::Staff => false,
        }
    }

    pub fn can_manage_users(&self) -> bool {
        self.is_super_admin()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            tenant_id: user.tenant_id.clone(),
        }
    }
}
