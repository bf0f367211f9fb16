use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid status: {0} (expected pending, converted or cancelled)")]
    InvalidStatus(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid role: {0} (expected super_admin, admin or staff)")]
    InvalidRole(String),

    #[error("invalid {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
