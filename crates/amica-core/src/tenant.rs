//! Salon (tenant) records and the editable part of their metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub metadata: Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenantSummary {
    pub id: String,
    pub name: String,
}

/// Settings form backed by keys of `tenants.metadata`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantSettings {
    pub salon_name: String,
    pub welcome_message: String,
    pub closing_time: String,
    pub admin_chat_id: Option<i64>,
    pub yclients_salon_id: String,
    pub telegram_bot_enabled: bool,
    pub enable_gap_filtering: bool,
    pub branch_name: String,
    pub branch_phone: String,
    pub branch_address: String,
}

/// Settings as submitted by a client. `admin_chat_id` may arrive as a number
/// or as the text of a form field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TenantSettingsInput {
    pub salon_name: String,
    pub welcome_message: String,
    pub closing_time: String,
    pub admin_chat_id: Option<Value>,
    pub yclients_salon_id: String,
    pub telegram_bot_enabled: Option<bool>,
    pub enable_gap_filtering: bool,
    pub branch_name: String,
    pub branch_phone: String,
    pub branch_address: String,
}

fn text(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn chat_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl TenantSettings {
    pub fn from_metadata(metadata: &Value) -> Self {
        let branch = metadata.get("current_branch").cloned().unwrap_or(Value::Null);
        let closing_time = text(metadata, "closing_time");
        Self {
            salon_name: text(metadata, "salon_name"),
            welcome_message: text(metadata, "welcome_message"),
            closing_time: if closing_time.is_empty() {
                "21:00".to_string()
            } else {
                closing_time
            },
            admin_chat_id: metadata.get("admin_chat_id").and_then(chat_id),
            yclients_salon_id: text(metadata, "yclients_salon_id"),
            telegram_bot_enabled: metadata
                .get("telegram_bot_enabled")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            enable_gap_filtering: metadata
                .get("enable_gap_filtering")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            branch_name: text(&branch, "name"),
            branch_phone: text(&branch, "phone"),
            branch_address: text(&branch, "address"),
        }
    }

    /// Merge these settings into `metadata`, keeping every key the form
    /// does not own (including unknown keys of `current_branch`).
    pub fn apply_to(&self, metadata: &Value) -> Value {
        let mut merged = match metadata {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        merged.insert("salon_name".into(), Value::from(self.salon_name.clone()));
        merged.insert(
            "welcome_message".into(),
            Value::from(self.welcome_message.clone()),
        );
        merged.insert("closing_time".into(), Value::from(self.closing_time.clone()));
        merged.insert(
            "admin_chat_id".into(),
            self.admin_chat_id.map(Value::from).unwrap_or(Value::Null),
        );
        merged.insert(
            "yclients_salon_id".into(),
            Value::from(self.yclients_salon_id.clone()),
        );
        merged.insert(
            "telegram_bot_enabled".into(),
            Value::from(self.telegram_bot_enabled),
        );
        merged.insert(
            "enable_gap_filtering".into(),
            Value::from(self.enable_gap_filtering),
        );

        let mut branch = match merged.get("current_branch") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        branch.insert("name".into(), Value::from(self.branch_name.clone()));
        branch.insert("phone".into(), Value::from(self.branch_phone.clone()));
        branch.insert("address".into(), Value::from(self.branch_address.clone()));
        merged.insert("current_branch".into(), Value::Object(branch));

        Value::Object(merged)
    }
}

/// `HH:MM` on a 24-hour clock; a single-digit hour is accepted.
pub fn is_valid_closing_time(raw: &str) -> bool {
    let Some((hours, minutes)) = raw.split_once(':') else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !digits(hours) || !digits(minutes) || hours.len() > 2 || minutes.len() != 2 {
        return false;
    }
    matches!((hours.parse::<u8>(), minutes.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

impl TenantSettingsInput {
    pub fn validate(self) -> Result<TenantSettings, CoreError> {
        let admin_chat_id = match self.admin_chat_id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(raw) => Some(chat_id(&raw).ok_or(CoreError::InvalidSetting {
                field: "admin_chat_id",
                reason: "must be a number".to_string(),
            })?),
        };

        let closing_time = self.closing_time.trim().to_string();
        if !closing_time.is_empty() && !is_valid_closing_time(&closing_time) {
            return Err(CoreError::InvalidSetting {
                field: "closing_time",
                reason: "must use the HH:MM format".to_string(),
            });
        }

        Ok(TenantSettings {
            salon_name: self.salon_name,
            welcome_message: self.welcome_message,
            closing_time,
            admin_chat_id,
            yclients_salon_id: self.yclients_salon_id,
            telegram_bot_enabled: self.telegram_bot_enabled.unwrap_or(true),
            enable_gap_filtering: self.enable_gap_filtering,
            branch_name: self.branch_name,
            branch_phone: self.branch_phone,
            branch_address: self.branch_address,
        })
    }
}

/// Copy of `metadata` without keys that look like secrets.
pub fn redact_metadata(metadata: &Value) -> Value {
    match metadata {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| {
                    let k = k.to_lowercase();
                    !k.contains("token") && !k.contains("password")
                })
                .map(|(k, v)| (k.clone(), redact_metadata(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
