//! Conversation sessions recorded by the booking agent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::range::DateRange;

/// Outcome tag written by the agent when a conversation ends.
///
/// The agent treats this as an open string; values outside the known set are
/// kept verbatim in [`FinalStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinalStatus {
    Done,
    Completed,
    Booked,
    Abandoned,
    AutoClosed,
    Transferred,
    Ghost,
    NoSlots,
    PriceTooHigh,
    InProgress,
    Other(String),
}

/// Display tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Info,
    Warning,
    Danger,
    Neutral,
}

impl FinalStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "done" => Self::Done,
            "completed" => Self::Completed,
            "booked" => Self::Booked,
            "abandoned" => Self::Abandoned,
            "auto_closed" => Self::AutoClosed,
            "transferred" => Self::Transferred,
            "ghost" => Self::Ghost,
            "no_slots" => Self::NoSlots,
            "price_too_high" => Self::PriceTooHigh,
            "in_progress" => Self::InProgress,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Done => "done",
            Self::Completed => "completed",
            Self::Booked => "booked",
            Self::Abandoned => "abandoned",
            Self::AutoClosed => "auto_closed",
            Self::Transferred => "transferred",
            Self::Ghost => "ghost",
            Self::NoSlots => "no_slots",
            Self::PriceTooHigh => "price_too_high",
            Self::InProgress => "in_progress",
            Self::Other(s) => s,
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Done | Self::Completed => StatusTone::Success,
            Self::Booked | Self::Transferred => StatusTone::Info,
            Self::Abandoned | Self::PriceTooHigh => StatusTone::Warning,
            Self::NoSlots => StatusTone::Danger,
            Self::AutoClosed | Self::Ghost | Self::InProgress | Self::Other(_) => {
                StatusTone::Neutral
            }
        }
    }
}

impl From<String> for FinalStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<FinalStatus> for String {
    fn from(status: FinalStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Funnel step at which a session stopped, read from `meta.drop_off_stage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOffStage {
    ServiceSelection,
    StaffSelection,
    TimeSelection,
    Other(String),
}

impl DropOffStage {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "service_selection" => Self::ServiceSelection,
            "staff_selection" => Self::StaffSelection,
            "time_selection" => Self::TimeSelection,
            other => Self::Other(other.to_string()),
        }
    }

    /// `None` when `meta` has no `drop_off_stage` or it is JSON null.
    ///
    /// Non-string values are treated as an unrecognized stage, not as absent.
    pub fn from_meta(meta: &Value) -> Option<Self> {
        match meta.get("drop_off_stage") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(Self::parse(s)),
            Some(other) => Some(Self::Other(other.to_string())),
        }
    }
}

/// Projection of a session used by the funnel aggregation.
#[derive(Debug, Clone)]
pub struct FunnelRow {
    pub meta: Value,
    pub final_status: FinalStatus,
}

/// Raw inputs for the KPI summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionCounts {
    pub total: i64,
    /// `booking_amount` of every session with a non-null `booking_id`.
    pub booked_amounts: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSession {
    pub id: i64,
    pub session_id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub channel: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub duration_sec: Option<i64>,
    pub final_status: FinalStatus,
    pub status_tone: StatusTone,
    pub final_intent: Option<String>,
    pub booking_id: Option<String>,
    pub booking_amount: Option<f64>,
    pub messages_count: Option<i64>,
    pub meta: Value,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryMessage {
    pub role: String,
    pub message: String,
    pub created_at: String,
}

/// Filters for the paginated session list.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub status: Option<String>,
    pub range: Option<DateRange>,
    pub limit: i64,
    pub offset: i64,
}
