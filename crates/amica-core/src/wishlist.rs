//! Wishlist: leads that did not book through the normal agent flow.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistStatus {
    Pending,
    Converted,
    Cancelled,
}

impl WishlistStatus {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim() {
            "pending" => Ok(Self::Pending),
            "converted" => Ok(Self::Converted),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Converted => "converted",
            Self::Cancelled => "cancelled",
        }
    }
}

/// `status`/`amount` projection used for the statistics block.
///
/// `status` stays a raw string: rows written by other tools may carry values
/// outside the three known states.
#[derive(Debug, Clone)]
pub struct WishlistRow {
    pub status: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WishlistItem {
    pub id: i64,
    pub tenant_id: String,
    pub user_id: String,
    pub item_type: String,
    pub item_id: String,
    pub source: Option<String>,
    pub comment: Option<String>,
    pub status: String,
    pub amount: Option<f64>,
    pub meta: Value,
    pub created_at: String,
    pub processed_at: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WishlistStats {
    pub pending: i64,
    pub converted: i64,
    pub cancelled: i64,
    pub total_revenue: f64,
}

/// Count items per status and sum the amounts of converted ones.
///
/// Stored statuses are matched exactly; anything else, including padded
/// values, is skipped.
pub fn aggregate_wishlist<'a, I>(rows: I) -> WishlistStats
where
    I: IntoIterator<Item = &'a WishlistRow>,
{
    let mut stats = WishlistStats::default();
    for row in rows {
        match row.status.as_str() {
            "pending" => stats.pending += 1,
            "converted" => {
                stats.converted += 1;
                if let Some(amount) = row.amount.filter(|a| *a != 0.0) {
                    stats.total_revenue += amount;
                }
            }
            "cancelled" => stats.cancelled += 1,
            _ => {}
        }
    }
    stats
}

/// A validated status mutation, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusChange {
    pub status: WishlistStatus,
    /// Stored amount after the change; `None` clears the column.
    pub amount: Option<f64>,
}

impl StatusChange {
    /// Validate a requested transition.
    ///
    /// `converted` requires a finite, non-negative amount; the other states
    /// must not carry one.
    pub fn parse(status: &str, amount: Option<f64>) -> Result<Self, CoreError> {
        let status = WishlistStatus::parse(status)?;
        match (status, amount) {
            (WishlistStatus::Converted, None) => Err(CoreError::InvalidAmount(
                "amount is required when converting an item".to_string(),
            )),
            (WishlistStatus::Converted, Some(a)) if !a.is_finite() || a < 0.0 => Err(
                CoreError::InvalidAmount("amount must be a non-negative number".to_string()),
            ),
            (WishlistStatus::Converted, Some(a)) => Ok(Self {
                status,
                amount: Some(a),
            }),
            (_, Some(_)) => Err(CoreError::InvalidAmount(format!(
                "amount is only accepted for converted items, not {}",
                status.as_str()
            ))),
            (_, None) => Ok(Self {
                status,
                amount: None,
            }),
        }
    }

    pub fn convert(amount: f64) -> Result<Self, CoreError> {
        Self::parse("converted", Some(amount))
    }

    pub fn cancel() -> Self {
        Self {
            status: WishlistStatus::Cancelled,
            amount: None,
        }
    }

    /// Whether `processed_at` is stamped with the current time (otherwise
    /// it is cleared).
    pub fn marks_processed(&self) -> bool {
        self.status != WishlistStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, amount: Option<f64>) -> WishlistRow {
        WishlistRow {
            status: status.to_string(),
            amount,
        }
    }

    #[test]
    fn counts_each_status_and_sums_converted_revenue() {
        let rows = vec![
            row("pending", None),
            row("pending", None),
            row("converted", Some(150.0)),
            row("converted", Some(50.0)),
            row("cancelled", None),
        ];
        assert_eq!(
            aggregate_wishlist(&rows),
            WishlistStats {
                pending: 2,
                converted: 2,
                cancelled: 1,
                total_revenue: 200.0,
            }
        );
    }

    #[test]
    fn unknown_status_is_not_counted() {
        let rows = vec![row("archived", Some(999.0)), row("converted", None)];
        let stats = aggregate_wishlist(&rows);
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.pending + stats.cancelled, 0);
        assert_eq!(stats.total_revenue, 0.0);
    }

    #[test]
    fn stored_status_must_match_exactly() {
        let rows = vec![
            row(" pending ", None),
            row("Converted", Some(70.0)),
            row("cancelled\n", None),
        ];
        assert_eq!(aggregate_wishlist(&rows), WishlistStats::default());
    }

    #[test]
    fn amounts_on_non_converted_rows_are_ignored() {
        let rows = vec![row("cancelled", Some(80.0))];
        assert_eq!(aggregate_wishlist(&rows).total_revenue, 0.0);
    }

    #[test]
    fn rejects_status_outside_enum() {
        assert!(matches!(
            StatusChange::parse("bogus", None),
            Err(CoreError::InvalidStatus(s)) if s == "bogus"
        ));
    }

    #[test]
    fn converted_requires_valid_amount() {
        assert!(matches!(
            StatusChange::parse("converted", None),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(StatusChange::convert(-1.0).is_err());
        assert!(StatusChange::convert(f64::NAN).is_err());
        let change = StatusChange::convert(0.0).expect("zero amount is allowed");
        assert_eq!(change.amount, Some(0.0));
        assert!(change.marks_processed());
    }

    #[test]
    fn pending_clears_processed_at_and_amount() {
        let change = StatusChange::parse("pending", None).expect("pending");
        assert!(!change.marks_processed());
        assert_eq!(change.amount, None);
        assert!(StatusChange::parse("pending", Some(10.0)).is_err());
    }

    #[test]
    fn cancel_marks_processed() {
        let change = StatusChange::parse(" cancelled ", None).expect("cancelled");
        assert_eq!(change, StatusChange::cancel());
        assert!(change.marks_processed());
    }
}
