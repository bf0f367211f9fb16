use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Number of days covered by the default range, counted back from `date_to`.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Inclusive calendar-day range used by every date-filtered query.
///
/// `date_to` covers the whole day: queries compare against the start of the
/// following day with a strict `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

impl DateRange {
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self { date_from, date_to }
    }

    /// A range spanning a single calendar day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Resolve optional `YYYY-MM-DD` strings against `today`.
    ///
    /// Missing or unparsable `date_to` becomes `today`; missing or unparsable
    /// `date_from` becomes `date_to - 7 days`.
    pub fn resolve(date_from: Option<&str>, date_to: Option<&str>, today: NaiveDate) -> Self {
        let date_to = date_to.and_then(parse_date).unwrap_or(today);
        let date_from = date_from
            .and_then(parse_date)
            .unwrap_or_else(|| date_to - Duration::days(DEFAULT_RANGE_DAYS));
        Self { date_from, date_to }
    }

    pub fn is_inverted(&self) -> bool {
        self.date_to < self.date_from
    }

    /// Inclusive lower bound as a timestamp literal.
    pub fn start_bound(&self) -> String {
        format!("{} 00:00:00", self.date_from.format("%Y-%m-%d"))
    }

    /// Exclusive upper bound: midnight after `date_to`.
    pub fn end_bound_exclusive(&self) -> String {
        let next = self.date_to + Duration::days(1);
        format!("{} 00:00:00", next.format("%Y-%m-%d"))
    }
}
