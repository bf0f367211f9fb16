use chrono::NaiveDate;
use serde::Serialize;

use crate::session::SessionCounts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub sessions: i64,
    pub bookings: i64,
    /// Booked sessions as a percentage of all sessions, one decimal place.
    pub conversion: f64,
    pub revenue: f64,
}

/// Build the KPI record from the two range-scoped session queries.
///
/// Revenue is summed over the booked rows only; a null amount counts as zero.
pub fn summarize_kpi(counts: &SessionCounts) -> KpiSummary {
    let sessions = counts.total;
    let bookings = counts.booked_amounts.len() as i64;
    let revenue = counts.booked_amounts.iter().map(|a| a.unwrap_or(0.0)).sum();
    KpiSummary {
        sessions,
        bookings,
        conversion: conversion_rate(bookings, sessions),
        revenue,
    }
}

/// `round(bookings / sessions * 100, 1)`, or `0.0` when there are no sessions.
pub fn conversion_rate(bookings: i64, sessions: i64) -> f64 {
    if sessions <= 0 {
        return 0.0;
    }
    (bookings as f64 / sessions as f64 * 1000.0).round() / 10.0
}

/// One stored row of the daily KPI snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetrics {
    pub day: NaiveDate,
    pub tenant_id: String,
    pub total_sessions: i64,
    pub total_bookings: i64,
    pub revenue: f64,
    pub conversion_rate: f64,
    pub updated_at: Option<String>,
}

impl DailyMetrics {
    pub fn from_summary(tenant_id: &str, day: NaiveDate, kpi: &KpiSummary) -> Self {
        Self {
            day,
            tenant_id: tenant_id.to_string(),
            total_sessions: kpi.sessions,
            total_bookings: kpi.bookings,
            revenue: kpi.revenue,
            conversion_rate: kpi.conversion,
            updated_at: None,
        }
    }
}
