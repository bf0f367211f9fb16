use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{error, info};

use crate::state::AppState;

pub mod metrics;

/// Hour (UTC) at which the previous day's metrics are collected.
const METRICS_COLLECTION_HOUR: u32 = 1;

/// First 01:00 UTC strictly after `now`.
pub fn next_collection_at(now: DateTime<Utc>) -> DateTime<Utc> {
    let at = NaiveTime::from_hms_opt(METRICS_COLLECTION_HOUR, 0, 0).unwrap_or_default();
    let today_run = now.date_naive().and_time(at).and_utc();
    if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    }
}

/// Background loop: snapshot yesterday's KPIs once a day.
///
/// Spawned from `main.rs` when `AMICA_METRICS_COLLECTOR` is on. A failed run
/// is logged and retried the next day.
pub async fn run_metrics_loop(state: Arc<AppState>) {
    info!(hour_utc = METRICS_COLLECTION_HOUR, "Daily metrics collector started");
    loop {
        let now = Utc::now();
        let secs_until = (next_collection_at(now) - now).num_seconds().max(1) as u64;
        tokio::time::sleep(std::time::Duration::from_secs(secs_until)).await;

        let day = Utc::now().date_naive() - Duration::days(1);
        match metrics::collect_daily_metrics(state.db.as_ref(), day).await {
            Ok(processed) => info!(%day, processed, "Daily metrics collected"),
            Err(err) => error!(%day, error = %err, "Daily metrics collection failed"),
        }
    }
}
