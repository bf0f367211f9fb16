use chrono::NaiveDate;
use tracing::{debug, warn};

use amica_core::kpi::{summarize_kpi, DailyMetrics};
use amica_core::range::DateRange;
use amica_core::store::{MetricsStore, SessionStore, TenantStore};

/// Compute and store the KPI snapshot of `day` for every tenant.
///
/// A tenant whose sessions cannot be read (or whose row cannot be written) is
/// skipped rather than stored as zeros. Returns the number of tenants whose
/// snapshot was written; only a failure to list tenants is an error.
pub async fn collect_daily_metrics<S>(store: &S, day: NaiveDate) -> anyhow::Result<usize>
where
    S: TenantStore + SessionStore + MetricsStore,
{
    let tenants = store.list_tenants().await?;
    let range = DateRange::single_day(day);
    let mut processed = 0;

    for tenant in tenants {
        let counts = match store.fetch_session_counts(&tenant.id, &range).await {
            Ok(counts) => counts,
            Err(err) => {
                warn!(tenant_id = %tenant.id, %day, error = %err, "Skipping tenant: session fetch failed");
                continue;
            }
        };
        let metrics = DailyMetrics::from_summary(&tenant.id, day, &summarize_kpi(&counts));
        if let Err(err) = store.upsert_daily_metrics(&metrics).await {
            warn!(tenant_id = %tenant.id, %day, error = %err, "Skipping tenant: metrics write failed");
            continue;
        }
        debug!(tenant_id = %tenant.id, %day, sessions = metrics.total_sessions, "Daily metrics stored");
        processed += 1;
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use amica_duckdb::DuckDbBackend;

    use super::*;

    const TENANT_A: &str = "11111111-1111-1111-1111-111111111111";
    const TENANT_B: &str = "22222222-2222-2222-2222-222222222222";

    async fn insert_session(db: &DuckDbBackend, tenant: &str, id: &str, at: &str, booking: Option<f64>) {
        let conn = db.conn_for_test().await;
        conn.execute(
            "INSERT INTO conversation_sessions \
                 (session_id, tenant_id, user_id, started_at, final_status, booking_id, booking_amount) \
             VALUES (?1, ?2, 'client_1', CAST(?3 AS TIMESTAMP), 'done', ?4, ?5)",
            amica_duckdb::duckdb::params![
                id,
                tenant,
                at,
                booking.map(|_| format!("booking_{id}")),
                booking
            ],
        )
        .expect("insert session");
    }

    #[tokio::test]
    async fn snapshots_every_tenant_for_one_day() {
        let db = DuckDbBackend::open_in_memory().expect("db");
        db.seed_tenant(TENANT_A, "A", &json!({})).await.expect("seed");
        db.seed_tenant(TENANT_B, "B", &json!({})).await.expect("seed");
        insert_session(&db, TENANT_A, "a1", "2026-03-09 10:00:00", Some(80.0)).await;
        insert_session(&db, TENANT_A, "a2", "2026-03-09 18:00:00", None).await;
        insert_session(&db, TENANT_A, "a3", "2026-03-10 00:00:00", Some(999.0)).await;

        let day = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");
        let processed = collect_daily_metrics(&db, day).await.expect("collect");
        assert_eq!(processed, 2);

        let a = db
            .get_daily_metrics(TENANT_A, day)
            .await
            .expect("get")
            .expect("row");
        assert_eq!((a.total_sessions, a.total_bookings), (2, 1));
        assert_eq!(a.revenue, 80.0);
        assert_eq!(a.conversion_rate, 50.0);

        let b = db
            .get_daily_metrics(TENANT_B, day)
            .await
            .expect("get")
            .expect("row");
        assert_eq!(b.total_sessions, 0);
        assert_eq!(b.conversion_rate, 0.0);
    }

    #[tokio::test]
    async fn rerun_overwrites_the_snapshot() {
        let db = DuckDbBackend::open_in_memory().expect("db");
        db.seed_tenant(TENANT_A, "A", &json!({})).await.expect("seed");
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");

        collect_daily_metrics(&db, day).await.expect("collect");
        insert_session(&db, TENANT_A, "late", "2026-03-09 23:00:00", Some(40.0)).await;
        collect_daily_metrics(&db, day).await.expect("collect");

        let range = DateRange::single_day(day);
        let rows = db.list_daily_metrics(TENANT_A, &range).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_bookings, 1);
        assert_eq!(rows[0].revenue, 40.0);
    }
}
