use anyhow::Result;
use chrono::NaiveDate;

use amica_core::kpi::DailyMetrics;
use amica_core::range::DateRange;

use crate::DuckDbBackend;

const SELECT_COLUMNS: &str = "CAST(day AS VARCHAR), tenant_id, total_sessions, total_bookings, \
     revenue, conversion_rate, CAST(updated_at AS VARCHAR)";

fn map_row(row: &duckdb::Row<'_>) -> duckdb::Result<(String, DailyMetrics)> {
    let day: String = row.get(0)?;
    Ok((
        day,
        DailyMetrics {
            day: NaiveDate::default(),
            tenant_id: row.get(1)?,
            total_sessions: row.get(2)?,
            total_bookings: row.get(3)?,
            revenue: row.get(4)?,
            conversion_rate: row.get(5)?,
            updated_at: row.get(6)?,
        },
    ))
}

fn with_day((day, mut metrics): (String, DailyMetrics)) -> Result<DailyMetrics> {
    metrics.day = NaiveDate::parse_from_str(&day, "%Y-%m-%d")?;
    Ok(metrics)
}

/// Insert or overwrite the snapshot for `(tenant_id, day)`.
pub async fn upsert_daily_metrics_inner(db: &DuckDbBackend, metrics: &DailyMetrics) -> Result<()> {
    let conn = db.conn.lock().await;
    conn.execute(
        "INSERT INTO daily_metrics \
             (tenant_id, day, total_sessions, total_bookings, revenue, conversion_rate, updated_at) \
         VALUES (?1, CAST(?2 AS DATE), ?3, ?4, ?5, ?6, CURRENT_TIMESTAMP) \
         ON CONFLICT (tenant_id, day) DO UPDATE SET \
             total_sessions = EXCLUDED.total_sessions, \
             total_bookings = EXCLUDED.total_bookings, \
             revenue = EXCLUDED.revenue, \
             conversion_rate = EXCLUDED.conversion_rate, \
             updated_at = EXCLUDED.updated_at",
        duckdb::params![
            metrics.tenant_id,
            metrics.day.format("%Y-%m-%d").to_string(),
            metrics.total_sessions,
            metrics.total_bookings,
            metrics.revenue,
            metrics.conversion_rate,
        ],
    )?;
    Ok(())
}

pub async fn list_daily_metrics_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    range: &DateRange,
) -> Result<Vec<DailyMetrics>> {
    let conn = db.conn.lock().await;
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM daily_metrics \
         WHERE tenant_id = ?1 AND day >= CAST(?2 AS DATE) AND day <= CAST(?3 AS DATE) \
         ORDER BY day ASC"
    ))?;
    let rows = stmt.query_map(
        duckdb::params![
            tenant_id,
            range.date_from.format("%Y-%m-%d").to_string(),
            range.date_to.format("%Y-%m-%d").to_string(),
        ],
        map_row,
    )?;

    let mut out = Vec::new();
    for row in rows {
        out.push(with_day(row?)?);
    }
    Ok(out)
}

pub async fn get_daily_metrics_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    day: NaiveDate,
) -> Result<Option<DailyMetrics>> {
    let conn = db.conn.lock().await;
    let row = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM daily_metrics WHERE tenant_id = ?1 AND day = CAST(?2 AS DATE)"
        ))?
        .query_row(
            duckdb::params![tenant_id, day.format("%Y-%m-%d").to_string()],
            map_row,
        );
    match row {
        Ok(row) => Ok(Some(with_day(row)?)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
