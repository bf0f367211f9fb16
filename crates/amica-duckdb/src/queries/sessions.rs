use anyhow::Result;

use amica_core::range::DateRange;
use amica_core::session::{
    ConversationSession, FinalStatus, FunnelRow, HistoryMessage, SessionCounts, SessionFilter,
};

use crate::backend::parse_json_column;
use crate::DuckDbBackend;

/// `started_at` inside the inclusive calendar-day range. Expects the start
/// and end bounds at `?2` and `?3`.
const RANGE_SQL: &str = "started_at >= CAST(?2 AS TIMESTAMP) AND started_at < CAST(?3 AS TIMESTAMP)";

pub async fn fetch_funnel_rows_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    range: &DateRange,
) -> Result<Vec<FunnelRow>> {
    let conn = db.conn.lock().await;
    let sql = format!(
        "SELECT meta, final_status FROM conversation_sessions \
         WHERE tenant_id = ?1 AND {RANGE_SQL}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        duckdb::params![tenant_id, range.start_bound(), range.end_bound_exclusive()],
        |row| {
            let meta: Option<String> = row.get(0)?;
            let status: String = row.get(1)?;
            Ok((meta, status))
        },
    )?;

    let mut out = Vec::new();
    for row in rows {
        let (meta, status) = row?;
        out.push(FunnelRow {
            meta: parse_json_column(meta),
            final_status: FinalStatus::parse(&status),
        });
    }
    Ok(out)
}

pub async fn fetch_session_counts_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    range: &DateRange,
) -> Result<SessionCounts> {
    let conn = db.conn.lock().await;
    let start = range.start_bound();
    let end = range.end_bound_exclusive();

    let total: i64 = conn
        .prepare(&format!(
            "SELECT COUNT(*) FROM conversation_sessions WHERE tenant_id = ?1 AND {RANGE_SQL}"
        ))?
        .query_row(duckdb::params![tenant_id, start, end], |row| row.get(0))?;

    let mut stmt = conn.prepare(&format!(
        "SELECT booking_amount FROM conversation_sessions \
         WHERE tenant_id = ?1 AND {RANGE_SQL} AND booking_id IS NOT NULL"
    ))?;
    let rows = stmt.query_map(duckdb::params![tenant_id, start, end], |row| {
        row.get::<_, Option<f64>>(0)
    })?;
    let mut booked_amounts = Vec::new();
    for row in rows {
        booked_amounts.push(row?);
    }

    Ok(SessionCounts {
        total,
        booked_amounts,
    })
}

pub async fn list_sessions_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    filter: &SessionFilter,
) -> Result<(Vec<ConversationSession>, i64)> {
    let conn = db.conn.lock().await;

    let mut filter_sql = String::from("s.tenant_id = ?1");
    let mut params: Vec<Box<dyn duckdb::types::ToSql>> = vec![Box::new(tenant_id.to_string())];
    let mut param_idx = 2;
    if let Some(ref status) = filter.status {
        filter_sql.push_str(&format!(" AND s.final_status = ?{param_idx}"));
        params.push(Box::new(status.clone()));
        param_idx += 1;
    }
    if let Some(ref range) = filter.range {
        filter_sql.push_str(&format!(
            " AND s.started_at >= CAST(?{} AS TIMESTAMP) AND s.started_at < CAST(?{} AS TIMESTAMP)",
            param_idx,
            param_idx + 1
        ));
        params.push(Box::new(range.start_bound()));
        params.push(Box::new(range.end_bound_exclusive()));
        param_idx += 2;
    }

    let total: i64 = {
        let param_refs: Vec<&dyn duckdb::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        conn.prepare(&format!(
            "SELECT COUNT(*) FROM conversation_sessions s WHERE {filter_sql}"
        ))?
        .query_row(param_refs.as_slice(), |row| row.get(0))?
    };

    let sql = format!(
        "SELECT s.id, s.session_id, s.tenant_id, s.user_id, s.channel, \
                CAST(s.started_at AS VARCHAR), CAST(s.ended_at AS VARCHAR), s.duration_sec, \
                s.final_status, s.final_intent, s.booking_id, s.booking_amount, \
                s.messages_count, s.meta, c.full_name \
         FROM conversation_sessions s \
         LEFT JOIN clients c ON c.id = s.user_id AND c.tenant_id = s.tenant_id \
         WHERE {filter_sql} \
         ORDER BY s.started_at DESC, s.id DESC \
         LIMIT ?{} OFFSET ?{}",
        param_idx,
        param_idx + 1
    );
    params.push(Box::new(filter.limit));
    params.push(Box::new(filter.offset));
    let param_refs: Vec<&dyn duckdb::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        let status: String = row.get(8)?;
        let meta: Option<String> = row.get(13)?;
        Ok((
            ConversationSession {
                id: row.get(0)?,
                session_id: row.get(1)?,
                tenant_id: row.get(2)?,
                user_id: row.get(3)?,
                channel: row.get(4)?,
                started_at: row.get(5)?,
                ended_at: row.get(6)?,
                duration_sec: row.get(7)?,
                status_tone: FinalStatus::parse(&status).tone(),
                final_status: FinalStatus::parse(&status),
                final_intent: row.get(9)?,
                booking_id: row.get(10)?,
                booking_amount: row.get(11)?,
                messages_count: row.get(12)?,
                meta: serde_json::Value::Null,
                client_name: row.get(14)?,
            },
            meta,
        ))
    })?;

    let mut sessions = Vec::new();
    for row in rows {
        let (mut session, meta) = row?;
        session.meta = parse_json_column(meta);
        sessions.push(session);
    }
    Ok((sessions, total))
}

pub async fn session_history_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    session_id: &str,
) -> Result<Option<Vec<HistoryMessage>>> {
    let conn = db.conn.lock().await;

    let owned: i64 = conn
        .prepare(
            "SELECT COUNT(*) FROM conversation_sessions WHERE session_id = ?1 AND tenant_id = ?2",
        )?
        .query_row(duckdb::params![session_id, tenant_id], |row| row.get(0))?;
    if owned == 0 {
        return Ok(None);
    }

    let mut stmt = conn.prepare(
        "SELECT role, message, CAST(created_at AS VARCHAR) FROM session_messages \
         WHERE session_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(duckdb::params![session_id], |row| {
        Ok(HistoryMessage {
            role: row.get(0)?,
            message: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(row?);
    }
    Ok(Some(messages))
}
