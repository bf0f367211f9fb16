use anyhow::Result;

use amica_core::wishlist::{StatusChange, WishlistItem, WishlistRow, WishlistStatus};

use crate::backend::parse_json_column;
use crate::DuckDbBackend;

pub async fn fetch_wishlist_rows_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
) -> Result<Vec<WishlistRow>> {
    let conn = db.conn.lock().await;
    let mut stmt = conn.prepare("SELECT status, amount FROM wishlist_items WHERE tenant_id = ?1")?;
    let rows = stmt.query_map(duckdb::params![tenant_id], |row| {
        Ok(WishlistRow {
            status: row.get(0)?,
            amount: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub async fn list_wishlist_items_inner(
    db: &DuckDbBackend,
    tenant_id: &str,
    status: Option<WishlistStatus>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<WishlistItem>, i64)> {
    let conn = db.conn.lock().await;

    let mut filter_sql = String::from("w.tenant_id = ?1");
    let mut params: Vec<Box<dyn duckdb::types::ToSql>> = vec![Box::new(tenant_id.to_string())];
    if let Some(status) = status {
        filter_sql.push_str(" AND w.status = ?2");
        params.push(Box::new(status.as_str().to_string()));
    }
    let next_idx = params.len() + 1;

    let total: i64 = {
        let param_refs: Vec<&dyn duckdb::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        conn.prepare(&format!(
            "SELECT COUNT(*) FROM wishlist_items w WHERE {filter_sql}"
        ))?
        .query_row(param_refs.as_slice(), |row| row.get(0))?
    };

    let sql = format!(
        "SELECT w.id, w.tenant_id, w.user_id, w.item_type, w.item_id, w.source, w.comment, \
                w.status, w.amount, w.meta, CAST(w.created_at AS VARCHAR), \
                CAST(w.processed_at AS VARCHAR), c.full_name, c.phone \
         FROM wishlist_items w \
         LEFT JOIN clients c ON c.id = w.user_id AND c.tenant_id = w.tenant_id \
         WHERE {filter_sql} \
         ORDER BY w.created_at DESC, w.id DESC \
         LIMIT ?{} OFFSET ?{}",
        next_idx,
        next_idx + 1
    );
    params.push(Box::new(limit));
    params.push(Box::new(offset));
    let param_refs: Vec<&dyn duckdb::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        let meta: Option<String> = row.get(9)?;
        Ok((
            WishlistItem {
                id: row.get(0)?,
                tenant_id: row.get(1)?,
                user_id: row.get(2)?,
                item_type: row.get(3)?,
                item_id: row.get(4)?,
                source: row.get(5)?,
                comment: row.get(6)?,
                status: row.get(7)?,
                amount: row.get(8)?,
                meta: serde_json::Value::Null,
                created_at: row.get(10)?,
                processed_at: row.get(11)?,
                client_name: row.get(12)?,
                client_phone: row.get(13)?,
            },
            meta,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (mut item, meta) = row?;
        item.meta = parse_json_column(meta);
        items.push(item);
    }
    Ok((items, total))
}

pub async fn update_wishlist_item_inner(
    db: &DuckDbBackend,
    item_id: i64,
    tenant_id: &str,
    change: &StatusChange,
) -> Result<bool> {
    let conn = db.conn.lock().await;
    let sql = if change.marks_processed() {
        "UPDATE wishlist_items SET status = ?1, amount = ?2, processed_at = CURRENT_TIMESTAMP \
         WHERE id = ?3 AND tenant_id = ?4"
    } else {
        "UPDATE wishlist_items SET status = ?1, amount = ?2, processed_at = NULL \
         WHERE id = ?3 AND tenant_id = ?4"
    };
    let updated = conn.execute(
        sql,
        duckdb::params![change.status.as_str(), change.amount, item_id, tenant_id],
    )?;
    Ok(updated > 0)
}

pub async fn delete_wishlist_item_inner(
    db: &DuckDbBackend,
    item_id: i64,
    tenant_id: &str,
) -> Result<bool> {
    let conn = db.conn.lock().await;
    let deleted = conn.execute(
        "DELETE FROM wishlist_items WHERE id = ?1 AND tenant_id = ?2",
        duckdb::params![item_id, tenant_id],
    )?;
    Ok(deleted > 0)
}
