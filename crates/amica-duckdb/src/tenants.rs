use anyhow::Result;

use amica_core::tenant::{Tenant, TenantSummary};

use crate::backend::parse_json_column;
use crate::DuckDbBackend;

impl DuckDbBackend {
    pub async fn list_tenants(&self) -> Result<Vec<TenantSummary>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, name FROM tenants ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(TenantSummary {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut tenants = Vec::new();
        for row in rows {
            tenants.push(row?);
        }
        Ok(tenants)
    }

    pub async fn get_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>> {
        let conn = self.conn.lock().await;
        let row = conn
            .prepare(
                "SELECT id, name, metadata, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR) \
                 FROM tenants WHERE id = ?1",
            )?
            .query_row(duckdb::params![tenant_id], |row| {
                let metadata: Option<String> = row.get(2)?;
                Ok((
                    Tenant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        metadata: serde_json::Value::Null,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    },
                    metadata,
                ))
            });
        match row {
            Ok((mut tenant, metadata)) => {
                tenant.metadata = parse_json_column(metadata);
                Ok(Some(tenant))
            }
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the metadata document and bump `updated_at`.
    pub async fn update_tenant_metadata(
        &self,
        tenant_id: &str,
        metadata: &serde_json::Value,
    ) -> Result<bool> {
        let raw = serde_json::to_string(metadata)?;
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE tenants SET metadata = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            duckdb::params![raw, tenant_id],
        )?;
        Ok(updated > 0)
    }

    /// Insert a tenant if it does not exist yet.
    pub async fn seed_tenant(
        &self,
        tenant_id: &str,
        name: &str,
        metadata: &serde_json::Value,
    ) -> Result<()> {
        let raw = serde_json::to_string(metadata)?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR IGNORE INTO tenants (id, name, metadata, created_at, updated_at) \
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![tenant_id, name, raw],
        )?;
        Ok(())
    }
}
