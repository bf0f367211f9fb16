use anyhow::Result;

use amica_core::user::{NewUserRecord, Role, User, UserRecord};

use crate::DuckDbBackend;

const USER_COLUMNS: &str = "id, email, role, tenant_id, first_name, last_name, active, \
     CAST(created_at AS VARCHAR), encrypted_password";

/// Raw row; `role` is parsed outside the row closure so a bad value surfaces
/// as a typed error instead of a column conversion failure.
struct UserRow {
    id: i64,
    email: String,
    role: String,
    tenant_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    active: bool,
    created_at: String,
    password_hash: String,
}

fn map_row(row: &duckdb::Row<'_>) -> duckdb::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        role: row.get(2)?,
        tenant_id: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        active: row.get(6)?,
        created_at: row.get(7)?,
        password_hash: row.get(8)?,
    })
}

impl UserRow {
    fn into_record(self) -> Result<UserRecord> {
        Ok(UserRecord {
            user: User {
                id: self.id,
                email: self.email,
                role: Role::parse(&self.role)?,
                tenant_id: self.tenant_id,
                first_name: self.first_name,
                last_name: self.last_name,
                active: self.active,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        })
    }
}

impl DuckDbBackend {
    pub async fn lookup_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().await;
        let row = conn
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM dashboard_users WHERE email = ?1"
            ))?
            .query_row(duckdb::params![email], map_row);
        match row {
            Ok(row) => Ok(Some(row.into_record()?)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        let row = conn
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM dashboard_users WHERE id = ?1"
            ))?
            .query_row(duckdb::params![user_id], map_row);
        match row {
            Ok(row) => Ok(Some(row.into_record()?.user)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM dashboard_users ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], map_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.into_record()?.user);
        }
        Ok(users)
    }

    /// Insert a user. Returns `Ok(None)` if the email is already registered.
    pub async fn create_user(&self, new_user: NewUserRecord) -> Result<Option<User>> {
        let conn = self.conn.lock().await;

        let taken: i64 = conn
            .prepare("SELECT COUNT(*) FROM dashboard_users WHERE email = ?1")?
            .query_row(duckdb::params![new_user.email], |row| row.get(0))?;
        if taken > 0 {
            return Ok(None);
        }

        let id: i64 = conn
            .prepare(
                "INSERT INTO dashboard_users \
                     (email, encrypted_password, role, tenant_id, first_name, last_name, active, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, true, CURRENT_TIMESTAMP) \
                 RETURNING id",
            )?
            .query_row(
                duckdb::params![
                    new_user.email,
                    new_user.password_hash,
                    new_user.role.as_str(),
                    new_user.tenant_id,
                    new_user.first_name,
                    new_user.last_name,
                ],
                |row| row.get(0),
            )?;

        let row = conn
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM dashboard_users WHERE id = ?1"
            ))?
            .query_row(duckdb::params![id], map_row)?;
        Ok(Some(row.into_record()?.user))
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute(
            "DELETE FROM dashboard_users WHERE id = ?1",
            duckdb::params![user_id],
        )?;
        Ok(deleted > 0)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM dashboard_users")?
            .query_row([], |row| row.get(0))?;
        Ok(count)
    }

    /// Flip the `active` flag. Inactive users cannot log in.
    pub async fn set_user_active(&self, user_id: i64, active: bool) -> Result<bool> {
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE dashboard_users SET active = ?1 WHERE id = ?2",
            duckdb::params![active, user_id],
        )?;
        Ok(updated > 0)
    }
}
