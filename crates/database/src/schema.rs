use configuration::StorageEngine;

use crate::connection::Database;
use crate::error::DbError;

// Both statements create the same logical table: a monotonically
// assigned integer key plus a CHECK on status, so a write that slips
// past application validation still fails at the storage layer.
const CREATE_PROPERTIES_POSTGRES: &str = "\
CREATE TABLE IF NOT EXISTS properties (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    address TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('active', 'inactive'))
)";

// AUTOINCREMENT keeps SQLite from reusing the id of a deleted row.
const CREATE_PROPERTIES_SQLITE: &str = "\
CREATE TABLE IF NOT EXISTS properties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    address TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('active', 'inactive'))
)";

/// Ensures the properties table exists. Idempotent, so it is safe to run
/// on every startup against a database that already has data.
pub async fn ensure_schema(db: &Database) -> Result<(), DbError> {
    let ddl = match db.engine() {
        StorageEngine::Postgres => CREATE_PROPERTIES_POSTGRES,
        StorageEngine::Sqlite => CREATE_PROPERTIES_SQLITE,
    };

    let mut tx = db.begin().await?;
    sqlx::query(ddl).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::DatabaseSettings;

    async fn memory_db() -> Database {
        let settings = DatabaseSettings {
            max_connections: 1,
            ..DatabaseSettings::for_url("sqlite::memory:")
        };
        Database::connect_lazy(&settings).unwrap()
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let db = memory_db().await;
        ensure_schema(&db).await.unwrap();
        ensure_schema(&db).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        sqlx::query("INSERT INTO properties (title, address, status) VALUES ('a', 'b', 'active')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn check_constraint_rejects_statuses_outside_the_set() {
        let db = memory_db().await;
        ensure_schema(&db).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let err = sqlx::query(
            "INSERT INTO properties (title, address, status) VALUES ('a', 'b', 'pending')",
        )
        .execute(&mut *tx)
        .await
        .map_err(DbError::from_sqlx)
        .unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(err, DbError::ConstraintViolation(_)));
    }
}
