use std::sync::Once;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::{Any, AnyPool, Transaction};
use tokio::sync::RwLock;

use configuration::{DatabaseSettings, StorageEngine};

use crate::error::DbError;

static DRIVERS: Once = Once::new();

/// Process-wide handle to the connection pool.
///
/// The pool is built lazily: constructing the handle never touches the
/// network, and the first real connection is opened by the first query.
/// A pool that was closed by an earlier teardown is detected during
/// acquisition and swapped for a fresh one, so a cold start that reuses
/// process state never surfaces a "pool closed" failure to callers.
#[derive(Debug)]
pub struct Database {
    settings: DatabaseSettings,
    engine: StorageEngine,
    pool: RwLock<AnyPool>,
}

impl Database {
    /// Creates the pool handle without opening any connections.
    ///
    /// The URL scheme is validated here so a misconfigured deployment
    /// fails at startup rather than on the first request.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Result<Self, DbError> {
        DRIVERS.call_once(sqlx::any::install_default_drivers);

        let engine = settings
            .engine()
            .map_err(|e| DbError::ConnectionConfig(e.to_string()))?;
        let pool = build_pool(settings)?;

        Ok(Self {
            settings: settings.clone(),
            engine,
            pool: RwLock::new(pool),
        })
    }

    /// The engine selected by the connection URL scheme.
    pub fn engine(&self) -> StorageEngine {
        self.engine
    }

    /// Begins a transaction on a pooled connection.
    ///
    /// If the pool turns out to be closed, it is reopened and the
    /// acquisition retried exactly once. Every other failure, including
    /// an acquisition timeout on an exhausted pool, is reported
    /// immediately as `ConnectionUnavailable` rather than retried.
    pub async fn begin(&self) -> Result<Transaction<'static, Any>, DbError> {
        let pool = self.pool.read().await.clone();
        match pool.begin().await {
            Ok(tx) => Ok(tx),
            Err(sqlx::Error::PoolClosed) => {
                self.reopen().await?;
                let pool = self.pool.read().await.clone();
                pool.begin().await.map_err(DbError::ConnectionUnavailable)
            }
            Err(err) => Err(DbError::ConnectionUnavailable(err)),
        }
    }

    /// Replaces a closed pool with a freshly built one.
    ///
    /// Checked again under the write lock so concurrent acquisitions
    /// that all observed the closed pool trigger a single rebuild.
    async fn reopen(&self) -> Result<(), DbError> {
        let mut guard = self.pool.write().await;
        if guard.is_closed() {
            tracing::warn!("connection pool was closed; reopening");
            *guard = build_pool(&self.settings)?;
        }
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections to return.
    /// A later acquisition through this handle reopens transparently.
    pub async fn close(&self) {
        self.pool.read().await.close().await;
    }

    pub async fn is_closed(&self) -> bool {
        self.pool.read().await.is_closed()
    }
}

fn build_pool(settings: &DatabaseSettings) -> Result<AnyPool, DbError> {
    let url = settings
        .connection_url()
        .map_err(|e| DbError::ConnectionConfig(e.to_string()))?;

    AnyPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_lazy(&url)
        .map_err(|e| DbError::ConnectionConfig(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> DatabaseSettings {
        // A single connection keeps every query on the same in-memory
        // database; separate connections would each see an empty one.
        DatabaseSettings {
            max_connections: 1,
            ..DatabaseSettings::for_url("sqlite::memory:")
        }
    }

    #[test]
    fn unknown_scheme_is_rejected_at_construction() {
        let settings = DatabaseSettings::for_url("mysql://localhost/db");
        let err = Database::connect_lazy(&settings).unwrap_err();
        assert!(matches!(err, DbError::ConnectionConfig(_)));
    }

    #[tokio::test]
    async fn construction_does_not_open_a_connection() {
        // A URL pointing at nothing parses fine; only a query would fail.
        let settings = DatabaseSettings::for_url("postgres://nobody@192.0.2.1/nowhere");
        assert!(Database::connect_lazy(&settings).is_ok());
    }

    #[tokio::test]
    async fn closed_pool_is_reopened_on_next_begin() {
        let db = Database::connect_lazy(&memory_settings()).unwrap();

        let tx = db.begin().await.unwrap();
        tx.commit().await.unwrap();

        db.close().await;
        assert!(db.is_closed().await);

        // The next acquisition must succeed against a fresh pool.
        let mut tx = db.begin().await.unwrap();
        sqlx::query("SELECT 1").execute(&mut *tx).await.unwrap();
        tx.commit().await.unwrap();
        assert!(!db.is_closed().await);
    }

    #[tokio::test]
    async fn reopened_pool_reaches_the_same_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("pool.db").display());
        let db = Database::connect_lazy(&DatabaseSettings::for_url(url)).unwrap();

        let mut tx = db.begin().await.unwrap();
        sqlx::query("CREATE TABLE marker (n INTEGER NOT NULL)")
            .execute(&mut *tx)
            .await
            .unwrap();
        sqlx::query("INSERT INTO marker (n) VALUES (7)")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        db.close().await;

        let mut tx = db.begin().await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM marker")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(row.0, 1);
    }

    #[tokio::test]
    async fn exhausted_pool_times_out_instead_of_queueing() {
        let settings = DatabaseSettings {
            max_connections: 1,
            acquire_timeout_secs: 1,
            ..DatabaseSettings::for_url("sqlite::memory:")
        };
        let db = Database::connect_lazy(&settings).unwrap();

        let held = db.begin().await.unwrap();

        let started = std::time::Instant::now();
        let err = db.begin().await.unwrap_err();
        assert!(matches!(
            err,
            DbError::ConnectionUnavailable(sqlx::Error::PoolTimedOut)
        ));
        assert!(started.elapsed() < Duration::from_secs(3));

        held.rollback().await.unwrap();
    }
}
