use std::sync::Arc;

use sqlx::any::AnyRow;
use sqlx::Row;

use core_types::{Property, PropertyDraft, PropertyStatus};

use crate::connection::Database;
use crate::error::DbError;

const SELECT_ALL: &str =
    "SELECT id, title, address, status FROM properties ORDER BY id DESC";

const INSERT_ONE: &str = "INSERT INTO properties (title, address, status) \
     VALUES ($1, $2, $3) RETURNING id, title, address, status";

const SELECT_ID: &str = "SELECT id FROM properties WHERE id = $1";

const UPDATE_ONE: &str = "UPDATE properties SET title = $1, address = $2, status = $3 \
     WHERE id = $4 RETURNING id, title, address, status";

const DELETE_ONE: &str = "DELETE FROM properties WHERE id = $1";

/// High-level, application-specific interface to the properties table.
///
/// Every method runs inside its own transaction on a freshly acquired
/// connection and finishes it with exactly one commit or one rollback,
/// so no request can leave the store half-written.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    db: Arc<Database>,
}

impl PropertyRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The underlying pool handle, for lifecycle hooks.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Fetches every property, newest first. Descending id order is part
    /// of the API contract: clients show the latest listing on top.
    pub async fn list(&self) -> Result<Vec<Property>, DbError> {
        let mut tx = self.db.begin().await?;
        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(&mut *tx)
            .await
            .map_err(DbError::from_sqlx)?;
        tx.commit().await?;

        rows.iter().map(map_property_row).collect()
    }

    /// Inserts a new property and returns it with the assigned id.
    pub async fn create(&self, draft: &PropertyDraft) -> Result<Property, DbError> {
        let mut tx = self.db.begin().await?;
        let row = sqlx::query(INSERT_ONE)
            .bind(draft.title())
            .bind(draft.address())
            .bind(draft.status().as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(DbError::from_sqlx)?;
        let property = map_property_row(&row)?;
        tx.commit().await?;

        Ok(property)
    }

    /// Replaces every field of an existing property.
    ///
    /// The existence check and the mutation share one transaction, so a
    /// concurrent delete cannot slip in between them. A miss returns
    /// before anything was written and the transaction rolls back on
    /// drop.
    pub async fn update(&self, id: i64, draft: &PropertyDraft) -> Result<Property, DbError> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query(SELECT_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from_sqlx)?;
        if existing.is_none() {
            return Err(DbError::NotFound);
        }

        let row = sqlx::query(UPDATE_ONE)
            .bind(draft.title())
            .bind(draft.address())
            .bind(draft.status().as_str())
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(DbError::from_sqlx)?;
        let property = map_property_row(&row)?;
        tx.commit().await?;

        Ok(property)
    }

    /// Deletes a property by id.
    ///
    /// A delete that touched no row is rolled back explicitly before the
    /// miss is reported, so not even the no-op statement is committed.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query(DELETE_ONE)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from_sqlx)?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

fn map_property_row(row: &AnyRow) -> Result<Property, DbError> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<PropertyStatus>()
        .map_err(|e| DbError::Decode(e.to_string()))?;

    Ok(Property {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        address: row.try_get("address")?,
        status,
    })
}
