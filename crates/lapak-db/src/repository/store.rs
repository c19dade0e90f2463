//! # Store Repository
//!
//! Database operations for stores. Store CRUD itself is an external
//! concern; the engine only needs to load the active store row (tax
//! rate, currency) inside a commit scope, plus seeding for tests.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lapak_core::Store;

const STORE_COLUMNS: &str = "id, name, tax_rate_bps, currency, is_active, created_at, updated_at";

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Gets a store by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Inserts a store.
    pub async fn insert(&self, store: &Store) -> DbResult<()> {
        debug!(id = %store.id, name = %store.name, "Inserting store");

        sqlx::query(
            r#"
            INSERT INTO stores (id, name, tax_rate_bps, currency, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(store.tax_rate_bps)
        .bind(&store.currency)
        .bind(store.is_active)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads an active store inside an enclosing commit scope.
    ///
    /// The tax rate read here is the one the sale is priced with, so the
    /// read happens on the scope's connection.
    pub async fn fetch_active(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(store)
    }
}
