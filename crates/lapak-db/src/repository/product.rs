//! # Product Repository
//!
//! Database operations for products.
//!
//! Catalog CRUD is thin and mostly external; what matters to the engine
//! is `fetch_active` — the store-scoped product load that runs on the
//! commit scope's connection so a sale prices and checks stock against
//! the same row state it will decrement.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use lapak_core::Product;

const PRODUCT_COLUMNS: &str = "id, store_id, name, barcode, sku, price, cost, stock, min_stock, \
                               unit, track_stock, is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID, scoped to a store.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - product found (active or not)
    /// * `Ok(None)` - no such product in this store
    pub async fn get(&self, store_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND store_id = ?2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, store_id, name, barcode, sku,
                price, cost, stock, min_stock, unit,
                track_stock, is_active, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.sku)
        .bind(product.price)
        .bind(product.cost)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.unit)
        .bind(product.track_stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists tracked, active products at or below their minimum stock.
    pub async fn list_low_stock(&self, store_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE store_id = ?1
              AND is_active = 1
              AND track_stock = 1
              AND stock <= min_stock
            ORDER BY stock ASC
            "#
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Loads an active product inside an enclosing commit scope.
    ///
    /// Missing, inactive, or belonging to another store all read as
    /// `None` — the caller rejects them uniformly.
    pub async fn fetch_active(
        conn: &mut SqliteConnection,
        store_id: &str,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = ?1 AND store_id = ?2 AND is_active = 1"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
