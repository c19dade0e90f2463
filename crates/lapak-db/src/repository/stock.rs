//! # Stock Ledger
//!
//! The single write path for product stock. Every stock-affecting
//! operation — a sale line, a manual stock-in, a manual stock-out —
//! goes through [`StockLedger::apply`], which mutates the product row
//! and appends an immutable [`StockMovement`] in the same scope.
//!
//! ## Consistency Invariant
//! ```text
//! movement.stock_after == movement.stock_before ± quantity
//! movement.stock_after == products.stock  (at the instant of the move)
//! ```
//!
//! Both hold by construction: the decrement is a single guarded
//!
//! ```sql
//! UPDATE products SET stock = stock - ?, updated_at = ?
//! WHERE id = ? AND stock >= ?
//! RETURNING stock
//! ```
//!
//! so `stock_after` is read from the very statement that changed the
//! row, and a decrement that would go negative matches zero rows and
//! fails instead of clamping. Increases are the unguarded mirror (no
//! upper bound).

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, LedgerError};
use lapak_core::{MovementType, Product, StockMovement};

const MOVEMENT_COLUMNS: &str =
    "id, product_id, store_id, movement_type, quantity, stock_before, stock_after, \
     reference_id, notes, created_by, created_at";

/// The stock ledger: guarded stock mutations plus the movement audit trail.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    /// Creates a new StockLedger.
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Applies a stock change inside an enclosing commit scope.
    ///
    /// ## Arguments
    /// * `conn` - the commit scope's connection
    /// * `product` - the product row as loaded in this same scope
    /// * `quantity` - positive number of units to move
    /// * `direction` - `In` (increase) or `Out` (decrease)
    /// * `reference_id` - originating transaction, for sale lines
    /// * `notes` / `actor` - audit context for manual adjustments
    ///
    /// ## Errors
    /// * [`LedgerError::Insufficient`] - a decrease exceeds available
    ///   stock; carries the product name for caller messaging
    /// * [`LedgerError::ProductMissing`] - the row vanished from the
    ///   scope (should not happen when the caller loaded it here)
    #[allow(clippy::too_many_arguments)]
    pub async fn apply(
        conn: &mut SqliteConnection,
        product: &Product,
        quantity: i64,
        direction: MovementType,
        reference_id: Option<&str>,
        notes: Option<&str>,
        actor: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<StockMovement, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::NonPositiveQuantity);
        }

        let stock_after: Option<i64> = match direction {
            MovementType::Out => {
                sqlx::query_scalar(
                    "UPDATE products SET stock = stock - ?1, updated_at = ?2 \
                     WHERE id = ?3 AND stock >= ?1 RETURNING stock",
                )
                .bind(quantity)
                .bind(now)
                .bind(&product.id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?
            }
            MovementType::In => {
                sqlx::query_scalar(
                    "UPDATE products SET stock = stock + ?1, updated_at = ?2 \
                     WHERE id = ?3 RETURNING stock",
                )
                .bind(quantity)
                .bind(now)
                .bind(&product.id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?
            }
        };

        let Some(stock_after) = stock_after else {
            return match direction {
                MovementType::Out => Err(LedgerError::Insufficient {
                    name: product.name.clone(),
                    available: product.stock,
                    requested: quantity,
                }),
                MovementType::In => Err(LedgerError::ProductMissing(product.id.clone())),
            };
        };

        let stock_before = match direction {
            MovementType::In => stock_after - quantity,
            MovementType::Out => stock_after + quantity,
        };

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            store_id: product.store_id.clone(),
            movement_type: direction,
            quantity,
            stock_before,
            stock_after,
            reference_id: reference_id.map(str::to_string),
            notes: notes.map(str::to_string),
            created_by: actor.map(str::to_string),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, product_id, store_id, movement_type, quantity,
                stock_before, stock_after, reference_id, notes, created_by, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(&movement.store_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(movement.stock_before)
        .bind(movement.stock_after)
        .bind(&movement.reference_id)
        .bind(&movement.notes)
        .bind(&movement.created_by)
        .bind(movement.created_at)
        .execute(conn)
        .await
        .map_err(DbError::from)?;

        debug!(
            product_id = %movement.product_id,
            ?direction,
            quantity,
            stock_before,
            stock_after,
            "Stock movement applied"
        );

        Ok(movement)
    }

    /// Lists the movement history for a product, newest first.
    pub async fn movements_for_product(
        &self,
        store_id: &str,
        product_id: &str,
    ) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements \
             WHERE store_id = ?1 AND product_id = ?2 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(store_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Counts all movements (diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
