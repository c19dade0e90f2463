//! # Manual Stock Operations
//!
//! Stock-in (restocking, returns to shelf) and stock-out (damage,
//! shrinkage, manual correction) outside of a sale. Same shape as a
//! sale commit: load the product and apply the ledger change on one
//! connection inside one transaction, so the movement and the product
//! row can never diverge.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineResult;
use lapak_core::validation::{validate_note, validate_quantity, validate_uuid};
use lapak_core::{CoreError, MovementType, Product, StockMovement};
use lapak_db::{Database, DbError, ProductRepository, StockLedger};

// =============================================================================
// Request Types
// =============================================================================

/// A manual stock adjustment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    /// Staff member making the adjustment.
    #[serde(default)]
    pub actor_id: Option<String>,
}

// =============================================================================
// Stock Service
// =============================================================================

/// Manual stock operations and inventory queries.
#[derive(Debug, Clone)]
pub struct StockService {
    db: Database,
}

impl StockService {
    /// Creates a new StockService.
    pub fn new(db: Database) -> Self {
        StockService { db }
    }

    /// Adds stock to a product, recording an `in` movement.
    pub async fn stock_in(
        &self,
        store_id: &str,
        adjustment: StockAdjustment,
    ) -> EngineResult<StockMovement> {
        self.adjust(store_id, adjustment, MovementType::In).await
    }

    /// Removes stock from a product, recording an `out` movement.
    ///
    /// Fails with `InsufficientStock` when the product holds less than
    /// the requested quantity; nothing is recorded in that case.
    pub async fn stock_out(
        &self,
        store_id: &str,
        adjustment: StockAdjustment,
    ) -> EngineResult<StockMovement> {
        self.adjust(store_id, adjustment, MovementType::Out).await
    }

    async fn adjust(
        &self,
        store_id: &str,
        adjustment: StockAdjustment,
        direction: MovementType,
    ) -> EngineResult<StockMovement> {
        validate_uuid("store_id", store_id)?;
        validate_uuid("product_id", &adjustment.product_id)?;
        validate_quantity(adjustment.quantity)?;
        validate_note(adjustment.notes.as_deref())?;
        if let Some(actor_id) = &adjustment.actor_id {
            validate_uuid("actor_id", actor_id)?;
        }

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let product = ProductRepository::fetch_active(&mut tx, store_id, &adjustment.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(adjustment.product_id.clone()))?;

        let movement = StockLedger::apply(
            &mut tx,
            &product,
            adjustment.quantity,
            direction,
            None,
            adjustment.notes.as_deref(),
            adjustment.actor_id.as_deref(),
            Utc::now(),
        )
        .await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            product_id = %movement.product_id,
            ?direction,
            quantity = movement.quantity,
            stock_after = movement.stock_after,
            "Manual stock adjustment applied"
        );

        Ok(movement)
    }

    /// Lists tracked, active products at or below their minimum stock.
    pub async fn low_stock(&self, store_id: &str) -> EngineResult<Vec<Product>> {
        validate_uuid("store_id", store_id)?;
        Ok(self.db.products().list_low_stock(store_id).await?)
    }

    /// Returns the movement history for a product, newest first.
    pub async fn movements(
        &self,
        store_id: &str,
        product_id: &str,
    ) -> EngineResult<Vec<StockMovement>> {
        validate_uuid("store_id", store_id)?;
        validate_uuid("product_id", product_id)?;
        Ok(self
            .db
            .stock()
            .movements_for_product(store_id, product_id)
            .await?)
    }
}
