//! # Sale Coordinator
//!
//! Turns a cart of line items into a committed sale.
//!
//! ## State machine
//! ```text
//! Received ──► Validated ──► Priced ──► StockChecked ──► Committed
//!     │            │            │             │
//!     └────────────┴────────────┴─────────────┴──► Rejected
//!                                                  (no partial effects)
//! ```
//!
//! ## Atomicity
//! Everything after validation runs on one connection inside one SQLite
//! transaction: invoice counter bump, product loads, header insert, item
//! inserts, stock decrements and movement appends. Commit is the last
//! step; every other exit path rolls the scope back on drop.
//!
//! ## Writer serialization
//! The first statement of the scope is the invoice-counter upsert — a
//! write. SQLite grants the database write lock there, before any stock
//! is read, so two concurrent sales cannot both pass the stock check
//! against the same stale stock value: the second blocks at its first
//! statement until the first commits, then reads the decremented stock.
//! The ledger's guarded decrement and the schema CHECK back this up.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use lapak_core::validation::{
    validate_cart_size, validate_note, validate_payment_amount, validate_quantity,
    validate_rate_bps, validate_uuid,
};
use lapak_core::{
    price_cart, CoreError, Discount, LineInput, Money, MovementType, PaymentType, Product,
    Transaction, TransactionItem, TransactionStatus,
};
use lapak_db::repository::{invoice, transaction};
use lapak_db::{
    Database, DbError, ProductRepository, StockLedger, StoreRepository, TransactionRepository,
};

// =============================================================================
// Request Types
// =============================================================================

/// One cart line of a sale request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
    /// Absent means no discount; a zero amount is a (pointless but
    /// valid) present discount.
    #[serde(default)]
    pub discount: Option<Discount>,
}

/// A request to create a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    pub store_id: String,
    pub cashier_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub lines: Vec<SaleLine>,
    #[serde(default)]
    pub order_discount: Option<Discount>,
    pub payment_amount: Money,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Sale Service
// =============================================================================

/// The transaction coordinator.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    /// Creates a new SaleService.
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Creates a committed sale from a cart, or rejects it.
    ///
    /// ## Guarantees
    /// - all-or-nothing: on any failure no header, item, stock change or
    ///   movement survives
    /// - stock decrements are applied in cart order
    /// - the returned aggregate carries the generated id, invoice number
    ///   and item snapshots
    ///
    /// Creation is not idempotent; retrying a failed call is safe (no
    /// partial state), retrying a successful call sells twice.
    pub async fn create_sale(&self, request: CreateSaleRequest) -> EngineResult<Transaction> {
        validate_request(&request)?;

        debug!(
            store_id = %request.store_id,
            lines = request.lines.len(),
            "Processing sale"
        );

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;
        let now = Utc::now();

        // Invoice number first: this write takes the writer lock for the
        // whole scope (see module docs). The counter bump rolls back
        // with the sale, so rejections leave no numbering gap.
        let invoice_number = invoice::next_invoice_number(&mut tx, &request.store_id, now).await;

        let store = StoreRepository::fetch_active(&mut tx, &request.store_id)
            .await?
            .ok_or_else(|| CoreError::StoreNotFound(request.store_id.clone()))?;

        // Load products in cart order; missing, inactive or foreign
        // products reject the whole sale.
        let mut products: Vec<Product> = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let product =
                ProductRepository::fetch_active(&mut tx, &request.store_id, &line.product_id)
                    .await?
                    .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;
            products.push(product);
        }

        let inputs: Vec<LineInput> = request
            .lines
            .iter()
            .zip(&products)
            .map(|(line, product)| LineInput {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.unit_price(),
                unit_cost: product.unit_cost(),
                quantity: line.quantity,
                discount: line.discount,
            })
            .collect();

        let totals = price_cart(
            &inputs,
            request.order_discount.as_ref(),
            store.tax_rate(),
            request.payment_amount,
        )?;

        if !totals.is_paid() {
            return Err(CoreError::InsufficientPayment {
                total: totals.total,
                payment: request.payment_amount,
            }
            .into());
        }

        // Friendly stock check before writing anything; the ledger's
        // guarded decrement below re-enforces it.
        for (line, product) in request.lines.iter().zip(&products) {
            if product.track_stock && product.stock < line.quantity {
                return Err(CoreError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.stock,
                    requested: line.quantity,
                }
                .into());
            }
        }

        let discount_percent_bps = match request.order_discount {
            Some(Discount::Percent(rate)) => rate.bps() as i64,
            _ => 0,
        };

        let mut sale = Transaction {
            id: transaction::generate_transaction_id(),
            store_id: request.store_id.clone(),
            customer_id: request.customer_id.clone(),
            cashier_id: Some(request.cashier_id.clone()),
            invoice_number,
            subtotal: totals.subtotal.amount(),
            discount_amount: totals.order_discount.amount(),
            discount_percent_bps,
            tax_amount: totals.tax.amount(),
            total: totals.total.amount(),
            payment_amount: request.payment_amount.amount(),
            change_amount: totals.change.amount(),
            payment_type: request.payment_type,
            payment_reference: request.payment_reference.clone(),
            status: TransactionStatus::Completed,
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
            items: Vec::with_capacity(totals.lines.len()),
        };

        TransactionRepository::insert_header(&mut tx, &sale).await?;

        for (position, (priced, product)) in totals.lines.iter().zip(&products).enumerate() {
            let item = TransactionItem {
                id: transaction::generate_item_id(),
                transaction_id: sale.id.clone(),
                product_id: priced.product_id.clone(),
                product_name: priced.name.clone(),
                product_price: priced.unit_price.amount(),
                product_cost: priced.unit_cost.amount(),
                quantity: priced.quantity,
                discount_amount: priced.discount.amount(),
                subtotal: priced.subtotal.amount(),
                position: position as i64,
                created_at: now,
            };
            TransactionRepository::insert_item(&mut tx, &item).await?;

            // Lines for untracked products skip the ledger entirely:
            // no validation, no movement.
            if product.track_stock {
                StockLedger::apply(
                    &mut tx,
                    product,
                    priced.quantity,
                    MovementType::Out,
                    Some(&sale.id),
                    None,
                    Some(&request.cashier_id),
                    now,
                )
                .await
                .map_err(EngineError::from)?;
            }

            sale.items.push(item);
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            transaction_id = %sale.id,
            invoice_number = %sale.invoice_number,
            total = sale.total,
            change = sale.change_amount,
            lines = sale.items.len(),
            "Sale committed"
        );

        Ok(sale)
    }
}

// =============================================================================
// Request Validation
// =============================================================================

/// Rejects malformed requests before any store access.
fn validate_request(request: &CreateSaleRequest) -> Result<(), CoreError> {
    validate_uuid("store_id", &request.store_id)?;
    validate_uuid("cashier_id", &request.cashier_id)?;
    if let Some(customer_id) = &request.customer_id {
        validate_uuid("customer_id", customer_id)?;
    }

    validate_cart_size(request.lines.len())?;
    for line in &request.lines {
        validate_uuid("product_id", &line.product_id)?;
        validate_quantity(line.quantity)?;
        if let Some(Discount::Percent(rate)) = &line.discount {
            validate_rate_bps(rate.bps())?;
        }
    }

    if let Some(Discount::Percent(rate)) = &request.order_discount {
        validate_rate_bps(rate.bps())?;
    }
    validate_payment_amount(request.payment_amount.amount())?;
    validate_note(request.notes.as_deref())?;

    Ok(())
}
