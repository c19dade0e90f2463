//! # Domain Types
//!
//! Core domain types used throughout Lapak POS.
//!
//! ## Type Hierarchy
//! ```text
//! Product ──────┐
//!               ├──► Transaction ──► TransactionItem (snapshot, 1:N)
//! Store (tax) ──┘         │
//!                         └──► StockMovement (audit trail, 0:N)
//!
//! Rate   - percentages in basis points (1000 = 10%)
//! Discount - tagged amount-or-percent, absent when None
//! ```
//!
//! ## Dual representation
//! Monetary columns are stored as raw `i64` rupiah on the row structs
//! (so `FromRow` maps them directly); accessor methods lift them into
//! [`Money`](crate::money::Money) for arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. Integer bps keep percent math exact:
/// 1000 bps = 10% (the common Indonesian PPN-like store rate), 250 bps
/// = 2.5%. Used for both the store tax rate and percent discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percent(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount, either a flat amount or a percentage of the base.
///
/// Cart lines and the order carry `Option<Discount>`: `None` means "no
/// discount", distinct from a zero amount. The original pairing of
/// amount/percent fields (percent winning when > 0) becomes structural —
/// a value is exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discount {
    /// Flat discount in rupiah.
    Amount(Money),
    /// Percentage of the amount it applies to, in basis points.
    Percent(Rate),
}

// =============================================================================
// Store
// =============================================================================

/// A store (tenant): owns products, transactions and stock independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub id: String,
    pub name: String,
    /// Store-level tax rate in basis points (1000 = 10%).
    pub tax_rate_bps: i64,
    /// ISO currency code; informational, the engine assumes whole units.
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Returns the tax rate as a [`Rate`].
    #[inline]
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps as u32)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store this product belongs to.
    pub store_id: String,

    /// Display name shown to cashier and on receipts.
    pub name: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Stock Keeping Unit - optional business identifier.
    pub sku: Option<String>,

    /// Unit price in rupiah.
    pub price: i64,

    /// Unit cost in rupiah (for profit margin reporting).
    pub cost: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Minimum-stock threshold for low-stock alerts.
    pub min_stock: i64,

    /// Sales unit ("pcs", "kg", ...).
    pub unit: String,

    /// Whether inventory is enforced and recorded for this product.
    pub track_stock: bool,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::new(self.price)
    }

    /// Returns the unit cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::new(self.cost)
    }

    /// Checks whether a quantity can be sold from current stock.
    ///
    /// Products that don't track stock can always be sold.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        !self.track_stock || self.stock >= quantity
    }

    /// Checks whether the product is at or below its minimum stock.
    pub fn is_low_stock(&self) -> bool {
        self.track_stock && self.stock <= self.min_stock
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// The status of a sales transaction.
///
/// A transaction is immutable once `Completed`; `Voided` exists as the
/// extension point for a future void/refund flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Voided,
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a sale was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Cash,
    Qris,
    Transfer,
    Debit,
    Credit,
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed point-of-sale transaction with fixed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub store_id: String,
    pub customer_id: Option<String>,
    pub cashier_id: Option<String>,
    /// Human-readable identifier, unique within the store.
    pub invoice_number: String,
    /// Sum of line subtotals (after line discounts), rupiah.
    pub subtotal: i64,
    /// Order-level discount actually applied, rupiah.
    pub discount_amount: i64,
    /// Order-level percent discount in bps; 0 when a flat amount was used.
    pub discount_percent_bps: i64,
    pub tax_amount: i64,
    pub total: i64,
    pub payment_amount: i64,
    pub change_amount: i64,
    pub payment_type: PaymentType,
    pub payment_reference: Option<String>,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Line items in cart order. Loaded separately from the header row.
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<TransactionItem>,
}

// =============================================================================
// Transaction Item
// =============================================================================

/// A line item in a transaction.
///
/// Uses the snapshot pattern: name, price and cost are frozen at sale
/// time and stay valid when the product is later edited or deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price in rupiah at time of sale (frozen).
    pub product_price: i64,
    /// Unit cost in rupiah at time of sale (frozen).
    pub product_cost: i64,
    pub quantity: i64,
    /// Line discount actually applied, rupiah.
    pub discount_amount: i64,
    /// Line total after discount, rupiah.
    pub subtotal: i64,
    /// Zero-based cart position; fixes the audit ordering of lines.
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
}

/// An immutable audit record of a single stock quantity change.
///
/// Append-only: movements are never updated or deleted. The consistency
/// invariant tying ledger to catalog is
/// `stock_after = stock_before ± quantity`, with `stock_after` equal to
/// the product's stock immediately after the movement is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub store_id: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    /// Originating transaction, when the movement came from a sale.
    pub reference_id: Option<String>,
    pub notes: Option<String>,
    /// Actor (cashier/staff) who caused the movement.
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Checks the before/after/quantity consistency invariant.
    pub fn is_balanced(&self) -> bool {
        match self.movement_type {
            MovementType::In => self.stock_after == self.stock_before + self.quantity,
            MovementType::Out => self.stock_after == self.stock_before - self.quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
