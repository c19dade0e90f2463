//! # lapak-engine: Transaction Processing Engine
//!
//! The coordinator layer of Lapak POS: the only place a sale commit
//! scope is opened.
//!
//! ## Control Flow
//! ```text
//! caller submits cart
//!      │
//!      ▼
//! SaleService::create_sale
//!      ├── validate request shape           (lapak-core::validation)
//!      ├── BEGIN; bump invoice counter      (writer lock taken here)
//!      ├── load store + products            (same scope)
//!      ├── price_cart                       (lapak-core::pricing, pure)
//!      ├── payment / stock checks           (reject → rollback)
//!      ├── insert header, items;
//!      │   ledger.apply(out) per tracked line
//!      └── COMMIT → populated Transaction aggregate
//! ```
//!
//! Failures before COMMIT leave no observable state: no header, no
//! items, no stock change, no movements, no counter bump.
//!
//! ## Services
//! - [`SaleService`] - the sale coordinator
//! - [`StockService`] - manual stock in/out and inventory queries

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod sale;
pub mod stock;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use sale::{CreateSaleRequest, SaleLine, SaleService};
pub use stock::{StockAdjustment, StockService};
