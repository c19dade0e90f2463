//! # lapak-db: Database Layer for Lapak POS
//!
//! SQLite storage for the transaction engine, on sqlx.
//!
//! ## Architecture Position
//! ```text
//! lapak-engine (coordinator)
//!      │
//!      ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │                   lapak-db (THIS CRATE)                    │
//! │                                                            │
//! │   pool.rs        DbConfig, Database, WAL, busy timeout     │
//! │   migrations.rs  embedded schema migrations                │
//! │   repository/    stores, products, transactions,           │
//! │                  stock ledger, invoice sequence            │
//! └────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite (single file, single writer)
//! ```
//!
//! Repositories expose two conventions: pool-backed instance methods
//! for standalone operations, and associated functions taking
//! `&mut SqliteConnection` for the operations that must run inside the
//! coordinator's atomic commit scope.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::stock::StockLedger;
pub use repository::store::StoreRepository;
pub use repository::transaction::TransactionRepository;

// =============================================================================
// Test Support
// =============================================================================
