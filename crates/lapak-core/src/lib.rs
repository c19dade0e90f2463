//! # lapak-core: Pure Business Logic for Lapak POS
//!
//! This crate is the heart of the transaction engine. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                  HTTP / API layer (external)                  │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼────────────────────────────────┐
//! │                  lapak-engine (coordinator)                   │
//! │      create_sale, stock in/out — atomic commit scopes         │
//! └───────────────┬──────────────────────────────┬────────────────┘
//!                 │                              │
//! ┌───────────────▼───────────────┐  ┌───────────▼────────────────┐
//! │   ★ lapak-core (THIS CRATE) ★ │  │         lapak-db           │
//! │                               │  │  SQLite repositories,      │
//! │  money • types • pricing      │  │  stock ledger, invoice     │
//! │  validation • errors          │  │  sequence, migrations      │
//! │                               │  └────────────────────────────┘
//! │  NO I/O • NO DATABASE         │
//! │  PURE FUNCTIONS               │
//! └───────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output — the pricing
//!    calculator takes the store tax rate as a parameter instead of
//!    reading ambient configuration
//! 2. **No I/O**: database, network and file access are forbidden here
//! 3. **Integer money**: all monetary values are whole rupiah (i64),
//!    rounded half-up at each derived field
//! 4. **Explicit errors**: typed enums, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price_cart, LineInput, PricedLine, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Guards against fat-finger quantities (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum length of free-text notes on requests.
pub const MAX_NOTE_LENGTH: usize = 500;
