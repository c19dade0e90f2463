//! # Error Types
//!
//! Domain-specific error types for lapak-core.
//!
//! ## Error Hierarchy
//! ```text
//! lapak-core errors (this file)
//! ├── CoreError        - Sale rejection reasons and domain failures
//! └── ValidationError  - Input validation failures
//!
//! lapak-db errors (separate crate)
//! ├── DbError          - Database operation failures
//! └── LedgerError      - Stock ledger failures (wraps DbError)
//!
//! lapak-engine errors
//! └── EngineError      - Rejected (client) vs Persistence (server)
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant except `Validation` corresponds to one rejection reason a
/// sale can fail with before anything is persisted.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Store cannot be found or is inactive.
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product id doesn't exist in the store
    /// - Product belongs to a different store
    /// - Product was deactivated (soft delete)
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete a sale or manual stock-out.
    ///
    /// Carries the product name so the caller can show which line failed.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Tendered payment is less than the computed total.
    #[error("Insufficient payment: total {total}, tendered {payment}")]
    InsufficientPayment { total: Money, payment: Money },

    /// A discount exceeds the amount it applies to.
    ///
    /// Rejected rather than clamped so every monetary output except change
    /// stays non-negative.
    #[error("Discount {discount} exceeds {scope} amount {base}")]
    DiscountTooLarge {
        scope: String,
        discount: Money,
        base: Money,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request doesn't meet shape requirements. Used for
/// early validation before any storage access.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Kopi Susu".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Kopi Susu: available 3, requested 5"
        );

        let err = CoreError::InsufficientPayment {
            total: Money::new(22_000),
            payment: Money::new(20_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: total Rp22.000, tendered Rp20.000"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
