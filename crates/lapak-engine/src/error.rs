//! # Engine Error Types
//!
//! One split matters to callers: was the sale *rejected* (client error,
//! nothing persisted, fix the request) or did *persistence* fail
//! (server error, nothing persisted, the same request may be retried).
//! The enclosing API layer maps `is_rejection()` to its 4xx/5xx codes
//! without this crate knowing about HTTP.

use thiserror::Error;

use lapak_core::{CoreError, ValidationError};
use lapak_db::{DbError, LedgerError};

/// Errors surfaced by the transaction engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was rejected before or during validation; no state
    /// was touched.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The durable store failed during the commit scope; the whole
    /// scope was rolled back, so the caller may safely retry.
    #[error(transparent)]
    Persistence(#[from] DbError),
}

impl EngineError {
    /// Whether this failure is a client-side rejection.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineError::Rejected(_))
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Rejected(CoreError::Validation(err))
    }
}

/// Ledger failures split the same way: shortfalls are rejections, the
/// rest is persistence.
impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Insufficient {
                name,
                available,
                requested,
            } => EngineError::Rejected(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }),
            LedgerError::ProductMissing(id) => {
                EngineError::Rejected(CoreError::ProductNotFound(id))
            }
            LedgerError::NonPositiveQuantity => {
                EngineError::Rejected(CoreError::Validation(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                }))
            }
            LedgerError::Db(db) => EngineError::Persistence(db),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
