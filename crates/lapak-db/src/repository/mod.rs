//! # Repository Module
//!
//! Database repository implementations for Lapak POS.
//!
//! ## Two calling conventions
//! ```text
//! Pool-backed instance methods      Standalone reads and writes with
//! (&self, uses the shared pool)     their own implicit transaction.
//!
//! Associated fns on                 Operations that MUST participate in
//! &mut SqliteConnection             an enclosing commit scope: product
//!                                   loads for a sale, header/item
//!                                   inserts, ledger applications, the
//!                                   invoice counter.
//! ```
//!
//! The second convention is what makes the coordinator's all-or-nothing
//! guarantee possible: every statement of a sale runs on the one
//! connection that holds the transaction.

pub mod invoice;
pub mod product;
pub mod stock;
pub mod store;
pub mod transaction;
