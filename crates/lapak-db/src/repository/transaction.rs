//! # Transaction Repository
//!
//! Database operations for transactions and their items.
//!
//! ## Snapshot Pattern
//! Product name, price and cost are copied onto every item at sale time.
//! The sale history stays intact when products are edited or retired.
//!
//! Headers and items are only ever inserted from inside the
//! coordinator's commit scope; a transaction row is immutable once
//! committed (void/refund is a future flow).

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use lapak_core::{Transaction, TransactionItem};

const TRANSACTION_COLUMNS: &str =
    "id, store_id, customer_id, cashier_id, invoice_number, subtotal, discount_amount, \
     discount_percent_bps, tax_amount, total, payment_amount, change_amount, payment_type, \
     payment_reference, status, notes, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, transaction_id, product_id, product_name, product_price, product_cost, quantity, \
     discount_amount, subtotal, position, created_at";

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a transaction with its items, scoped to a store.
    pub async fn get(&self, store_id: &str, id: &str) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1 AND store_id = ?2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut transaction) = header else {
            return Ok(None);
        };

        transaction.items = sqlx::query_as::<_, TransactionItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM transaction_items \
             WHERE transaction_id = ?1 ORDER BY position ASC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(transaction))
    }

    /// Counts transactions in a store (diagnostics and tests).
    pub async fn count(&self, store_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE store_id = ?1")
                .bind(store_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Counts all transaction items (diagnostics and tests).
    pub async fn count_items(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a transaction header inside an enclosing commit scope.
    pub async fn insert_header(
        conn: &mut SqliteConnection,
        transaction: &Transaction,
    ) -> DbResult<()> {
        debug!(
            id = %transaction.id,
            invoice_number = %transaction.invoice_number,
            "Inserting transaction header"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, store_id, customer_id, cashier_id, invoice_number,
                subtotal, discount_amount, discount_percent_bps, tax_amount, total,
                payment_amount, change_amount, payment_type, payment_reference,
                status, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18
            )
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.store_id)
        .bind(&transaction.customer_id)
        .bind(&transaction.cashier_id)
        .bind(&transaction.invoice_number)
        .bind(transaction.subtotal)
        .bind(transaction.discount_amount)
        .bind(transaction.discount_percent_bps)
        .bind(transaction.tax_amount)
        .bind(transaction.total)
        .bind(transaction.payment_amount)
        .bind(transaction.change_amount)
        .bind(transaction.payment_type)
        .bind(&transaction.payment_reference)
        .bind(transaction.status)
        .bind(&transaction.notes)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts a transaction item inside an enclosing commit scope.
    pub async fn insert_item(conn: &mut SqliteConnection, item: &TransactionItem) -> DbResult<()> {
        debug!(
            transaction_id = %item.transaction_id,
            product_id = %item.product_id,
            position = item.position,
            "Inserting transaction item"
        );

        sqlx::query(
            r#"
            INSERT INTO transaction_items (
                id, transaction_id, product_id, product_name, product_price,
                product_cost, quantity, discount_amount, subtotal, position, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.transaction_id)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.product_price)
        .bind(item.product_cost)
        .bind(item.quantity)
        .bind(item.discount_amount)
        .bind(item.subtotal)
        .bind(item.position)
        .bind(item.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}

/// Generates a new transaction ID.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new transaction item ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}
