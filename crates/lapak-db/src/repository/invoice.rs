//! # Invoice Number Sequence
//!
//! Store-scoped, human-readable invoice numbers: `INV-YYYYMMDD-NNNN`.
//!
//! ## Primary strategy
//! A per-(store, day) counter row, bumped atomically with an upsert:
//!
//! ```sql
//! INSERT INTO invoice_counters (store_id, day, counter) VALUES (?, ?, 1)
//! ON CONFLICT (store_id, day) DO UPDATE SET counter = counter + 1
//! RETURNING counter
//! ```
//!
//! Unique under concurrent callers, resets daily, independent across
//! stores. This upsert is also deliberately the FIRST statement of a
//! sale's commit scope: it is a write, so it takes the database write
//! lock before any stock is read (see the coordinator).
//!
//! ## Fallback strategy
//! If the counter is unavailable the number is composed from the date
//! plus a high-resolution time component. The collision window is
//! theoretical but real under high-frequency concurrent sales; it is a
//! rare-degradation fallback, logged at warn, not a fix target.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::warn;

/// Returns the next invoice number for a store.
///
/// Must be called inside an enclosing commit scope: the counter bump
/// rolls back with the sale, so rejected sales leave no gap.
pub async fn next_invoice_number(
    conn: &mut SqliteConnection,
    store_id: &str,
    now: DateTime<Utc>,
) -> String {
    let day = now.format("%Y%m%d").to_string();

    let counter: Result<i64, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO invoice_counters (store_id, day, counter) VALUES (?1, ?2, 1)
        ON CONFLICT (store_id, day) DO UPDATE SET counter = counter + 1
        RETURNING counter
        "#,
    )
    .bind(store_id)
    .bind(&day)
    .fetch_one(conn)
    .await;

    match counter {
        Ok(seq) => format!("INV-{day}-{seq:04}"),
        Err(err) => {
            warn!(
                error = %err,
                store_id,
                "Invoice counter unavailable, using time-based fallback"
            );
            let nanos = now.timestamp_nanos_opt().unwrap_or_default() % 10_000;
            format!("INV-{day}-{nanos:04}")
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn test_sequence_increments_within_store_and_day() {
        let db = testing::test_db().await;
        let store = testing::seed_store(&db, 0).await;
        let now = Utc::now();
        let day = now.format("%Y%m%d").to_string();

        let mut tx = db.pool().begin().await.unwrap();
        let first = next_invoice_number(&mut tx, &store.id, now).await;
        let second = next_invoice_number(&mut tx, &store.id, now).await;
        tx.commit().await.unwrap();

        assert_eq!(first, format!("INV-{day}-0001"));
        assert_eq!(second, format!("INV-{day}-0002"));
    }

    #[tokio::test]
    async fn test_sequence_is_independent_per_store() {
        let db = testing::test_db().await;
        let store_a = testing::seed_store(&db, 0).await;
        let store_b = testing::seed_store(&db, 0).await;
        let now = Utc::now();
        let day = now.format("%Y%m%d").to_string();

        let mut tx = db.pool().begin().await.unwrap();
        let a1 = next_invoice_number(&mut tx, &store_a.id, now).await;
        let a2 = next_invoice_number(&mut tx, &store_a.id, now).await;
        let b1 = next_invoice_number(&mut tx, &store_b.id, now).await;
        tx.commit().await.unwrap();

        assert_eq!(a1, format!("INV-{day}-0001"));
        assert_eq!(a2, format!("INV-{day}-0002"));
        assert_eq!(b1, format!("INV-{day}-0001"));
    }

    #[tokio::test]
    async fn test_sequence_resets_per_day() {
        let db = testing::test_db().await;
        let store = testing::seed_store(&db, 0).await;
        let today = Utc::now();
        let tomorrow = today + chrono::Duration::days(1);

        let mut tx = db.pool().begin().await.unwrap();
        let first = next_invoice_number(&mut tx, &store.id, today).await;
        let next_day = next_invoice_number(&mut tx, &store.id, tomorrow).await;
        tx.commit().await.unwrap();

        assert!(first.ends_with("-0001"));
        assert!(next_day.ends_with("-0001"));
        assert_ne!(first, next_day);
    }
}
