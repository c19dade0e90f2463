//! Shared fixtures for the engine integration tests: a migrated
//! in-memory database plus store/product seeding.

#![allow(dead_code)]

use std::sync::Once;

use chrono::Utc;
use uuid::Uuid;

use lapak_core::{Product, Store};
use lapak_db::{Database, DbConfig};

/// Installs a test tracing subscriber once per binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Creates a migrated in-memory database.
pub async fn test_db() -> Database {
    init_tracing();
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// A fresh UUID string (ids in requests must be UUID-shaped).
pub fn uid() -> String {
    Uuid::new_v4().to_string()
}

/// Inserts and returns a store with the given tax rate.
pub async fn seed_store(db: &Database, tax_rate_bps: i64) -> Store {
    let now = Utc::now();
    let store = Store {
        id: uid(),
        name: "Warung Tetangga".to_string(),
        tax_rate_bps,
        currency: "IDR".to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.stores().insert(&store).await.expect("seed store");
    store
}

/// Builds a product row without inserting it.
pub fn product_row(store: &Store, name: &str, price: i64, cost: i64, stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: uid(),
        store_id: store.id.clone(),
        name: name.to_string(),
        barcode: None,
        sku: None,
        price,
        cost,
        stock,
        min_stock: 5,
        unit: "pcs".to_string(),
        track_stock: true,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Inserts and returns a tracked, active product.
pub async fn seed_product(
    db: &Database,
    store: &Store,
    name: &str,
    price: i64,
    cost: i64,
    stock: i64,
) -> Product {
    let product = product_row(store, name, price, cost, stock);
    db.products().insert(&product).await.expect("seed product");
    product
}

/// Inserts and returns a product after applying `customize` to the row.
pub async fn seed_product_with(
    db: &Database,
    store: &Store,
    name: &str,
    price: i64,
    cost: i64,
    stock: i64,
    customize: impl FnOnce(&mut Product),
) -> Product {
    let mut product = product_row(store, name, price, cost, stock);
    customize(&mut product);
    db.products().insert(&product).await.expect("seed product");
    product
}

/// Reloads a product's current state.
pub async fn reload_product(db: &Database, store: &Store, product: &Product) -> Product {
    db.products()
        .get(&store.id, &product.id)
        .await
        .expect("reload product")
        .expect("product exists")
}
