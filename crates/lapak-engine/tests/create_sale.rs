//! Black-box tests for the sale coordinator: the full path from cart to
//! committed transaction, and the guarantee that every rejection leaves
//! the database untouched.

mod common;

use common::*;
use lapak_core::{
    CoreError, Discount, Money, MovementType, PaymentType, Rate, TransactionStatus,
};
use lapak_db::Database;
use lapak_engine::{CreateSaleRequest, EngineError, SaleLine, SaleService};

fn cash_request(
    store_id: &str,
    cashier_id: &str,
    lines: Vec<SaleLine>,
    payment: i64,
) -> CreateSaleRequest {
    CreateSaleRequest {
        store_id: store_id.to_string(),
        cashier_id: cashier_id.to_string(),
        customer_id: None,
        lines,
        order_discount: None,
        payment_amount: Money::new(payment),
        payment_type: PaymentType::Cash,
        payment_reference: None,
        notes: None,
    }
}

fn line(product_id: &str, quantity: i64) -> SaleLine {
    SaleLine {
        product_id: product_id.to_string(),
        quantity,
        discount: None,
    }
}

/// Asserts that no transaction, item or movement exists and the product
/// still holds `expected_stock`.
async fn assert_no_trace(db: &Database, store_id: &str, product_id: &str, expected_stock: i64) {
    assert_eq!(db.transactions().count(store_id).await.unwrap(), 0);
    assert_eq!(db.transactions().count_items().await.unwrap(), 0);
    assert_eq!(db.stock().count().await.unwrap(), 0);

    let product = db.products().get(store_id, product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, expected_stock);
}

#[tokio::test]
async fn completes_sale_with_tax_change_and_ledger_entry() {
    let db = test_db().await;
    let store = seed_store(&db, 1000).await; // 10%
    let product = seed_product(&db, &store, "Kopi Susu", 10_000, 6_000, 20).await;
    let cashier = uid();
    let service = SaleService::new(db.clone());

    let sale = service
        .create_sale(cash_request(
            &store.id,
            &cashier,
            vec![line(&product.id, 2)],
            25_000,
        ))
        .await
        .unwrap();

    assert_eq!(sale.subtotal, 20_000);
    assert_eq!(sale.discount_amount, 0);
    assert_eq!(sale.tax_amount, 2_000);
    assert_eq!(sale.total, 22_000);
    assert_eq!(sale.payment_amount, 25_000);
    assert_eq!(sale.change_amount, 3_000);
    assert_eq!(sale.status, TransactionStatus::Completed);
    assert_eq!(sale.cashier_id.as_deref(), Some(cashier.as_str()));
    assert!(sale.invoice_number.starts_with("INV-"));

    // item is a frozen snapshot of the product at sale time
    assert_eq!(sale.items.len(), 1);
    let item = &sale.items[0];
    assert_eq!(item.product_id, product.id);
    assert_eq!(item.product_name, "Kopi Susu");
    assert_eq!(item.product_price, 10_000);
    assert_eq!(item.product_cost, 6_000);
    assert_eq!(item.quantity, 2);
    assert_eq!(item.subtotal, 20_000);
    assert_eq!(item.position, 0);

    // stock decremented, one balanced movement referencing the sale
    let reloaded = reload_product(&db, &store, &product).await;
    assert_eq!(reloaded.stock, 18);

    let movements = db
        .stock()
        .movements_for_product(&store.id, &product.id)
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    let movement = &movements[0];
    assert_eq!(movement.movement_type, MovementType::Out);
    assert_eq!(movement.quantity, 2);
    assert_eq!(movement.stock_before, 20);
    assert_eq!(movement.stock_after, 18);
    assert!(movement.is_balanced());
    assert_eq!(movement.reference_id.as_deref(), Some(sale.id.as_str()));
    assert_eq!(movement.created_by.as_deref(), Some(cashier.as_str()));

    // the persisted aggregate matches the returned one
    let persisted = db
        .transactions()
        .get(&store.id, &sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.invoice_number, sale.invoice_number);
    assert_eq!(persisted.total, sale.total);
    assert_eq!(persisted.items.len(), 1);
}

#[tokio::test]
async fn insufficient_stock_rejection_leaves_no_trace() {
    let db = test_db().await;
    let store = seed_store(&db, 1000).await;
    let product = seed_product(&db, &store, "Kopi Susu", 10_000, 6_000, 20).await;
    let service = SaleService::new(db.clone());

    let err = service
        .create_sale(cash_request(
            &store.id,
            &uid(),
            vec![line(&product.id, 25)],
            500_000,
        ))
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    match err {
        EngineError::Rejected(CoreError::InsufficientStock {
            name,
            available,
            requested,
        }) => {
            assert_eq!(name, "Kopi Susu");
            assert_eq!(available, 20);
            assert_eq!(requested, 25);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_no_trace(&db, &store.id, &product.id, 20).await;
}

#[tokio::test]
async fn failing_cart_creates_nothing_on_either_call() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product(&db, &store, "Teh Botol", 5_000, 3_000, 10).await;
    let service = SaleService::new(db.clone());

    let ghost = uid();
    for _ in 0..2 {
        let err = service
            .create_sale(cash_request(&store.id, &uid(), vec![line(&ghost, 1)], 5_000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected(CoreError::ProductNotFound(ref id)) if *id == ghost
        ));
    }

    assert_no_trace(&db, &store.id, &product.id, 10).await;
}

#[tokio::test]
async fn insufficient_payment_rejected_before_persistence() {
    let db = test_db().await;
    let store = seed_store(&db, 1000).await;
    let product = seed_product(&db, &store, "Kopi Susu", 10_000, 6_000, 20).await;
    let service = SaleService::new(db.clone());

    // total is 22.000 with tax; tender only 20.000
    let err = service
        .create_sale(cash_request(
            &store.id,
            &uid(),
            vec![line(&product.id, 2)],
            20_000,
        ))
        .await
        .unwrap_err();

    match err {
        EngineError::Rejected(CoreError::InsufficientPayment { total, payment }) => {
            assert_eq!(total.amount(), 22_000);
            assert_eq!(payment.amount(), 20_000);
        }
        other => panic!("expected InsufficientPayment, got {other:?}"),
    }

    assert_no_trace(&db, &store.id, &product.id, 20).await;
}

#[tokio::test]
async fn inactive_product_rejected() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product_with(&db, &store, "Retired", 5_000, 3_000, 10, |p| {
        p.is_active = false;
    })
    .await;
    let service = SaleService::new(db.clone());

    let err = service
        .create_sale(cash_request(
            &store.id,
            &uid(),
            vec![line(&product.id, 1)],
            5_000,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Rejected(CoreError::ProductNotFound(_))
    ));
}

#[tokio::test]
async fn product_from_another_store_rejected() {
    let db = test_db().await;
    let store_a = seed_store(&db, 0).await;
    let store_b = seed_store(&db, 0).await;
    let foreign = seed_product(&db, &store_b, "Foreign", 5_000, 3_000, 10).await;
    let service = SaleService::new(db.clone());

    let err = service
        .create_sale(cash_request(
            &store_a.id,
            &uid(),
            vec![line(&foreign.id, 1)],
            5_000,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Rejected(CoreError::ProductNotFound(_))
    ));
    assert_eq!(reload_product(&db, &store_b, &foreign).await.stock, 10);
}

#[tokio::test]
async fn empty_cart_rejected_without_store_access() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let service = SaleService::new(db.clone());

    let err = service
        .create_sale(cash_request(&store.id, &uid(), vec![], 1_000))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Rejected(CoreError::Validation(_))
    ));
}

#[tokio::test]
async fn non_positive_quantity_rejected() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product(&db, &store, "Teh Botol", 5_000, 3_000, 10).await;
    let service = SaleService::new(db.clone());

    let err = service
        .create_sale(cash_request(
            &store.id,
            &uid(),
            vec![line(&product.id, 0)],
            5_000,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Rejected(CoreError::Validation(_))
    ));
    assert_no_trace(&db, &store.id, &product.id, 10).await;
}

#[tokio::test]
async fn untracked_product_skips_stock_validation_and_ledger() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product_with(&db, &store, "Jasa Bungkus", 2_000, 0, 0, |p| {
        p.track_stock = false;
    })
    .await;
    let service = SaleService::new(db.clone());

    let sale = service
        .create_sale(cash_request(
            &store.id,
            &uid(),
            vec![line(&product.id, 3)],
            6_000,
        ))
        .await
        .unwrap();

    assert_eq!(sale.total, 6_000);
    assert_eq!(reload_product(&db, &store, &product).await.stock, 0);
    assert_eq!(db.stock().count().await.unwrap(), 0);
}

#[tokio::test]
async fn mixed_cart_applies_ledger_only_to_tracked_lines() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let tracked = seed_product(&db, &store, "Kopi", 10_000, 6_000, 8).await;
    let untracked = seed_product_with(&db, &store, "Jasa", 2_000, 0, 0, |p| {
        p.track_stock = false;
    })
    .await;
    let service = SaleService::new(db.clone());

    let sale = service
        .create_sale(cash_request(
            &store.id,
            &uid(),
            vec![line(&tracked.id, 2), line(&untracked.id, 1)],
            22_000,
        ))
        .await
        .unwrap();

    // items keep cart order
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.items[0].product_id, tracked.id);
    assert_eq!(sale.items[0].position, 0);
    assert_eq!(sale.items[1].product_id, untracked.id);
    assert_eq!(sale.items[1].position, 1);

    let persisted = db
        .transactions()
        .get(&store.id, &sale.id)
        .await
        .unwrap()
        .unwrap();
    let order: Vec<&str> = persisted.items.iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(order, vec![tracked.id.as_str(), untracked.id.as_str()]);

    // only the tracked line moved stock
    assert_eq!(db.stock().count().await.unwrap(), 1);
    assert_eq!(reload_product(&db, &store, &tracked).await.stock, 6);
}

#[tokio::test]
async fn discounts_are_persisted_on_items_and_header() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product(&db, &store, "Kopi", 10_000, 6_000, 20).await;
    let service = SaleService::new(db.clone());

    let mut request = cash_request(&store.id, &uid(), vec![], 20_000);
    request.lines = vec![SaleLine {
        product_id: product.id.clone(),
        quantity: 2,
        discount: Some(Discount::Amount(Money::new(1_500))),
    }];
    request.order_discount = Some(Discount::Percent(Rate::from_bps(1000)));
    request.payment_type = PaymentType::Qris;
    request.payment_reference = Some("QR-12345".to_string());

    let sale = service.create_sale(request).await.unwrap();

    // line: 20.000 - 1.500 = 18.500; order 10% = 1.850; total 16.650
    assert_eq!(sale.items[0].discount_amount, 1_500);
    assert_eq!(sale.items[0].subtotal, 18_500);
    assert_eq!(sale.subtotal, 18_500);
    assert_eq!(sale.discount_amount, 1_850);
    assert_eq!(sale.discount_percent_bps, 1000);
    assert_eq!(sale.total, 16_650);
    assert_eq!(sale.change_amount, 3_350);

    let persisted = db
        .transactions()
        .get(&store.id, &sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.payment_type, PaymentType::Qris);
    assert_eq!(persisted.payment_reference.as_deref(), Some("QR-12345"));
    assert_eq!(persisted.discount_amount, 1_850);
}

#[tokio::test]
async fn invoice_numbers_are_sequential_and_store_scoped() {
    let db = test_db().await;
    let store_a = seed_store(&db, 0).await;
    let store_b = seed_store(&db, 0).await;
    let product_a = seed_product(&db, &store_a, "Kopi", 10_000, 6_000, 50).await;
    let product_b = seed_product(&db, &store_b, "Teh", 5_000, 3_000, 50).await;
    let service = SaleService::new(db.clone());

    let first = service
        .create_sale(cash_request(&store_a.id, &uid(), vec![line(&product_a.id, 1)], 10_000))
        .await
        .unwrap();
    let second = service
        .create_sale(cash_request(&store_a.id, &uid(), vec![line(&product_a.id, 1)], 10_000))
        .await
        .unwrap();
    let other_store = service
        .create_sale(cash_request(&store_b.id, &uid(), vec![line(&product_b.id, 1)], 5_000))
        .await
        .unwrap();

    assert!(first.invoice_number.ends_with("-0001"));
    assert!(second.invoice_number.ends_with("-0002"));
    assert!(other_store.invoice_number.ends_with("-0001"));
    assert_ne!(first.invoice_number, second.invoice_number);
}

#[tokio::test]
async fn rejected_sale_does_not_consume_an_invoice_number() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product(&db, &store, "Kopi", 10_000, 6_000, 5).await;
    let service = SaleService::new(db.clone());

    let first = service
        .create_sale(cash_request(&store.id, &uid(), vec![line(&product.id, 1)], 10_000))
        .await
        .unwrap();
    assert!(first.invoice_number.ends_with("-0001"));

    // rejected: the counter bump rolls back with the scope
    service
        .create_sale(cash_request(&store.id, &uid(), vec![line(&product.id, 100)], 1_000_000))
        .await
        .unwrap_err();

    let second = service
        .create_sale(cash_request(&store.id, &uid(), vec![line(&product.id, 1)], 10_000))
        .await
        .unwrap();
    assert!(second.invoice_number.ends_with("-0002"));
}

#[tokio::test]
async fn concurrent_sales_cannot_oversell() {
    let db = test_db().await;
    let store = seed_store(&db, 0).await;
    let product = seed_product(&db, &store, "Kopi", 10_000, 6_000, 5).await;
    let service = SaleService::new(db.clone());

    let sell = |qty: i64| {
        let service = service.clone();
        let store_id = store.id.clone();
        let product_id = product.id.clone();
        async move {
            service
                .create_sale(cash_request(&store_id, &uid(), vec![line(&product_id, qty)], 50_000))
                .await
        }
    };

    let (first, second) = tokio::join!(sell(3), sell(3));

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of two concurrent sales may win");

    let failure = if first.is_err() { first } else { second };
    assert!(matches!(
        failure.unwrap_err(),
        EngineError::Rejected(CoreError::InsufficientStock { .. })
    ));

    // never negative, never double-decremented
    assert_eq!(reload_product(&db, &store, &product).await.stock, 2);
    assert_eq!(db.stock().count().await.unwrap(), 1);
}
