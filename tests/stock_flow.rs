//! End-to-end stock flow against SQLite with the in-memory cache double.
//!
//! Covers the full order lifecycle: stock a product, place an order
//! (check-out), cancel it (check-in), and watch both the durable store and
//! the cache converge at every step.

use std::sync::Arc;

use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;

use stocksync::interfaces::{StockStore, UpsertOutcome};
use stocksync::items::{LineItem, OrderItem, StockOperation};
use stocksync::storage::mock::MockStockCache;
use stocksync::storage::sql::sqlite::SqliteStockStore;
use stocksync::sync::StockSync;

async fn sqlite_store() -> Arc<SqliteStockStore> {
    // Single connection: each new in-memory connection is a fresh db.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = Arc::new(SqliteStockStore::new(pool));
    store.init().await.unwrap();
    store
}

async fn seed_product(store: &SqliteStockStore, id: i64, name: &str, sku: &str, price: f64) {
    sqlx::query("INSERT INTO products (id, name, sku, price) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(sku)
        .bind(price)
        .execute(store.pool())
        .await
        .unwrap();
}

fn record(product_id: i64, quantity: i64) -> LineItem {
    LineItem::from(OrderItem {
        product_id,
        quantity,
        name: None,
        sku: None,
        price: None,
    })
}

fn mapping(value: serde_json::Value) -> LineItem {
    match value {
        serde_json::Value::Object(fields) => LineItem::Fields(fields),
        other => panic!("expected JSON object, got {other}"),
    }
}

#[tokio::test]
async fn test_set_stock_creates_then_updates_single_row() {
    let store = sqlite_store().await;

    assert_eq!(
        store.set_quantity(1, 5).await.unwrap(),
        UpsertOutcome::Inserted(1)
    );
    assert_eq!(
        store.set_quantity(1, 9).await.unwrap(),
        UpsertOutcome::Updated(1)
    );
    assert_eq!(store.quantity(1).await.unwrap(), Some(9));

    // Updated in place, no duplicate row.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stocks WHERE product_id = 1")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_order_lifecycle_restores_stock() {
    let store = sqlite_store().await;
    let cache = Arc::new(MockStockCache::new());
    let sync = StockSync::new(store.clone(), cache.clone());

    seed_product(&store, 1, "Some Item", "12345", 99.90).await;

    // Stock 5 units; both stores report 5.
    sync.set_stock_for_product(1, 5).await.unwrap();
    assert_eq!(store.quantity(1).await.unwrap(), Some(5));
    assert_eq!(sync.stock_level(1).await.unwrap(), 5);

    // Place an order for 2 units: the order collaborator owns the
    // transaction and calls the adjuster and the cache updater together.
    let items = vec![record(1, 2)];
    let mut tx = store.pool().begin().await.unwrap();
    store.check_out_items(&mut tx, &items).await.unwrap();
    tx.commit().await.unwrap();
    sync.update_cache(&items, StockOperation::CheckOut)
        .await
        .unwrap();

    assert_eq!(store.quantity(1).await.unwrap(), Some(3));
    assert_eq!(sync.stock_level(1).await.unwrap(), 3);

    // Cancel the order: stock comes back.
    let mut tx = store.pool().begin().await.unwrap();
    store.check_in_items(&mut tx, &items).await.unwrap();
    tx.commit().await.unwrap();
    sync.update_cache(&items, StockOperation::CheckIn)
        .await
        .unwrap();

    assert_eq!(store.quantity(1).await.unwrap(), Some(5));
    assert_eq!(sync.stock_level(1).await.unwrap(), 5);
}

#[tokio::test]
async fn test_uncommitted_adjustment_rolls_back() {
    let store = sqlite_store().await;
    store.set_quantity(1, 5).await.unwrap();

    {
        let mut tx = store.pool().begin().await.unwrap();
        store
            .check_out_items(&mut tx, &[record(1, 2)])
            .await
            .unwrap();
        // Dropped without commit.
    }

    assert_eq!(store.quantity(1).await.unwrap(), Some(5));
}

#[tokio::test]
async fn test_adjusting_missing_row_is_silent_noop() {
    let store = sqlite_store().await;

    let mut tx = store.pool().begin().await.unwrap();
    store
        .check_out_items(&mut tx, &[record(77, 2)])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    // No row was created; the decrement fell through.
    assert_eq!(store.quantity(77).await.unwrap(), None);
}

#[tokio::test]
async fn test_mixed_shape_batch_adjusts_every_item() {
    let store = sqlite_store().await;
    store.set_quantity(1, 10).await.unwrap();
    store.set_quantity(2, 10).await.unwrap();

    let items = vec![
        record(1, 3),
        mapping(json!({"product_id": 2, "quantity": 4})),
    ];
    let mut tx = store.pool().begin().await.unwrap();
    store.check_out_items(&mut tx, &items).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.quantity(1).await.unwrap(), Some(7));
    assert_eq!(store.quantity(2).await.unwrap(), Some(6));
}

#[tokio::test]
async fn test_malformed_item_aborts_batch() {
    let store = sqlite_store().await;
    store.set_quantity(1, 10).await.unwrap();

    let items = vec![mapping(json!({"quantity": 4}))];
    let mut tx = store.pool().begin().await.unwrap();
    assert!(store.check_out_items(&mut tx, &items).await.is_err());
}

#[tokio::test]
async fn test_checkout_below_zero_is_not_floored() {
    let store = sqlite_store().await;
    store.set_quantity(1, 1).await.unwrap();

    let mut tx = store.pool().begin().await.unwrap();
    store
        .check_out_items(&mut tx, &[record(1, 4)])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.quantity(1).await.unwrap(), Some(-3));
}

#[tokio::test]
async fn test_cold_cache_resyncs_from_durable_store() {
    let store = sqlite_store().await;
    let cache = Arc::new(MockStockCache::new());
    let sync = StockSync::new(store.clone(), cache.clone());

    seed_product(&store, 1, "Some Item", "12345", 99.90).await;
    seed_product(&store, 2, "Other Item", "67890", 5.0).await;
    store.set_quantity(1, 5).await.unwrap();
    store.set_quantity(2, 8).await.unwrap();

    // The cache has never been populated; a checkout must trigger a full
    // rebuild from the durable store instead of a partial delta.
    sync.update_cache(&[record(1, 2)], StockOperation::CheckOut)
        .await
        .unwrap();

    assert_eq!(cache.rebuild_count().await, 1);
    assert_eq!(sync.stock_level(1).await.unwrap(), 5);
    assert_eq!(sync.stock_level(2).await.unwrap(), 8);

    let view = sync.product_view(1).await.unwrap().unwrap();
    assert_eq!(view.name, "Some Item");
    assert_eq!(view.sku, "12345");
    assert_eq!(view.price, 99.90);
}

#[tokio::test]
async fn test_resync_joins_products_with_stocks() {
    let store = sqlite_store().await;
    let cache = Arc::new(MockStockCache::new());
    let sync = StockSync::new(store.clone(), cache.clone());

    seed_product(&store, 1, "Some Item", "12345", 99.90).await;
    // Product 2 has a stock row but no product row: the join skips it.
    store.set_quantity(1, 5).await.unwrap();
    store.set_quantity(2, 9).await.unwrap();

    assert_eq!(sync.resync().await.unwrap(), 1);
    assert_eq!(cache.entry_count().await, 1);
}
