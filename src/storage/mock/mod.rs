//! Mock storage implementations for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::{
    ProductStock, Result, StockCache, StockStore, StorageError, UpsertOutcome,
};

/// Product metadata row seeded into the mock store.
///
/// In production the product CRUD collaborator owns these rows.
#[derive(Debug, Clone)]
struct ProductRow {
    name: String,
    sku: String,
    price: f64,
}

/// Mock stock store that keeps quantities in memory.
#[derive(Default)]
pub struct MockStockStore {
    products: RwLock<HashMap<i64, ProductRow>>,
    quantities: RwLock<HashMap<i64, i64>>,
    fail_on_read: RwLock<bool>,
    fail_on_write: RwLock<bool>,
}

impl MockStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product metadata row.
    pub async fn insert_product(&self, product_id: i64, name: &str, sku: &str, price: f64) {
        self.products.write().await.insert(
            product_id,
            ProductRow {
                name: name.to_string(),
                sku: sku.to_string(),
                price,
            },
        );
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    fn failure() -> StorageError {
        StorageError::Database(sqlx::Error::PoolClosed)
    }
}

#[async_trait]
impl StockStore for MockStockStore {
    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<UpsertOutcome> {
        if *self.fail_on_write.read().await {
            return Err(Self::failure());
        }

        let mut quantities = self.quantities.write().await;
        let outcome = if quantities.contains_key(&product_id) {
            UpsertOutcome::Updated(1)
        } else {
            UpsertOutcome::Inserted(product_id)
        };
        quantities.insert(product_id, quantity);
        Ok(outcome)
    }

    async fn quantity(&self, product_id: i64) -> Result<Option<i64>> {
        if *self.fail_on_read.read().await {
            return Err(Self::failure());
        }

        Ok(self.quantities.read().await.get(&product_id).copied())
    }

    async fn stock_overview(&self) -> Result<Vec<ProductStock>> {
        if *self.fail_on_read.read().await {
            return Err(Self::failure());
        }

        let products = self.products.read().await;
        let quantities = self.quantities.read().await;

        let mut rows: Vec<ProductStock> = quantities
            .iter()
            .filter_map(|(product_id, quantity)| {
                products.get(product_id).map(|product| ProductStock {
                    product_id: *product_id,
                    name: product.name.clone(),
                    sku: product.sku.clone(),
                    price: product.price,
                    quantity: *quantity,
                })
            })
            .collect();
        rows.sort_by_key(|row| row.product_id);
        Ok(rows)
    }
}

/// Mock stock cache that keeps entries in memory.
#[derive(Default)]
pub struct MockStockCache {
    entries: RwLock<HashMap<i64, ProductStock>>,
    fail_on_write: RwLock<bool>,
    rebuild_count: RwLock<usize>,
}

impl MockStockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// How many full rebuilds have run.
    pub async fn rebuild_count(&self) -> usize {
        *self.rebuild_count.read().await
    }

    fn failure() -> StorageError {
        StorageError::Cache(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "mock cache failure",
        )))
    }
}

#[async_trait]
impl StockCache for MockStockCache {
    async fn is_warm(&self) -> Result<bool> {
        Ok(!self.entries.read().await.is_empty())
    }

    async fn quantity(&self, product_id: i64) -> Result<Option<i64>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&product_id)
            .map(|entry| entry.quantity))
    }

    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(Self::failure());
        }

        // A quantity-only write on a missing entry creates it with bare
        // metadata, matching what a hash-field write then a read produces.
        self.entries
            .write()
            .await
            .entry(product_id)
            .and_modify(|entry| entry.quantity = quantity)
            .or_insert_with(|| ProductStock {
                product_id,
                name: format!("Product {product_id}"),
                sku: format!("SKU-{product_id}"),
                price: 0.0,
                quantity,
            });
        Ok(())
    }

    async fn entry(&self, product_id: i64) -> Result<Option<ProductStock>> {
        Ok(self.entries.read().await.get(&product_id).cloned())
    }

    async fn write_batch(&self, entries: &[ProductStock]) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(Self::failure());
        }

        let mut stored = self.entries.write().await;
        for entry in entries {
            stored.insert(entry.product_id, entry.clone());
        }
        Ok(())
    }

    async fn rebuild(&self, entries: &[ProductStock]) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(Self::failure());
        }

        let mut stored = self.entries.write().await;
        for entry in entries {
            stored.insert(entry.product_id, entry.clone());
        }
        *self.rebuild_count.write().await += 1;
        Ok(())
    }
}
