//! Dual-write coordination between the durable stock store and the cache.
//!
//! The durable store is the source of truth; the cache is a rebuildable
//! projection. Writes here are best-effort dual writes: the durable write
//! commits first, and a cache failure afterwards leaves the cache stale
//! until the next full resynchronization rather than rolling anything back.

use std::sync::Arc;

use tracing::{debug, info};

use crate::interfaces::{ProductStock, Result, StockCache, StockStore, UpsertOutcome};
use crate::items::{LineItem, StockOperation};

/// Coordinates stock state across the durable store and the cache.
///
/// Store handles are injected at construction; there is no ambient
/// connection state.
pub struct StockSync {
    store: Arc<dyn StockStore>,
    cache: Arc<dyn StockCache>,
}

impl StockSync {
    pub fn new(store: Arc<dyn StockStore>, cache: Arc<dyn StockCache>) -> Self {
        Self { store, cache }
    }

    /// Set the absolute stock quantity for a product in both stores.
    ///
    /// The durable upsert commits before the cache is touched; only the
    /// cached quantity field is written, leaving entry metadata intact. A
    /// cache failure after the commit propagates without compensation and
    /// the cache stays stale until the next [`resync`](Self::resync).
    pub async fn set_stock_for_product(
        &self,
        product_id: i64,
        quantity: i64,
    ) -> Result<UpsertOutcome> {
        let outcome = self.store.set_quantity(product_id, quantity).await?;
        self.cache.set_quantity(product_id, quantity).await?;
        Ok(outcome)
    }

    /// Update cached quantities for a batch of order line items.
    ///
    /// A cold cache (no stock entries at all) delegates to a full
    /// [`resync`](Self::resync) instead of computing deltas on top of a
    /// phantom zero baseline. On a warm cache, each item is normalized on
    /// its own, the new quantity is computed from the currently cached one
    /// (0 when that single entry is missing), and every write goes out in
    /// one pipelined batch at the end.
    ///
    /// The read and the batched write are not atomic per key: concurrent
    /// batches touching the same product can race, and the cache may
    /// transiently diverge from the durable store until the next resync.
    /// Negative results are written as-is.
    pub async fn update_cache(
        &self,
        items: &[LineItem],
        operation: StockOperation,
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        if !self.cache.is_warm().await? {
            self.resync().await?;
            return Ok(());
        }

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let item = item.normalize()?;
            let current = self.cache.quantity(item.product_id).await?.unwrap_or(0);

            entries.push(ProductStock {
                product_id: item.product_id,
                name: item.name_or_default(),
                sku: item.sku_or_default(),
                price: item.price_or_default(),
                quantity: operation.apply(current, item.quantity),
            });
        }

        self.cache.write_batch(&entries).await?;

        debug!(count = entries.len(), ?operation, "Updated stock cache");
        Ok(())
    }

    /// Rebuild the cache from every product that has a durable stock row.
    ///
    /// Entries are written as one atomic batch; zero rows writes nothing.
    /// Returns the number of synchronized products. This is also the manual
    /// recovery path for staleness left behind by the best-effort dual
    /// write.
    pub async fn resync(&self) -> Result<usize> {
        let rows = self.store.stock_overview().await?;

        if rows.is_empty() {
            info!("No stock rows to synchronize into the cache");
            return Ok(0);
        }

        self.cache.rebuild(&rows).await?;

        info!(count = rows.len(), "Synchronized stock rows into the cache");
        Ok(rows.len())
    }

    /// Cached stock level for a product; 0 when no entry exists.
    pub async fn stock_level(&self, product_id: i64) -> Result<i64> {
        Ok(self.cache.quantity(product_id).await?.unwrap_or(0))
    }

    /// Full cached entry (quantity plus metadata) for a product.
    pub async fn product_view(&self, product_id: i64) -> Result<Option<ProductStock>> {
        self.cache.entry(product_id).await
    }
}
