//! Stock cache interface.

use async_trait::async_trait;

use super::stock_store::{ProductStock, Result};

/// Interface for the key-value stock mirror.
///
/// Each entry holds a product's quantity plus denormalized metadata for
/// fast reads. An absent entry is a valid transient state; a full rebuild
/// from the durable store restores consistency.
///
/// Implementations:
/// - `RedisStockCache`: Redis hashes under `stock:{product_id}`
/// - `MockStockCache`: In-memory mock for testing
#[async_trait]
pub trait StockCache: Send + Sync {
    /// Whether the cache holds any stock entries at all.
    async fn is_warm(&self) -> Result<bool>;

    /// Cached quantity for a product, if the entry exists.
    async fn quantity(&self, product_id: i64) -> Result<Option<i64>>;

    /// Write only the quantity field, leaving metadata untouched.
    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<()>;

    /// Read a full entry.
    async fn entry(&self, product_id: i64) -> Result<Option<ProductStock>>;

    /// Write a batch of full entries through one pipelined round trip.
    ///
    /// Not atomic across keys; used by the partial-update path.
    async fn write_batch(&self, entries: &[ProductStock]) -> Result<()>;

    /// Write every given entry as one atomic batch.
    ///
    /// All entries become visible together; used by the full rebuild.
    async fn rebuild(&self, entries: &[ProductStock]) -> Result<()>;
}
