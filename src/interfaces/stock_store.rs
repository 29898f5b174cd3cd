//! Durable stock store interface.

use async_trait::async_trait;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or mutating stock state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Line item missing field: {field}")]
    MalformedLineItem { field: &'static str },
}

/// Outcome of an absolute stock write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Existing rows were updated in place.
    Updated(u64),
    /// No row existed; one was inserted for the product.
    Inserted(i64),
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertOutcome::Updated(rows) => write!(f, "rows updated: {rows}"),
            UpsertOutcome::Inserted(product_id) => write!(f, "rows added: {product_id}"),
        }
    }
}

/// A product joined with its stock quantity.
///
/// Produced by the overview join and written to the cache as a full entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStock {
    pub product_id: i64,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub quantity: i64,
}

/// Interface for authoritative stock persistence.
///
/// The durable store is the source of truth for quantities; the cache is a
/// rebuildable projection of it. Quantities are not floored at zero.
///
/// Implementations:
/// - `SqlStockStore<MySql>`: MySQL storage
/// - `SqlStockStore<Sqlite>`: SQLite storage
/// - `MockStockStore`: In-memory mock for testing
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Set the absolute quantity for a product.
    ///
    /// Updates the existing row in place, inserting one when none exists.
    /// Runs in its own transaction; any failure rolls back and propagates.
    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<UpsertOutcome>;

    /// Read the durable quantity for a product, if a stock row exists.
    async fn quantity(&self, product_id: i64) -> Result<Option<i64>>;

    /// Every product that has a stock row, joined with its metadata.
    async fn stock_overview(&self) -> Result<Vec<ProductStock>>;
}
