//! Interfaces between the stock core and its storage backends.

mod stock_cache;
mod stock_store;

pub use stock_cache::StockCache;
pub use stock_store::{ProductStock, Result, StockStore, StorageError, UpsertOutcome};
