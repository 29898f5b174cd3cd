//! Storage implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::{CacheConfig, DatabaseBackend, DatabaseConfig};
use crate::interfaces::{StockCache, StockStore};

pub mod mock;
pub mod redis;
pub mod schema;
pub mod sql;

pub use redis::RedisStockCache;
pub use sql::SqlStockStore;

#[cfg(feature = "mysql")]
pub use sql::mysql::MySqlStockStore;
#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteStockStore;

/// Initialize the durable stock store based on configuration.
pub async fn init_storage(
    config: &DatabaseConfig,
) -> Result<Arc<dyn StockStore>, Box<dyn std::error::Error>> {
    match config.backend {
        #[cfg(feature = "sqlite")]
        DatabaseBackend::Sqlite => {
            info!("Durable store: sqlite at {}", config.sqlite.path);

            if let Some(parent) = std::path::Path::new(&config.sqlite.path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let pool =
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.sqlite.path))
                    .await?;

            let store = Arc::new(SqliteStockStore::new(pool));
            store.init().await?;

            Ok(store)
        }
        #[cfg(feature = "mysql")]
        DatabaseBackend::Mysql => {
            info!("Durable store: mysql");

            let pool = sqlx::MySqlPool::connect(&config.mysql.uri).await?;

            let store = Arc::new(MySqlStockStore::new(pool));
            store.init().await?;

            Ok(store)
        }
        #[allow(unreachable_patterns)]
        ref other => Err(format!("Database backend {other:?} not enabled in this build").into()),
    }
}

/// Initialize the stock cache based on configuration.
pub async fn init_cache(
    config: &CacheConfig,
) -> Result<Arc<dyn StockCache>, Box<dyn std::error::Error>> {
    let cache = RedisStockCache::new(&config.uri, Some(&config.key_prefix)).await?;
    Ok(Arc::new(cache))
}
