//! stocksync-resync: one-shot cache reconciliation.
//!
//! Loads configuration, connects the durable store and the cache, and runs
//! a single full resynchronization. This is the recovery path for cache
//! staleness left behind by the best-effort dual write.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stocksync::config::{Config, LOG_ENV_VAR};
use stocksync::storage::{init_cache, init_storage};
use stocksync::sync::StockSync;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(None).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let store = init_storage(&config.storage.database).await?;
    let cache = init_cache(&config.storage.cache).await?;

    let sync = StockSync::new(store, cache);
    let count = sync.resync().await?;

    info!(count, "Stock cache resync complete");
    Ok(())
}
