//! Redis StockCache implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::{debug, info};

use crate::interfaces::{ProductStock, Result, StockCache};

/// Default key prefix; yields the `stock:{product_id}` key scheme.
const DEFAULT_KEY_PREFIX: &str = "stock";

/// Redis stock cache.
///
/// Each product's entry is a hash at `{prefix}:{product_id}` holding the
/// quantity plus denormalized product metadata. All fields are stored as
/// text. There is no cross-key locking: concurrent read-modify-write
/// cycles on the same product can race, and divergence from the durable
/// store heals through a full rebuild.
pub struct RedisStockCache {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisStockCache {
    /// Create a new Redis stock cache.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., redis://localhost:6379)
    /// * `key_prefix` - Prefix for all keys (default: "stock")
    pub async fn new(url: &str, key_prefix: Option<&str>) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        info!(url = %url, "Connected to Redis for stock cache");

        Ok(Self {
            conn,
            key_prefix: key_prefix.unwrap_or(DEFAULT_KEY_PREFIX).to_string(),
        })
    }

    /// Build the entry key for a product.
    fn entry_key(&self, product_id: i64) -> String {
        format!("{}:{}", self.key_prefix, product_id)
    }

    /// Hash fields for a full entry write.
    fn entry_fields(entry: &ProductStock) -> [(&'static str, String); 4] {
        [
            ("quantity", entry.quantity.to_string()),
            ("name", entry.name.clone()),
            ("sku", entry.sku.clone()),
            ("price", entry.price.to_string()),
        ]
    }
}

#[async_trait]
impl StockCache for RedisStockCache {
    async fn is_warm(&self) -> Result<bool> {
        let pattern = format!("{}:*", self.key_prefix);
        let mut conn = self.conn.clone();

        // Use SCAN to probe for keys (non-blocking iteration); stop as soon
        // as any key matches.
        let mut cursor = 0u64;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                return Ok(true);
            }

            cursor = next_cursor;
            if cursor == 0 {
                return Ok(false);
            }
        }
    }

    async fn quantity(&self, product_id: i64) -> Result<Option<i64>> {
        let key = self.entry_key(product_id);
        let mut conn = self.conn.clone();

        let quantity: Option<i64> = conn.hget(&key, "quantity").await?;
        Ok(quantity)
    }

    async fn set_quantity(&self, product_id: i64, quantity: i64) -> Result<()> {
        let key = self.entry_key(product_id);
        let mut conn = self.conn.clone();

        let _: () = conn.hset(&key, "quantity", quantity).await?;

        debug!(product_id, quantity, "Wrote quantity to stock cache");
        Ok(())
    }

    async fn entry(&self, product_id: i64) -> Result<Option<ProductStock>> {
        let key = self.entry_key(product_id);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = conn.hgetall(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(ProductStock {
            product_id,
            name: fields
                .get("name")
                .cloned()
                .unwrap_or_else(|| format!("Product {product_id}")),
            sku: fields
                .get("sku")
                .cloned()
                .unwrap_or_else(|| format!("SKU-{product_id}")),
            price: fields
                .get("price")
                .and_then(|price| price.parse().ok())
                .unwrap_or(0.0),
            quantity: fields
                .get("quantity")
                .and_then(|quantity| quantity.parse().ok())
                .unwrap_or(0),
        }))
    }

    async fn write_batch(&self, entries: &[ProductStock]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();

        for entry in entries {
            pipe.hset_multiple(self.entry_key(entry.product_id), &Self::entry_fields(entry))
                .ignore();
        }

        let _: () = pipe.query_async(&mut conn).await?;

        debug!(count = entries.len(), "Wrote stock entries through pipeline");
        Ok(())
    }

    async fn rebuild(&self, entries: &[ProductStock]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();

        // MULTI/EXEC: every entry becomes visible at once.
        let mut pipe = redis::pipe();
        pipe.atomic();

        for entry in entries {
            pipe.hset_multiple(self.entry_key(entry.product_id), &Self::entry_fields(entry))
                .ignore();
        }

        let _: () = pipe.query_async(&mut conn).await?;

        info!(count = entries.len(), "Rebuilt stock cache");
        Ok(())
    }
}
