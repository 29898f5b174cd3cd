//! Redis storage implementations.

mod stock_cache;

pub use stock_cache::RedisStockCache;

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::interfaces::{ProductStock, StockCache};

    // Integration tests require Redis running
    // Run with: cargo test -- --ignored

    fn entry(product_id: i64, quantity: i64) -> ProductStock {
        ProductStock {
            product_id,
            name: format!("Product {product_id}"),
            sku: format!("SKU-{product_id}"),
            price: 10.0,
            quantity,
        }
    }

    #[tokio::test]
    #[serial]
    #[ignore]
    async fn test_redis_stock_cache_roundtrip() {
        let cache = RedisStockCache::new("redis://localhost:6379", Some("stocksync-test"))
            .await
            .expect("Failed to connect to Redis");

        cache
            .rebuild(&[entry(1, 5), entry(2, 7)])
            .await
            .expect("Failed to rebuild cache");

        assert!(cache.is_warm().await.expect("Failed to scan cache"));
        assert_eq!(cache.quantity(1).await.unwrap(), Some(5));

        let stored = cache.entry(2).await.unwrap().expect("entry missing");
        assert_eq!(stored.quantity, 7);
        assert_eq!(stored.sku, "SKU-2");

        cache.set_quantity(1, 3).await.unwrap();
        assert_eq!(cache.quantity(1).await.unwrap(), Some(3));

        // Metadata survives a quantity-only write.
        let stored = cache.entry(1).await.unwrap().expect("entry missing");
        assert_eq!(stored.name, "Product 1");
    }

    #[tokio::test]
    #[serial]
    #[ignore]
    async fn test_redis_stock_cache_batched_writes() {
        let cache = RedisStockCache::new("redis://localhost:6379", Some("stocksync-test"))
            .await
            .expect("Failed to connect to Redis");

        cache
            .write_batch(&[entry(10, 1), entry(11, 2), entry(12, 3)])
            .await
            .expect("Failed to write batch");

        assert_eq!(cache.quantity(11).await.unwrap(), Some(2));
        assert_eq!(cache.quantity(404).await.unwrap(), None);
    }
}
