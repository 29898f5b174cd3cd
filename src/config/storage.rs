//! Storage configuration types.

use serde::Deserialize;

/// Database backend discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Mysql,
    #[default]
    Sqlite,
}

/// Storage configuration: the durable store plus the cache.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Durable database configuration.
    pub database: DatabaseConfig,
    /// Cache configuration.
    pub cache: CacheConfig,
}

/// Durable database configuration (discriminated union).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database backend discriminator.
    #[serde(rename = "type")]
    pub backend: DatabaseBackend,
    /// MySQL-specific configuration.
    pub mysql: MysqlConfig,
    /// SQLite-specific configuration.
    pub sqlite: SqliteConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Sqlite,
            mysql: MysqlConfig::default(),
            sqlite: SqliteConfig::default(),
        }
    }
}

/// MySQL-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MysqlConfig {
    /// MySQL connection URI.
    pub uri: String,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            uri: "mysql://localhost:3306/stocksync".to_string(),
        }
    }
}

/// SQLite-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the database file.
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "data/stocksync.db".to_string(),
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URI.
    pub uri: String,
    /// Prefix for cache keys; `stock` yields the `stock:{product_id}`
    /// key scheme.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            uri: "redis://localhost:6379".to_string(),
            key_prefix: "stock".to_string(),
        }
    }
}
