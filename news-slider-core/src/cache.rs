//! Caching of built slider entries.
//!
//! Provides the [`SliderCache`] trait as a port for cache implementations,
//! along with error types, an in-process adapter and the SQLite adapter.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CacheConfig;
use crate::entry::DisplayEntry;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// A migration operation failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A stored value could not be encoded or decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// An entry list together with the time it was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedNews {
    /// When the entries were built.
    pub built_at: DateTime<Utc>,
    /// The entries, in display order.
    pub entries: Vec<DisplayEntry>,
}

impl CachedNews {
    /// Wrap freshly built entries.
    pub fn new(built_at: DateTime<Utc>, entries: Vec<DisplayEntry>) -> Self {
        Self { built_at, entries }
    }

    /// Whether the entries may still be served at `now`.
    ///
    /// Fresh until `built_at + ttl_seconds`, inclusive.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_seconds: u64) -> bool {
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        match Duration::try_seconds(ttl).and_then(|ttl| self.built_at.checked_add_signed(ttl)) {
            Some(expires_at) => expires_at >= now,
            None => true,
        }
    }
}

/// Port for slider cache implementations.
#[async_trait]
pub trait SliderCache: Send + Sync {
    /// Get the cached value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored. Freshness is the caller's
    /// concern.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails or the value is corrupt.
    async fn get(&self, key: &str) -> Result<Option<CachedNews>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails.
    async fn put(&self, key: &str, value: &CachedNews) -> Result<(), CacheError>;
}

/// Create the cache backend selected by `config`.
///
/// Returns `Ok(None)` when caching is disabled. Without a database URL an
/// in-process cache is used.
///
/// # Errors
///
/// Returns [`CacheError`] if the SQLite cache cannot be opened.
pub async fn create_cache(config: &CacheConfig) -> Result<Option<Arc<dyn SliderCache>>, CacheError> {
    if !config.enabled {
        return Ok(None);
    }

    let cache: Arc<dyn SliderCache> = match &config.database_url {
        Some(url) => Arc::new(SqliteCache::new(url).await?),
        None => Arc::new(MemoryCache::new()),
    };
    Ok(Some(cache))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_cache_error_display() {
        let db_err = CacheError::Database("connection failed".to_string());
        assert_eq!(db_err.to_string(), "database error: connection failed");

        let invalid = CacheError::InvalidData("bad json".to_string());
        assert_eq!(invalid.to_string(), "invalid data: bad json");
    }

    #[test]
    fn test_is_fresh_until_ttl_elapses() {
        let cached = CachedNews::new(at(1_000), Vec::new());
        assert!(cached.is_fresh(at(1_000), 300));
        assert!(cached.is_fresh(at(1_300), 300));
        assert!(!cached.is_fresh(at(1_301), 300));
    }

    #[test]
    fn test_is_fresh_zero_ttl() {
        let cached = CachedNews::new(at(1_000), Vec::new());
        assert!(cached.is_fresh(at(1_000), 0));
        assert!(!cached.is_fresh(at(1_001), 0));
    }

    #[test]
    fn test_is_fresh_huge_ttl() {
        let cached = CachedNews::new(at(1_000), Vec::new());
        assert!(cached.is_fresh(at(2_000_000_000), u64::MAX));
    }

    #[tokio::test]
    async fn test_create_cache_disabled() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(create_cache(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_cache_memory_by_default() {
        let cache = create_cache(&CacheConfig::default())
            .await
            .unwrap()
            .unwrap();
        let value = CachedNews::new(at(5), Vec::new());
        cache.put("k", &value).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(value));
    }
}
