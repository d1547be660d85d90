//! SQLite cache implementation.
//!
//! Provides [`SqliteCache`], which keeps built entry lists across process
//! restarts so short-lived hosts still benefit from the TTL.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{CacheError, CachedNews, SliderCache};
use crate::entry::DisplayEntry;

/// SQLite-based slider cache.
///
/// Uses connection pooling and WAL mode for performance.
/// Runs migrations automatically on startup.
pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    /// Open (or create) the cache database at `database_url`.
    ///
    /// The URL should be in the format `sqlite:path/to/cache.db`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Database`] if connection fails.
    /// Returns [`CacheError::Migration`] if migrations fail.
    pub async fn new(database_url: &str) -> Result<Self, CacheError> {
        let url = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        let path = PathBuf::from(url);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CacheError::Database(format!("failed to create database directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(url)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let cache = Self { pool };
        cache.run_migrations().await?;

        tracing::debug!(path = %path.display(), "cache: sqlite cache opened");
        Ok(cache)
    }

    async fn run_migrations(&self) -> Result<(), CacheError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CacheError::Migration(e.to_string()))
    }
}

#[async_trait]
impl SliderCache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<CachedNews>, CacheError> {
        let row = sqlx::query(
            r#"
            SELECT built_at, entries
            FROM slider_cache
            WHERE cache_key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CacheError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let built_at_str: String = row.get("built_at");
        let built_at = DateTime::parse_from_rfc3339(&built_at_str)
            .map_err(|e| CacheError::InvalidData(format!("invalid datetime: {}", e)))?
            .with_timezone(&Utc);

        let entries_json: String = row.get("entries");
        let entries: Vec<DisplayEntry> = serde_json::from_str(&entries_json)
            .map_err(|e| CacheError::InvalidData(format!("invalid entries: {}", e)))?;

        Ok(Some(CachedNews { built_at, entries }))
    }

    async fn put(&self, key: &str, value: &CachedNews) -> Result<(), CacheError> {
        let entries = serde_json::to_string(&value.entries)
            .map_err(|e| CacheError::InvalidData(format!("cannot encode entries: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO slider_cache (cache_key, built_at, entries)
            VALUES (?, ?, ?)
            ON CONFLICT(cache_key) DO UPDATE SET
                built_at = excluded.built_at,
                entries = excluded.entries
            "#,
        )
        .bind(key)
        .bind(value.built_at.to_rfc3339())
        .bind(entries)
        .execute(&self.pool)
        .await
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }
}
