//! In-process cache.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CacheError, CachedNews, SliderCache};

/// Cache held in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    values: Mutex<HashMap<String, CachedNews>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SliderCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CachedNews>, CacheError> {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(values.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &CachedNews) -> Result<(), CacheError> {
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value.clone());
        Ok(())
    }
}
