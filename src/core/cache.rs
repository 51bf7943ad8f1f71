use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::core::currency::RateTable;

/// How long a fetched rate table stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 5);

struct CacheEntry {
    table: RateTable,
    fetched_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fresh(RateTable),
    Stale(RateTable),
    Missing,
}

/// In-memory rate tables keyed by base currency.
///
/// Entries are overwritten on refresh and never evicted.
#[derive(Clone)]
pub struct RateCache {
    inner: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn lookup(&self, base: &str) -> CacheLookup {
        let cache = self.inner.lock().await;
        match cache.get(base) {
            Some(entry) if entry.fetched_at.elapsed() < CACHE_TTL => {
                debug!("Cache HIT for base: {}", base);
                CacheLookup::Fresh(entry.table.clone())
            }
            Some(entry) => {
                debug!("Cache STALE for base: {}", base);
                CacheLookup::Stale(entry.table.clone())
            }
            None => {
                debug!("Cache MISS for base: {}", base);
                CacheLookup::Missing
            }
        }
    }

    pub async fn put(&self, base: &str, table: RateTable) {
        let mut cache = self.inner.lock().await;
        let rates = table.len();
        cache.insert(
            base.to_string(),
            CacheEntry {
                table,
                fetched_at: Instant::now(),
            },
        );
        debug!(
            "Cache PUT for base: {} ({} rates, {} bases cached)",
            base,
            rates,
            cache.len()
        );
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}
