use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

/// Recently served trip details, by trip_id
///
/// The feed never changes while the process runs, so a cached response stays valid.
/// A capacity of 0 disables the cache.
pub struct TripCache {
    inner: Option<Mutex<LruCache<String, Value>>>,
}

impl TripCache {
    pub fn new(capacity: usize) -> Self {
        TripCache {
            inner: NonZeroUsize::new(capacity).map(|c| Mutex::new(LruCache::new(c))),
        }
    }

    pub fn check_cache(&self, trip_id: &str) -> Option<Value> {
        self.inner
            .as_ref()?
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(trip_id)
            .cloned()
    }

    pub fn insert_cache(&self, trip_id: String, response: Value) {
        if let Some(inner) = &self.inner {
            let mut cache = inner.lock().unwrap_or_else(PoisonError::into_inner);
            cache.put(trip_id, response);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| {
            inner.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }
}
