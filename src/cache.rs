use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::models::{PlacementRequest, PlacementResponse};

/// LRU memo of solved requests, keyed by the canonical request JSON.
/// A capacity of 0 disables caching.
pub struct SolveCache {
    inner: Option<Mutex<LruCache<String, PlacementResponse>>>,
}

impl SolveCache {
    pub fn new(capacity: usize) -> Self {
        SolveCache {
            inner: NonZeroUsize::new(capacity).map(|c| Mutex::new(LruCache::new(c))),
        }
    }

    pub fn key(request: &PlacementRequest) -> Option<String> {
        serde_json::to_string(request).ok()
    }

    pub fn get(&self, key: &str) -> Option<PlacementResponse> {
        self.inner.as_ref()?.lock().get(key).cloned()
    }

    pub fn put(&self, key: String, response: PlacementResponse) {
        if let Some(inner) = &self.inner {
            inner.lock().put(key, response);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map(|c| c.lock().len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
