// Content-addressed cache in front of the engine.
//
// Key: hex SHA-256 over the JSON form of the batch and the engine
// parameters. Identical input always maps to the same key, so a hit is
// exactly the report a fresh run would produce. Errors are never stored.
// The engine stays stateless; all state lives here.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::hottest::{find_hottest_topic, EngineParams, TopicReport};
use crate::articles::ArticleBatch;
use crate::error::EngineResult;
use crate::sentiment::traits::SentimentClassifier;

/// Default number of reports kept before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 16;

pub struct ReportCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, Arc<TopicReport>>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Hex SHA-256 of the serialized batch and parameters, or `None` if they
/// cannot be serialized.
pub fn cache_key(batch: &ArticleBatch, params: &EngineParams) -> Option<String> {
    let mut hasher = Sha256::new();
    if let Err(e) = serde_json::to_writer(&mut hasher, &(batch, params)) {
        warn!(error = %e, "Failed to serialize batch for cache key");
        return None;
    }
    Some(hex::encode(hasher.finalize()))
}

impl ReportCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    // A panic elsewhere cannot leave the map half-updated, so a poisoned
    // lock is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached report for this input, or run the engine and
    /// remember its result.
    pub fn get_or_compute(
        &self,
        batch: &ArticleBatch,
        params: &EngineParams,
        classifier: &dyn SentimentClassifier,
    ) -> EngineResult<Arc<TopicReport>> {
        let Some(key) = cache_key(batch, params) else {
            return find_hottest_topic(batch, params, classifier).map(Arc::new);
        };

        {
            let mut inner = self.lock();
            if let Some(report) = inner.entries.get(&key).cloned() {
                inner.hits += 1;
                debug!(key = %&key[..12], "Report cache hit");
                return Ok(report);
            }
            inner.misses += 1;
        }

        // The engine runs outside the lock; a concurrent miss on the same key
        // computes the same report and the second insert is a no-op.
        let report = Arc::new(find_hottest_topic(batch, params, classifier)?);

        let mut inner = self.lock();
        if !inner.entries.contains_key(&key) {
            if inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
            inner.order.push_back(key.clone());
            inner.entries.insert(key, Arc::clone(&report));
        }

        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        let inner = self.lock();
        (inner.hits, inner.misses)
    }
}
