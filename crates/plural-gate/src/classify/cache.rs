//! Decision cache keyed by (room id, event id).
//!
//! Eviction is deliberately coarse: once the cache is full, inserting a new
//! key clears everything first. No LRU, no TTL.

use std::collections::HashMap;
use std::sync::Mutex;

/// Entry count at which the next new key triggers a full clear.
pub const CACHE_CAPACITY: usize = 1000;

#[derive(Debug)]
pub struct DecisionCache {
    capacity: usize,
    inner: Mutex<HashMap<(String, String), bool>>,
}

impl Default for DecisionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Events without an id always miss.
    pub fn lookup(&self, room_id: &str, event_id: Option<&str>) -> Option<bool> {
        let event_id = event_id.filter(|s| !s.is_empty())?;
        // Poisoned lock: behave as a miss and let the caller reclassify.
        let g = self.inner.lock().ok()?;
        g.get(&(room_id.to_string(), event_id.to_string())).copied()
    }

    /// Store a verdict. Returns true when the insertion cleared the cache.
    pub fn store(&self, room_id: &str, event_id: Option<&str>, is_proxy: bool) -> bool {
        let Some(event_id) = event_id.filter(|s| !s.is_empty()) else {
            return false;
        };
        let Ok(mut g) = self.inner.lock() else {
            return false;
        };

        let key = (room_id.to_string(), event_id.to_string());
        let mut cleared = false;
        if g.len() >= self.capacity && !g.contains_key(&key) {
            g.clear();
            cleared = true;
        }
        g.insert(key, is_proxy);
        cleared
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
