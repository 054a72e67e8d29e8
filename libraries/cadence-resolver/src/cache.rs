//! TTL-bounded handle cache
//!
//! Stream links from the backend expire server-side; the cache TTL is kept
//! deliberately shorter than the backend's link lifetime so a hit is always
//! still playable. Expired entries are pruned on read.

use crate::types::PlayableHandle;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct CacheEntry {
    handle: PlayableHandle,
    inserted_at: Instant,
}

/// Resolved-handle cache keyed by track id
pub(crate) struct HandleCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl HandleCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get(&mut self, track_id: &str) -> Option<PlayableHandle> {
        self.get_at(track_id, Instant::now())
    }

    fn get_at(&mut self, track_id: &str, now: Instant) -> Option<PlayableHandle> {
        match self.entries.get(track_id) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                Some(entry.handle.clone())
            }
            Some(_) => {
                self.entries.remove(track_id);
                None
            }
            None => None,
        }
    }

    pub(crate) fn insert(&mut self, track_id: String, handle: PlayableHandle) {
        self.entries.insert(
            track_id,
            CacheEntry {
                handle,
                inserted_at: Instant::now(),
            },
        );
    }

    pub(crate) fn invalidate(&mut self, track_id: &str) {
        self.entries.remove(track_id);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
