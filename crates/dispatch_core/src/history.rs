//! Session-lifetime search history for the location-search screen.
//!
//! Bounded, de-duplicated by place id, most-recent-first. Not persisted
//! across app restarts; cleared at logout.

use bevy_ecs::prelude::Resource;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// One remembered place selection. Coordinates are present only when the
/// search collaborator resolved them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub place_id: String,
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub timestamp_ms: u64,
}

#[derive(Resource)]
pub struct SearchHistory {
    entries: LruCache<String, SearchHistoryEntry>,
}

impl SearchHistory {
    pub const CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(Self::CAPACITY).expect("history capacity must be > 0"),
            ),
        }
    }

    /// Record a selection. Re-recording an existing place id moves it to the
    /// front without growing the list; at capacity the least recent entry is
    /// evicted.
    pub fn record(&mut self, entry: SearchHistoryEntry) {
        self.entries.put(entry.place_id.clone(), entry);
    }

    /// Entries most-recent-first.
    pub fn recent(&self) -> Vec<&SearchHistoryEntry> {
        self.entries.iter().map(|(_, entry)| entry).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}
