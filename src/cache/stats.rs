//! Cache Statistics Module
//!
//! Running request counters plus the snapshot derived from the live entry set.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::CacheEntry;

// == Cache Counters ==
/// Counters updated on every lookup and eviction.
#[derive(Debug, Clone, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}

// == Cache Stats ==
/// Point-in-time statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_size_bytes: u64,
    pub entry_count: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub total_requests: u64,
    pub hit_rate: f64,
    pub eviction_count: u64,
    /// Creation time of the oldest live entry (Unix ms)
    pub oldest_entry: Option<i64>,
    /// Creation time of the newest live entry (Unix ms)
    pub newest_entry: Option<i64>,
}

impl CacheStats {
    /// Builds a snapshot. Size and age figures are recomputed from `entries`
    /// on every call rather than tracked incrementally.
    pub fn compute<T: Serialize>(
        entries: &HashMap<String, CacheEntry<T>>,
        counters: &CacheCounters,
    ) -> Self {
        let total_requests = counters.total_requests();
        let hit_rate = if total_requests == 0 {
            0.0
        } else {
            counters.hits as f64 / total_requests as f64
        };

        Self {
            total_size_bytes: entries.values().map(|e| e.size_bytes()).sum(),
            entry_count: entries.len(),
            hit_count: counters.hits,
            miss_count: counters.misses,
            total_requests,
            hit_rate,
            eviction_count: counters.evictions,
            oldest_entry: entries.values().map(|e| e.created_at).min(),
            newest_entry: entries.values().map(|e| e.created_at).max(),
        }
    }
}
