//! Eviction Module
//!
//! Picks least recently used entries to drop when the cache exceeds its
//! size or entry-count ceiling.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::CacheEntry;
use crate::config::CacheConfig;

/// Share of entries dropped in one pass once the size ceiling is exceeded
pub const SIZE_EVICTION_FRACTION: f64 = 0.2;

struct Candidate<'a> {
    key: &'a str,
    last_accessed: i64,
    touch_seq: u64,
    size: u64,
}

// == Select Victims ==
/// Returns the keys to evict, least recently accessed first.
///
/// Over the size ceiling, the oldest 20% of entries go (at least one), and
/// eviction continues in the same order until the total fits. Over the count
/// ceiling, exactly enough further entries go to get back to `max_entries`.
pub fn select_victims<T: Serialize>(
    entries: &HashMap<String, CacheEntry<T>>,
    config: &CacheConfig,
) -> Vec<String> {
    let mut candidates: Vec<Candidate<'_>> = entries
        .iter()
        .map(|(key, entry)| Candidate {
            key,
            last_accessed: entry.last_accessed,
            touch_seq: entry.touch_seq,
            size: entry.size_bytes(),
        })
        .collect();

    let mut total_size: u64 = candidates.iter().map(|c| c.size).sum();
    if total_size <= config.max_size_bytes && candidates.len() <= config.max_entries {
        return Vec::new();
    }

    candidates.sort_by(|a, b| {
        a.last_accessed
            .cmp(&b.last_accessed)
            .then(a.touch_seq.cmp(&b.touch_seq))
    });

    let mut evicted = 0usize;

    if total_size > config.max_size_bytes {
        let batch = ((candidates.len() as f64 * SIZE_EVICTION_FRACTION).ceil() as usize).max(1);
        while evicted < candidates.len()
            && (evicted < batch || total_size > config.max_size_bytes)
        {
            total_size -= candidates[evicted].size;
            evicted += 1;
        }
    }

    let remaining = candidates.len() - evicted;
    if remaining > config.max_entries {
        evicted += remaining - config.max_entries;
    }

    candidates
        .into_iter()
        .take(evicted)
        .map(|c| c.key.to_string())
        .collect()
}
