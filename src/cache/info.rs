//! Introspection Module
//!
//! Diagnostic views over the live entry set. None of this feeds back into
//! cache decisions.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats, DataType, QualityMetadata, RuleSummary};
use crate::config::CacheConfig;

/// Number of entries listed in `top_accessed`
pub const TOP_ACCESSED_LIMIT: usize = 10;

/// Window used for `expiring_soon` (5 minutes)
pub const EXPIRING_SOON_WINDOW_MS: i64 = 5 * 60 * 1000;

// == Entry Summary ==
/// Entry metadata with the payload left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub key: String,
    pub patient_id: String,
    pub data_type: DataType,
    pub created_at: i64,
    pub expiry_time: i64,
    pub access_count: u64,
    pub last_accessed: i64,
    pub data_hash: String,
    pub quality: QualityMetadata,
    pub stale: bool,
    pub size_bytes: u64,
}

impl<T: Serialize> From<&CacheEntry<T>> for EntrySummary {
    fn from(entry: &CacheEntry<T>) -> Self {
        Self {
            key: entry.key.clone(),
            patient_id: entry.patient_id.clone(),
            data_type: entry.data_type,
            created_at: entry.created_at,
            expiry_time: entry.expiry_time,
            access_count: entry.access_count,
            last_accessed: entry.last_accessed,
            data_hash: entry.data_hash.clone(),
            quality: entry.quality.clone(),
            stale: entry.stale,
            size_bytes: entry.size_bytes(),
        }
    }
}

// == Cache Info ==
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub stats: CacheStats,
    pub config: CacheConfig,
    pub rules: Vec<RuleSummary>,
    /// Most-read entries, highest access count first
    pub top_accessed: Vec<EntrySummary>,
    /// Live entries expiring within the next five minutes, soonest first
    pub expiring_soon: Vec<EntrySummary>,
    /// Total serialized bytes per patient
    pub patient_sizes: BTreeMap<String, u64>,
}

impl CacheInfo {
    pub fn compute<T: Serialize>(
        entries: &HashMap<String, CacheEntry<T>>,
        stats: CacheStats,
        config: CacheConfig,
        rules: Vec<RuleSummary>,
        now: i64,
    ) -> Self {
        let mut by_access: Vec<&CacheEntry<T>> = entries.values().collect();
        by_access.sort_by(|a, b| {
            b.access_count
                .cmp(&a.access_count)
                .then_with(|| a.key.cmp(&b.key))
        });
        let top_accessed = by_access
            .into_iter()
            .take(TOP_ACCESSED_LIMIT)
            .map(EntrySummary::from)
            .collect();

        let mut expiring: Vec<&CacheEntry<T>> = entries
            .values()
            .filter(|e| !e.is_expired_at(now) && e.expiry_time - now <= EXPIRING_SOON_WINDOW_MS)
            .collect();
        expiring.sort_by_key(|e| e.expiry_time);
        let expiring_soon = expiring.into_iter().map(EntrySummary::from).collect();

        let mut patient_sizes = BTreeMap::new();
        for entry in entries.values() {
            *patient_sizes.entry(entry.patient_id.clone()).or_insert(0) += entry.size_bytes();
        }

        Self {
            stats,
            config,
            rules,
            top_accessed,
            expiring_soon,
            patient_sizes,
        }
    }
}

// == Cache Export ==
/// Metadata-only dump of the cache, for diagnostics and migration reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheExport {
    pub exported_at: DateTime<Utc>,
    pub config: CacheConfig,
    pub stats: CacheStats,
    pub entries: Vec<EntrySummary>,
}
