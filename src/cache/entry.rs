//! Cache Entry Module
//!
//! Defines cached entries, their quality metadata and TTL bookkeeping.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::{CacheKey, DataType};

// == Confidence Level ==
/// Confidence attached to a payload by whatever produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

// == Quality Metadata ==
/// Metadata describing payload quality.
///
/// Only `confidence_level` is interpreted by the cache (see the default
/// invalidation rules); every other field is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QualityMetadata {
    pub fn with_confidence(level: ConfidenceLevel) -> Self {
        Self {
            confidence_level: Some(level),
            extra: Map::new(),
        }
    }

    /// Adds an arbitrary metadata field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence_level == Some(ConfidenceLevel::Low)
    }
}

// == Cache Entry ==
/// A cached payload plus the metadata used for expiry, eviction and
/// change detection. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// Resolved string key
    pub key: String,
    pub patient_id: String,
    pub data_type: DataType,
    pub payload: T,
    pub created_at: i64,
    /// Content hash of the payload
    pub data_hash: String,
    #[serde(default)]
    pub quality: QualityMetadata,
    pub expiry_time: i64,
    pub access_count: u64,
    pub last_accessed: i64,
    /// Set by the `mark_stale` rule action
    #[serde(default)]
    pub stale: bool,
    /// Tie-breaker for entries touched within the same millisecond
    #[serde(skip)]
    pub(crate) touch_seq: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry written at `now` that lives for `ttl_ms`.
    pub fn new(
        key: &CacheKey,
        payload: T,
        data_hash: String,
        quality: QualityMetadata,
        ttl_ms: u64,
        now: i64,
    ) -> Self {
        Self {
            key: key.resolve(),
            patient_id: key.patient_id.clone(),
            data_type: key.data_type,
            payload,
            created_at: now,
            data_hash,
            quality,
            expiry_time: now.saturating_add(ttl_ms.min(i64::MAX as u64) as i64),
            access_count: 0,
            last_accessed: now,
            stale: false,
            touch_seq: 0,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiry time, so an entry
    /// whose expiry was forced to "now" is already expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expiry_time
    }

    /// Milliseconds since creation.
    pub fn age_ms(&self, now: i64) -> i64 {
        now - self.created_at
    }

    /// Milliseconds since the last successful read (or creation).
    pub fn idle_ms(&self, now: i64) -> i64 {
        now - self.last_accessed
    }

    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now: i64) -> i64 {
        (self.expiry_time - now).max(0)
    }

    /// Records a successful read.
    pub(crate) fn touch(&mut self, now: i64, seq: u64) {
        self.access_count += 1;
        self.last_accessed = self.last_accessed.max(now);
        self.touch_seq = seq;
    }
}

impl<T: Serialize> CacheEntry<T> {
    /// Size of the entry's JSON serialization in bytes.
    pub fn size_bytes(&self) -> u64 {
        serde_json::to_vec(self).map(|v| v.len() as u64).unwrap_or(0)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
