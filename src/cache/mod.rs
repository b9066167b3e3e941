//! Cache Module
//!
//! Two-tier patient cache with content-hash change detection, TTL expiry,
//! LRU eviction and rule-based invalidation.

mod codec;
mod entry;
mod eviction;
mod hash;
mod info;
mod key;
mod rules;
mod stats;
mod store;


// Re-export public types
pub use codec::{decode_entry, encode_entry, CodecError};
pub use entry::{current_timestamp_ms, CacheEntry, ConfidenceLevel, QualityMetadata};
pub use eviction::{select_victims, SIZE_EVICTION_FRACTION};
pub use hash::content_hash;
pub use info::{CacheExport, CacheInfo, EntrySummary, EXPIRING_SOON_WINDOW_MS, TOP_ACCESSED_LIMIT};
pub use key::{CacheKey, DataType, ParseDataTypeError, DEFAULT_VERSION};
pub use rules::{default_rules, InvalidationRule, RuleAction, RuleCondition, RuleSet, RuleSummary};
pub use stats::{CacheCounters, CacheStats};
pub use store::{
    CacheLookup, MissReason, Payload, PatientCache, SweepReport, NAMESPACE,
    WARMUP_PLACEHOLDER_TTL_MS,
};
