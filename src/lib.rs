//! Patient Cache - A two-tier cache for per-patient derived data
//!
//! Avoids recomputing extracted fields, AI reviews and validation results by
//! caching them with content-hash change detection, TTL expiry, LRU eviction
//! and rule-based invalidation over an in-memory tier and a durable tier.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, CacheLookup, DataType, PatientCache};
pub use config::{CacheConfig, Config};
pub use storage::{DurableStore, FileStore, MemoryStore};
pub use tasks::spawn_invalidation_task;
