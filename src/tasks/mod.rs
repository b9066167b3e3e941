//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Invalidation sweep: applies the cache's invalidation rules at a fixed interval

mod sweep;

pub use sweep::spawn_invalidation_task;
