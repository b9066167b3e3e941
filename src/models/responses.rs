//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, EntrySummary};

/// Response body for a cache hit (GET /entries/:patient_id/:data_type)
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub hit: bool,
    pub data: Value,
    pub entry: EntrySummary,
}

impl LookupResponse {
    /// Creates a response from a hit entry
    pub fn hit(entry: CacheEntry<Value>) -> Self {
        let summary = EntrySummary::from(&entry);
        Self {
            hit: true,
            data: entry.payload,
            entry: summary,
        }
    }
}

/// Response body for storing an entry
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The resolved key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for invalidating one entry
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The resolved key that was invalidated
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' invalidated", key),
            key,
        }
    }
}

/// Response body for change detection
#[derive(Debug, Clone, Serialize)]
pub struct ChangedResponse {
    pub key: String,
    pub changed: bool,
}

/// Response body for patient-wide invalidation (DELETE /patients/:patient_id)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInvalidationResponse {
    pub patient_id: String,
    pub removed: usize,
}

/// Response body for warmup (POST /warmup)
#[derive(Debug, Clone, Serialize)]
pub struct WarmupResponse {
    /// Number of placeholders written
    pub written: usize,
}

/// Response body for clearing the cache (DELETE /entries)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for removing a rule (DELETE /rules/:name)
#[derive(Debug, Clone, Serialize)]
pub struct RuleRemovedResponse {
    pub name: String,
    pub removed: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
