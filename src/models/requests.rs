//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::QualityMetadata;

/// Request body for storing an entry (PUT /entries/:patient_id/:data_type)
///
/// # Fields
/// - `payload`: The value to cache
/// - `quality`: Optional quality metadata (e.g. `{"confidenceLevel": "low"}`)
/// - `ttl_ms`: Optional TTL in milliseconds (uses the configured default if not specified)
/// - `version`: Optional key version (defaults to `v1`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntryRequest {
    pub payload: Value,
    #[serde(default)]
    pub quality: Option<QualityMetadata>,
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    #[serde(default)]
    pub version: Option<String>,
}

impl SetEntryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_version(self.version.as_deref())
    }
}

/// Request body for change detection (POST /entries/:patient_id/:data_type/changed)
#[derive(Debug, Clone, Deserialize)]
pub struct HasChangedRequest {
    pub payload: Value,
    #[serde(default)]
    pub version: Option<String>,
}

/// Request body for warmup (POST /warmup)
#[derive(Debug, Clone, Deserialize)]
pub struct WarmupRequest {
    pub patients: Vec<String>,
}

impl WarmupRequest {
    pub fn validate(&self) -> Option<String> {
        if self.patients.iter().any(|p| p.is_empty()) {
            return Some("Patient id cannot be empty".to_string());
        }
        None
    }
}

/// Optional `?version=` query parameter on entry routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionQuery {
    #[serde(default)]
    pub version: Option<String>,
}

impl VersionQuery {
    pub fn validate(&self) -> Option<String> {
        validate_version(self.version.as_deref())
    }
}

fn validate_version(version: Option<&str>) -> Option<String> {
    match version {
        Some(v) if v.is_empty() => Some("Version cannot be empty".to_string()),
        _ => None,
    }
}
