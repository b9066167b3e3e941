//! Cache Key Module
//!
//! Identifies a cached payload by patient, data kind and schema version.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Version used when a key does not name one
pub const DEFAULT_VERSION: &str = "v1";

// == Data Type ==
/// Kind of derived data held for a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    ExtractedData,
    AiReview,
    ValidationResult,
}

impl DataType {
    /// All data types, in declaration order.
    pub const ALL: [DataType; 3] = [
        DataType::ExtractedData,
        DataType::AiReview,
        DataType::ValidationResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::ExtractedData => "extracted_data",
            DataType::AiReview => "ai_review",
            DataType::ValidationResult => "validation_result",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a data type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDataTypeError(String);

impl fmt::Display for ParseDataTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid data type: {}", self.0)
    }
}

impl std::error::Error for ParseDataTypeError {}

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extracted_data" => Ok(DataType::ExtractedData),
            "ai_review" => Ok(DataType::AiReview),
            "validation_result" => Ok(DataType::ValidationResult),
            _ => Err(ParseDataTypeError(s.to_string())),
        }
    }
}

// == Cache Key ==
/// Structured cache key resolving to a single string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    pub patient_id: String,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl CacheKey {
    /// Creates a key with the default version.
    pub fn new(patient_id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            patient_id: patient_id.into(),
            data_type,
            version: None,
        }
    }

    /// Sets an explicit version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Version this key resolves with.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    // == Resolve ==
    /// Returns `{patient_id}_{data_type}_{version}`.
    pub fn resolve(&self) -> String {
        format!("{}_{}_{}", self.patient_id, self.data_type, self.version())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}
