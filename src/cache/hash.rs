//! Content Hashing Module
//!
//! Fingerprints payloads so callers can detect changed inputs without
//! diffing previously cached values.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of a payload's canonical JSON form.
///
/// The payload is first lowered to a `serde_json::Value`, whose object maps
/// are ordered by key, so two payloads with equal content hash identically
/// regardless of field order.
pub fn content_hash<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_value(payload)?;
    let bytes = serde_json::to_vec(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
