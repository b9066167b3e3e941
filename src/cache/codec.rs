//! Entry Codec Module
//!
//! Turns entries into the text records kept by the durable tier. Compressed
//! records are gzip'd JSON, base64-encoded and tagged with a `gz:` prefix;
//! decoding accepts both forms so records survive compression being toggled.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheEntry;

const COMPRESSED_PREFIX: &str = "gz:";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Serializes an entry for durable storage.
pub fn encode_entry<T: Serialize>(entry: &CacheEntry<T>, compress: bool) -> Result<String, CodecError> {
    let json = serde_json::to_string(entry)?;
    if !compress {
        return Ok(json);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;

    Ok(format!("{}{}", COMPRESSED_PREFIX, STANDARD.encode(compressed)))
}

/// Restores an entry written by [`encode_entry`].
pub fn decode_entry<T: DeserializeOwned>(record: &str) -> Result<CacheEntry<T>, CodecError> {
    match record.strip_prefix(COMPRESSED_PREFIX) {
        Some(encoded) => {
            let compressed = STANDARD.decode(encoded)?;
            let mut json = String::new();
            GzDecoder::new(compressed.as_slice()).read_to_string(&mut json)?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(serde_json::from_str(record)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, ConfidenceLevel, DataType, QualityMetadata};
    use serde_json::{json, Value};

    fn sample_entry() -> CacheEntry<Value> {
        CacheEntry::new(
            &CacheKey::new("42", DataType::AiReview),
            json!({"findings": ["a", "b"], "score": 0.8}),
            "deadbeef".to_string(),
            QualityMetadata::with_confidence(ConfidenceLevel::High),
            60_000,
            1_700_000_000_000,
        )
    }

    #[test]
    fn test_plain_record_is_json() {
        let record = encode_entry(&sample_entry(), false).unwrap();
        let value: Value = serde_json::from_str(&record).unwrap();
        assert_eq!(value["patientId"], "42");
        assert_eq!(value["dataType"], "ai_review");
    }

    #[test]
    fn test_compressed_round_trip() {
        let entry = sample_entry();
        let record = encode_entry(&entry, true).unwrap();
        assert!(record.starts_with(COMPRESSED_PREFIX));

        let decoded: CacheEntry<Value> = decode_entry(&record).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_decode_accepts_either_form() {
        let entry = sample_entry();
        let plain = encode_entry(&entry, false).unwrap();
        let packed = encode_entry(&entry, true).unwrap();

        let a: CacheEntry<Value> = decode_entry(&plain).unwrap();
        let b: CacheEntry<Value> = decode_entry(&packed).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_entry::<Value>("not json").is_err());
        assert!(decode_entry::<Value>("gz:%%%").is_err());
        assert!(decode_entry::<Value>("gz:aGVsbG8=").is_err());
    }
}
