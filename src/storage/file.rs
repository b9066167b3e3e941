//! Directory-backed durable store
//!
//! Each record lives in its own file: `<base_path>/<hex(key)>.rec`. Keys are
//! hex-encoded so arbitrary patient identifiers map to safe file names.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::storage::{DurableStore, StorageError};

const RECORD_EXTENSION: &str = "rec";

/// File-per-key durable store
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    /// Suffix source for temp files, unique per write
    write_seq: AtomicU64,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;

        info!("Initialized file store at {:?}", base_path);

        Ok(Self {
            base_path,
            write_seq: AtomicU64::new(0),
        })
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(hex::encode(key.as_bytes()))
            .with_extension(RECORD_EXTENSION)
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != RECORD_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.record_path(key);
        debug!("Writing record to {:?}", path);

        // Write atomically using a temp file private to this write
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("{}.{}.tmp", std::process::id(), seq));
        fs::write(&temp_path, value.as_bytes()).await?;
        fs::rename(&temp_path, &path).await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.record_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut dir = fs::read_dir(&self.base_path).await?;

        while let Some(item) = dir.next_entry().await? {
            if let Some(key) = Self::key_from_path(&item.path()) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        Ok(keys)
    }
}
