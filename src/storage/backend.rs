//! Durable store trait

use async_trait::async_trait;

use crate::storage::StorageError;

/// Durable key-value store trait
///
/// Implementations hold serialized cache records as text. Values written by
/// `set` are visible to subsequent calls once the future resolves; nothing is
/// assumed transactional across keys.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write or overwrite a value
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a value; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List every key starting with `prefix`
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
