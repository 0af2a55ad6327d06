//! The object-store abstraction.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

/// Errors surfaced by object-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key does not exist in the store.
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// Any other backend failure (network, auth, serialization).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Decoding or encoding an image failed.
    #[error("image processing failed: {0}")]
    Image(String),
}

/// Storage backend for media objects.
///
/// Implementations are pooled/cheaply cloneable clients; all methods take
/// `&self` and may be called concurrently.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes.
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Store an object under the given key, overwriting any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Produce a time-limited, pre-authenticated GET URL for the key.
    async fn signed_url(&self, key: &str, expires: Duration) -> Result<String, StorageError>;
}
