//! In-memory object store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::store::{ObjectStore, StorageError};

/// [`ObjectStore`] holding objects in a process-local map.
///
/// Signed URLs use a `memory://` scheme so redirect flows can be asserted
/// in tests without a real backend.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, (Bytes, String)>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object exists under the given key.
    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires: Duration) -> Result<String, StorageError> {
        // Presigning is a local signature operation on S3 as well; it never
        // checks whether the object exists.
        Ok(format!("memory://{key}?expires={}", expires.as_secs()))
    }
}
