use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::{ObjectStore, StorageError};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps objects in a map. Used when no bucket is configured and in tests.
pub struct MemoryObjectStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        MemoryObjectStore {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    fn signed(&self, key: &str, method: &str, expires_in: Duration) -> String {
        format!(
            "memory://{}/{}?method={}&expires={}",
            self.bucket,
            key,
            method,
            expires_in.as_secs()
        )
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StorageError> {
        Ok(self.signed(key, "GET", expires_in))
    }

    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        Ok(self.signed(key, "PUT", expires_in))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        match self.objects.write().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }

    async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().await.contains_key(key))
    }

    fn object_url(&self, key: &str) -> String {
        format!("memory://{}/{}", self.bucket, key)
    }
}
