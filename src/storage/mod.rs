//! Object storage for uploaded images and audio. The database only keeps
//! object keys; clients receive time-limited presigned URLs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3Store;

pub const PRESIGNED_GET_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const PRESIGNED_PUT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object {0} not found")]
    NotFound(String),

    #[error("object store error: {0}")]
    Backend(String),
}

/// A file received in a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn extension(&self) -> Option<&str> {
        self.file_name.as_deref().and_then(extension)
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StorageError>;

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;

    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    async fn object_exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Unsigned, permanent address of the object.
    fn object_url(&self, key: &str) -> String;
}

/// `folder/uuid-millis.ext`, with the extension taken from the client's file
/// name when it has a usable one.
pub fn object_key(folder: &str, file_name: Option<&str>, default_extension: &str) -> String {
    let extension = file_name
        .and_then(extension)
        .unwrap_or(default_extension)
        .to_ascii_lowercase();
    format!(
        "{}/{}-{}.{}",
        folder,
        Uuid::new_v4(),
        Utc::now().timestamp_millis(),
        extension
    )
}

fn extension(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Upload folders are a single path segment.
pub fn is_valid_folder(folder: &str) -> bool {
    !folder.is_empty()
        && folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Turns a stored value into something a client can fetch. Absolute URLs are
/// passed through; keys are presigned. Presigning failures are logged and
/// yield `None`.
pub async fn presigned_url(store: &dyn ObjectStore, stored: Option<&str>) -> Option<String> {
    let stored = stored.map(str::trim).filter(|value| !value.is_empty())?;
    if stored.starts_with("http") {
        return Some(stored.to_string());
    }
    match store.presign_get(stored, PRESIGNED_GET_TTL).await {
        Ok(url) => Some(url),
        Err(err) => {
            warn!("Couldn't presign {}: {}", stored, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_keeps_client_extension() {
        let key = object_key("artists", Some("Portrait.PNG"), "jpg");
        assert!(key.starts_with("artists/"));
        assert!(key.ends_with(".png"));
        let stem = key.trim_start_matches("artists/").trim_end_matches(".png");
        let (uuid, millis) = stem.rsplit_once('-').unwrap();
        assert!(Uuid::parse_str(uuid).is_ok());
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn key_falls_back_to_default_extension() {
        assert!(object_key("songs", Some("track"), "mp3").ends_with(".mp3"));
        assert!(object_key("songs", None, "mp3").ends_with(".mp3"));
        assert!(object_key("uploads", Some("weird.tar/gz"), "jpg").ends_with(".jpg"));
    }

    #[test]
    fn folders_are_single_segments() {
        assert!(is_valid_folder("album-covers_2"));
        assert!(!is_valid_folder(""));
        assert!(!is_valid_folder("../etc"));
        assert!(!is_valid_folder("a/b"));
    }

    #[tokio::test]
    async fn absolute_urls_pass_through() {
        let store = MemoryObjectStore::new("bucket");
        let url = presigned_url(&store, Some("https://cdn.example.com/a.jpg")).await;
        assert_eq!(url.as_deref(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(presigned_url(&store, None).await, None);
        assert_eq!(presigned_url(&store, Some(" ")).await, None);
    }

    #[tokio::test]
    async fn keys_are_presigned() {
        let store = MemoryObjectStore::new("bucket");
        let url = presigned_url(&store, Some("artists/a.jpg")).await.unwrap();
        assert!(url.contains("artists/a.jpg"));
        assert!(url.contains("expires=43200"));
    }
}
