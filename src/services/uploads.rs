use std::sync::Arc;

use log::{info, warn};

use crate::error::ApiError;
use crate::requests::PresignedUrlRequest;
use crate::responses::{FileUploadResponse, PresignedUrlResponse};
use crate::storage::{
    is_valid_folder, object_key, presigned_url, ObjectStore, UploadedFile, PRESIGNED_GET_TTL,
    PRESIGNED_PUT_TTL,
};

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn ObjectStore>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        UploadService { storage }
    }

    /// Client-facing URL for a stored key or absolute URL.
    pub async fn presign(&self, stored: Option<&str>) -> Option<String> {
        presigned_url(self.storage.as_ref(), stored).await
    }

    fn check_folder(folder: &str) -> Result<(), ApiError> {
        if is_valid_folder(folder) {
            Ok(())
        } else {
            Err(ApiError::BadRequest(
                "Folder must be a single segment of letters, digits, '_' or '-'".to_string(),
            ))
        }
    }

    fn check_image(file: &UploadedFile) -> Result<String, ApiError> {
        let content_type = file
            .content_type
            .clone()
            .filter(|ct| ct.starts_with("image/"))
            .ok_or_else(|| ApiError::BadRequest("Only image files are allowed".to_string()))?;
        if file.bytes.is_empty() {
            return Err(ApiError::BadRequest("File is empty".to_string()));
        }
        if file.size() > MAX_IMAGE_BYTES {
            return Err(ApiError::BadRequest("File size exceeds 10MB limit".to_string()));
        }
        Ok(content_type)
    }

    /// Validates and stores an image, returning its object key.
    pub async fn store_image(&self, folder: &str, file: UploadedFile) -> Result<String, ApiError> {
        Self::check_folder(folder)?;
        let content_type = Self::check_image(&file)?;
        let key = object_key(folder, file.file_name.as_deref(), "jpg");
        self.storage.put_object(&key, file.bytes, &content_type).await?;
        info!("Stored image {}", key);
        Ok(key)
    }

    /// Stores an audio file under `songs/`, returning its object key.
    pub async fn store_audio(&self, file: UploadedFile) -> Result<String, ApiError> {
        let content_type = match file.content_type.as_deref() {
            Some(ct) if ct.starts_with("audio/") => ct.to_string(),
            None | Some("application/octet-stream") => "audio/mpeg".to_string(),
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "Expected an audio file, got {}",
                    other
                )))
            }
        };
        if file.bytes.is_empty() {
            return Err(ApiError::BadRequest("Audio file is empty".to_string()));
        }
        let key = object_key("songs", file.file_name.as_deref(), "mp3");
        self.storage.put_object(&key, file.bytes, &content_type).await?;
        info!("Stored audio {}", key);
        Ok(key)
    }

    /// Best-effort removal of an object whose database row never made it.
    pub async fn discard(&self, key: &str) {
        if let Err(err) = self.storage.delete_object(key).await {
            warn!("Couldn't remove orphaned object {}: {}", key, err);
        }
    }

    pub async fn upload_image(
        &self,
        folder: &str,
        file: UploadedFile,
    ) -> Result<FileUploadResponse, ApiError> {
        let size_bytes = file.size();
        let content_type = file.content_type.clone().unwrap_or_default();
        let key = self.store_image(folder, file).await?;
        let presigned_url = self.storage.presign_get(&key, PRESIGNED_GET_TTL).await?;
        Ok(FileUploadResponse {
            file_url: self.storage.object_url(&key),
            file_name: key,
            presigned_url,
            size_bytes,
            content_type,
        })
    }

    pub async fn presigned_upload(
        &self,
        request: PresignedUrlRequest,
    ) -> Result<PresignedUrlResponse, ApiError> {
        Self::check_folder(&request.folder)?;
        if request.file_name.trim().is_empty() {
            return Err(ApiError::BadRequest("file_name is required".to_string()));
        }
        let key = object_key(&request.folder, Some(&request.file_name), "jpg");
        let upload_url = self
            .storage
            .presign_put(&key, &request.content_type, PRESIGNED_PUT_TTL)
            .await?;
        Ok(PresignedUrlResponse {
            upload_url,
            file_key: key,
            expires_in_seconds: PRESIGNED_PUT_TTL.as_secs(),
        })
    }

    pub async fn delete(&self, key: &str) -> Result<(), ApiError> {
        let key = key.trim().trim_start_matches('/');
        if key.is_empty() {
            return Err(ApiError::BadRequest("File key is required".to_string()));
        }
        if !self.storage.object_exists(key).await? {
            return Err(ApiError::NotFound(format!("File {} not found", key)));
        }
        self.storage.delete_object(key).await?;
        info!("Deleted object {}", key);
        Ok(())
    }
}
