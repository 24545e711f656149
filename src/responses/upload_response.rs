use serde::Serialize;

/// `file_name` is the object key; it is what clients store in `image_url`
/// and friends.
#[derive(Serialize, Debug)]
pub struct FileUploadResponse {
    pub file_name: String,
    pub file_url: String,
    pub presigned_url: String,
    pub size_bytes: u64,
    pub content_type: String,
}

#[derive(Serialize, Debug)]
pub struct PresignedUrlResponse {
    pub upload_url: String,
    pub file_key: String,
    pub expires_in_seconds: u64,
}
