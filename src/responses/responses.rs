use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub struct PlayCount {
    pub play_count: i32,
}

/// `{message, data: {play_count}}` returned by the play endpoint.
#[derive(Serialize)]
pub struct PlayCountResponse {
    pub message: String,
    pub data: PlayCount,
}

#[derive(Serialize)]
pub struct IndexResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

impl Default for IndexResponse {
    fn default() -> Self {
        IndexResponse {
            status: "OK".to_string(),
            message: "Music Player API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix millis.
    pub timestamp: i64,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        HealthResponse {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
