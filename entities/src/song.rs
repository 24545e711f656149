use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub duration_seconds: i32,
    /// Object key of the audio file (or an absolute URL for legacy rows).
    pub file_url: String,
    pub genre: Option<String>,
    pub play_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewSong {
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub duration_seconds: i32,
    pub file_url: String,
    pub genre: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SongChanges {
    pub title: Option<String>,
    pub artist_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    pub duration_seconds: Option<i32>,
    pub file_url: Option<String>,
    pub genre: Option<String>,
}
