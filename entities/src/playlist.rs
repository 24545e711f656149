use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub is_public: bool,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the ordered playlist/song join table.
#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize)]
pub struct PlaylistSong {
    pub playlist_id: Uuid,
    pub song_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewPlaylist {
    pub name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub is_public: bool,
    pub cover_image_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PlaylistChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image_url: Option<String>,
}
