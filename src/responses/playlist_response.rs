use chrono::{DateTime, Utc};
use entities::playlist::{Playlist, PlaylistSong};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize, Clone, Debug)]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub is_public: bool,
    pub cover_image_url: Option<String>,
    pub cover_presigned_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistResponse {
    pub fn from_playlist(playlist: Playlist, cover_presigned_url: Option<String>) -> Self {
        PlaylistResponse {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            user_id: playlist.user_id,
            is_public: playlist.is_public,
            cover_image_url: playlist.cover_image_url,
            cover_presigned_url,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PlaylistSongResponse {
    pub playlist_id: Uuid,
    pub song_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistSong> for PlaylistSongResponse {
    fn from(entry: PlaylistSong) -> Self {
        PlaylistSongResponse {
            playlist_id: entry.playlist_id,
            song_id: entry.song_id,
            position: entry.position,
            added_at: entry.added_at,
        }
    }
}
