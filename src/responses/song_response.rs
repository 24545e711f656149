use chrono::{DateTime, Utc};
use entities::song::Song;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize, Clone, Debug)]
pub struct SongResponse {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub duration_seconds: i32,
    pub file_url: String,
    pub file_presigned_url: Option<String>,
    pub genre: Option<String>,
    pub play_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SongResponse {
    pub fn from_song(song: Song, file_presigned_url: Option<String>) -> Self {
        SongResponse {
            id: song.id,
            title: song.title,
            artist_id: song.artist_id,
            album_id: song.album_id,
            duration_seconds: song.duration_seconds,
            file_url: song.file_url,
            file_presigned_url,
            genre: song.genre,
            play_count: song.play_count,
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}
