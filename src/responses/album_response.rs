use chrono::{DateTime, NaiveDate, Utc};
use entities::album::Album;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize, Clone, Debug)]
pub struct AlbumResponse {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub cover_presigned_url: Option<String>,
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlbumResponse {
    pub fn from_album(album: Album, cover_presigned_url: Option<String>) -> Self {
        AlbumResponse {
            id: album.id,
            title: album.title,
            artist_id: album.artist_id,
            release_date: album.release_date,
            cover_image_url: album.cover_image_url,
            cover_presigned_url,
            genre: album.genre,
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}
