use chrono::{DateTime, Utc};
use entities::artist::Artist;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize, Clone, Debug)]
pub struct ArtistResponse {
    pub id: Uuid,
    pub name: String,
    pub biography: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub image_presigned_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArtistResponse {
    pub fn from_artist(artist: Artist, image_presigned_url: Option<String>) -> Self {
        ArtistResponse {
            id: artist.id,
            name: artist.name,
            biography: artist.biography,
            country: artist.country,
            image_url: artist.image_url,
            image_presigned_url,
            created_at: artist.created_at,
            updated_at: artist.updated_at,
        }
    }
}
