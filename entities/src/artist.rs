use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize)]
pub struct Artist {
    pub id: Uuid,
    pub name: String,
    pub biography: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an artist.
#[derive(Clone, Debug, Default)]
pub struct NewArtist {
    pub name: String,
    pub biography: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default)]
pub struct ArtistChanges {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}
