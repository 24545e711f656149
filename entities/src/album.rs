use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewAlbum {
    pub title: String,
    pub artist_id: Uuid,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AlbumChanges {
    pub title: Option<String>,
    pub artist_id: Option<Uuid>,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
}
