//! JSON bodies and query strings accepted by the API. Ids arrive as strings
//! so a malformed one can be reported by name.

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ArtistRequest {
    pub name: String,
    pub biography: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistUpdateRequest {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumRequest {
    pub title: String,
    pub artist_id: String,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlbumUpdateRequest {
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SongRequest {
    pub title: String,
    pub artist_id: String,
    pub album_id: Option<String>,
    pub duration_seconds: i32,
    pub file_url: String,
    pub genre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SongUpdateRequest {
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub album_id: Option<String>,
    pub duration_seconds: Option<i32>,
    pub file_url: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to the caller; only admins may name someone else.
    pub user_id: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistUpdateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSongToPlaylistRequest {
    pub song_id: String,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PresignedUrlRequest {
    pub file_name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_content_type() -> String {
    "image/jpeg".to_string()
}

pub fn default_folder() -> String {
    "uploads".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}
