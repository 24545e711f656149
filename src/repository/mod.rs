//! Persistence seam. Each aggregate has its own trait; `PgStore` and
//! `MemoryStore` implement all of them with the same referential rules.

use async_trait::async_trait;
use chrono::Utc;
use entities::album::{Album, AlbumChanges, NewAlbum};
use entities::artist::{Artist, ArtistChanges, NewArtist};
use entities::playlist::{NewPlaylist, Playlist, PlaylistChanges, PlaylistSong};
use entities::song::{NewSong, Song, SongChanges};
use entities::user::{NewUser, User};
use thiserror::Error;
use uuid::Uuid;

use crate::pagination::Page;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const MISSING_ARTIST: &str = "Artist does not exist";
pub const MISSING_ALBUM: &str = "Album does not exist";
pub const MISSING_SONG: &str = "Song does not exist";
pub const MISSING_USER: &str = "User does not exist";
pub const MISSING_PLAYLIST: &str = "Playlist does not exist";
pub const ARTIST_IN_USE: &str = "Artist still has albums or songs";
pub const DUPLICATE_PLAYLIST_SONG: &str = "Song is already in the playlist";
pub const DUPLICATE_USER: &str = "Username or email already exists";
pub const PLAYLIST_FULL: &str = "Playlist has no position left to append to";

/// Highest position a caller may request for a playlist entry.
pub const MAX_PLAYLIST_POSITION: i32 = 1_000_000;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    NotFound(String),

    /// A foreign key points at a row that does not exist.
    #[error("{0}")]
    InvalidReference(String),

    /// Uniqueness violation, or a delete blocked by dependent rows.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or_default();
            match db.code().as_deref() {
                Some("23503") => {
                    return RepositoryError::InvalidReference(missing_reference(constraint).to_string())
                }
                Some("23505") => {
                    let message = if constraint.starts_with("users") {
                        DUPLICATE_USER
                    } else if constraint.contains("playlist_songs") {
                        DUPLICATE_PLAYLIST_SONG
                    } else {
                        "Duplicate record"
                    };
                    return RepositoryError::Conflict(message.to_string());
                }
                // numeric_value_out_of_range: only the appended playlist position can overflow
                Some("22003") => return RepositoryError::Conflict(PLAYLIST_FULL.to_string()),
                _ => {}
            }
        }
        RepositoryError::Database(err)
    }
}

fn missing_reference(constraint: &str) -> &'static str {
    match constraint {
        "fk-albums-artist_id" | "fk-songs-artist_id" => MISSING_ARTIST,
        "fk-songs-album_id" => MISSING_ALBUM,
        "fk-playlists-user_id" => MISSING_USER,
        "fk-playlist_songs-playlist_id" => MISSING_PLAYLIST,
        "fk-playlist_songs-song_id" => MISSING_SONG,
        _ => "Referenced record does not exist",
    }
}

#[async_trait]
pub trait ArtistRepository: Send + Sync {
    async fn create_artist(&self, artist: NewArtist) -> Result<Artist, RepositoryError>;
    async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, RepositoryError>;
    /// Ordered by name.
    async fn list_artists(&self, page: Page) -> Result<Vec<Artist>, RepositoryError>;
    async fn search_artists(&self, name: &str) -> Result<Vec<Artist>, RepositoryError>;
    async fn update_artist(
        &self,
        id: Uuid,
        changes: ArtistChanges,
    ) -> Result<Option<Artist>, RepositoryError>;
    /// `Ok(false)` when there was nothing to delete; `Conflict` while albums
    /// or songs still reference the artist.
    async fn delete_artist(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait AlbumRepository: Send + Sync {
    async fn create_album(&self, album: NewAlbum) -> Result<Album, RepositoryError>;
    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, RepositoryError>;
    async fn list_albums(&self, page: Page) -> Result<Vec<Album>, RepositoryError>;
    async fn albums_by_artist(&self, artist_id: Uuid) -> Result<Vec<Album>, RepositoryError>;
    async fn search_albums(&self, title: &str) -> Result<Vec<Album>, RepositoryError>;
    async fn update_album(
        &self,
        id: Uuid,
        changes: AlbumChanges,
    ) -> Result<Option<Album>, RepositoryError>;
    /// Songs of the album survive with their album cleared.
    async fn delete_album(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn create_song(&self, song: NewSong) -> Result<Song, RepositoryError>;
    async fn get_song(&self, id: Uuid) -> Result<Option<Song>, RepositoryError>;
    async fn list_songs(&self, page: Page) -> Result<Vec<Song>, RepositoryError>;
    async fn songs_by_artist(&self, artist_id: Uuid) -> Result<Vec<Song>, RepositoryError>;
    async fn songs_by_album(&self, album_id: Uuid) -> Result<Vec<Song>, RepositoryError>;
    async fn search_songs(&self, title: &str) -> Result<Vec<Song>, RepositoryError>;
    async fn update_song(
        &self,
        id: Uuid,
        changes: SongChanges,
    ) -> Result<Option<Song>, RepositoryError>;
    async fn delete_song(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// Atomically bumps the counter and returns the new value.
    async fn increment_play_count(&self, id: Uuid) -> Result<Option<i32>, RepositoryError>;
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn create_playlist(&self, playlist: NewPlaylist) -> Result<Playlist, RepositoryError>;
    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>, RepositoryError>;
    /// Public playlists plus the viewer's own.
    async fn visible_playlists(
        &self,
        viewer: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<Playlist>, RepositoryError>;
    async fn search_playlists(
        &self,
        viewer: Option<Uuid>,
        name: &str,
    ) -> Result<Vec<Playlist>, RepositoryError>;
    async fn playlists_by_user(
        &self,
        user_id: Uuid,
        include_private: bool,
    ) -> Result<Vec<Playlist>, RepositoryError>;
    async fn update_playlist(
        &self,
        id: Uuid,
        changes: PlaylistChanges,
    ) -> Result<Option<Playlist>, RepositoryError>;
    async fn delete_playlist(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// Appends after the current last position when `position` is `None`.
    async fn add_playlist_song(
        &self,
        playlist_id: Uuid,
        song_id: Uuid,
        position: Option<i32>,
    ) -> Result<PlaylistSong, RepositoryError>;
    async fn remove_playlist_song(
        &self,
        playlist_id: Uuid,
        song_id: Uuid,
    ) -> Result<bool, RepositoryError>;
    async fn playlist_songs(&self, playlist_id: Uuid) -> Result<Vec<Song>, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError>;
}

/// Everything a backing store has to provide.
pub trait Store:
    ArtistRepository + AlbumRepository + SongRepository + PlaylistRepository + UserRepository
{
}

impl<T> Store for T where
    T: ArtistRepository + AlbumRepository + SongRepository + PlaylistRepository + UserRepository
{
}

pub(crate) fn artist_row(new: NewArtist) -> Artist {
    let now = Utc::now();
    Artist {
        id: Uuid::new_v4(),
        name: new.name,
        biography: new.biography,
        country: new.country,
        image_url: new.image_url,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn album_row(new: NewAlbum) -> Album {
    let now = Utc::now();
    Album {
        id: Uuid::new_v4(),
        title: new.title,
        artist_id: new.artist_id,
        release_date: new.release_date,
        cover_image_url: new.cover_image_url,
        genre: new.genre,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn song_row(new: NewSong) -> Song {
    let now = Utc::now();
    Song {
        id: Uuid::new_v4(),
        title: new.title,
        artist_id: new.artist_id,
        album_id: new.album_id,
        duration_seconds: new.duration_seconds,
        file_url: new.file_url,
        genre: new.genre,
        play_count: 0,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn playlist_row(new: NewPlaylist) -> Playlist {
    let now = Utc::now();
    Playlist {
        id: Uuid::new_v4(),
        name: new.name,
        description: new.description,
        user_id: new.user_id,
        is_public: new.is_public,
        cover_image_url: new.cover_image_url,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn user_row(new: NewUser) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: new.username,
        email: new.email,
        password: new.password,
        role: new.role.to_string(),
        created_at: now,
        updated_at: now,
    }
}
