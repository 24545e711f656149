use std::time::Duration;

use async_trait::async_trait;
use entities::album::{Album, AlbumChanges, NewAlbum};
use entities::artist::{Artist, ArtistChanges, NewArtist};
use entities::playlist::{NewPlaylist, Playlist, PlaylistChanges, PlaylistSong};
use entities::song::{NewSong, Song, SongChanges};
use entities::user::{NewUser, User};
use log::info;
use migration::{Migrator, MigratorTrait};
use sea_orm::SqlxPostgresConnector;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::pagination::Page;
use crate::repository::{
    album_row, artist_row, playlist_row, song_row, user_row, AlbumRepository, ArtistRepository,
    PlaylistRepository, RepositoryError, SongRepository, UserRepository, ARTIST_IN_USE,
};

/// Postgres-backed store. The SQL lives in the `queries` crate.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(PgStore { pool })
    }

    /// Brings the schema up to date, reusing the pool's connections.
    pub async fn migrate(&self) -> Result<(), sea_orm::DbErr> {
        let connection = SqlxPostgresConnector::from_sqlx_postgres_pool(self.pool.clone());
        Migrator::up(&connection, None).await?;
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl ArtistRepository for PgStore {
    async fn create_artist(&self, artist: NewArtist) -> Result<Artist, RepositoryError> {
        Ok(queries::add_artist(&self.pool, &artist_row(artist)).await?)
    }

    async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, RepositoryError> {
        Ok(queries::get_artist_by_id(&self.pool, id).await?)
    }

    async fn list_artists(&self, page: Page) -> Result<Vec<Artist>, RepositoryError> {
        Ok(queries::get_artists_paginated(&self.pool, page.limit, page.offset).await?)
    }

    async fn search_artists(&self, name: &str) -> Result<Vec<Artist>, RepositoryError> {
        Ok(queries::search_artists_by_name(&self.pool, name).await?)
    }

    async fn update_artist(
        &self,
        id: Uuid,
        changes: ArtistChanges,
    ) -> Result<Option<Artist>, RepositoryError> {
        Ok(queries::update_artist(&self.pool, id, &changes).await?)
    }

    async fn delete_artist(&self, id: Uuid) -> Result<bool, RepositoryError> {
        match queries::delete_artist_by_id(&self.pool, id).await {
            Ok(deleted) => Ok(deleted > 0),
            Err(err) => match RepositoryError::from(err) {
                RepositoryError::InvalidReference(_) => {
                    Err(RepositoryError::Conflict(ARTIST_IN_USE.to_string()))
                }
                other => Err(other),
            },
        }
    }
}

#[async_trait]
impl AlbumRepository for PgStore {
    async fn create_album(&self, album: NewAlbum) -> Result<Album, RepositoryError> {
        Ok(queries::add_album(&self.pool, &album_row(album)).await?)
    }

    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, RepositoryError> {
        Ok(queries::get_album_by_id(&self.pool, id).await?)
    }

    async fn list_albums(&self, page: Page) -> Result<Vec<Album>, RepositoryError> {
        Ok(queries::get_albums_paginated(&self.pool, page.limit, page.offset).await?)
    }

    async fn albums_by_artist(&self, artist_id: Uuid) -> Result<Vec<Album>, RepositoryError> {
        Ok(queries::get_albums_by_artist_id(&self.pool, artist_id).await?)
    }

    async fn search_albums(&self, title: &str) -> Result<Vec<Album>, RepositoryError> {
        Ok(queries::search_albums_by_title(&self.pool, title).await?)
    }

    async fn update_album(
        &self,
        id: Uuid,
        changes: AlbumChanges,
    ) -> Result<Option<Album>, RepositoryError> {
        Ok(queries::update_album(&self.pool, id, &changes).await?)
    }

    async fn delete_album(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(queries::delete_album_by_id(&self.pool, id).await? > 0)
    }
}

#[async_trait]
impl SongRepository for PgStore {
    async fn create_song(&self, song: NewSong) -> Result<Song, RepositoryError> {
        Ok(queries::add_song(&self.pool, &song_row(song)).await?)
    }

    async fn get_song(&self, id: Uuid) -> Result<Option<Song>, RepositoryError> {
        Ok(queries::get_song_by_id(&self.pool, id).await?)
    }

    async fn list_songs(&self, page: Page) -> Result<Vec<Song>, RepositoryError> {
        Ok(queries::get_songs_paginated(&self.pool, page.limit, page.offset).await?)
    }

    async fn songs_by_artist(&self, artist_id: Uuid) -> Result<Vec<Song>, RepositoryError> {
        Ok(queries::get_songs_by_artist_id(&self.pool, artist_id).await?)
    }

    async fn songs_by_album(&self, album_id: Uuid) -> Result<Vec<Song>, RepositoryError> {
        Ok(queries::get_songs_by_album_id(&self.pool, album_id).await?)
    }

    async fn search_songs(&self, title: &str) -> Result<Vec<Song>, RepositoryError> {
        Ok(queries::search_songs_by_title(&self.pool, title).await?)
    }

    async fn update_song(
        &self,
        id: Uuid,
        changes: SongChanges,
    ) -> Result<Option<Song>, RepositoryError> {
        Ok(queries::update_song(&self.pool, id, &changes).await?)
    }

    async fn delete_song(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(queries::delete_song_by_id(&self.pool, id).await? > 0)
    }

    async fn increment_play_count(&self, id: Uuid) -> Result<Option<i32>, RepositoryError> {
        Ok(queries::increment_play_count(&self.pool, id).await?)
    }
}

#[async_trait]
impl PlaylistRepository for PgStore {
    async fn create_playlist(&self, playlist: NewPlaylist) -> Result<Playlist, RepositoryError> {
        Ok(queries::add_playlist(&self.pool, &playlist_row(playlist)).await?)
    }

    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>, RepositoryError> {
        Ok(queries::get_playlist_by_id(&self.pool, id).await?)
    }

    async fn visible_playlists(
        &self,
        viewer: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        Ok(queries::get_visible_playlists(&self.pool, viewer, page.limit, page.offset).await?)
    }

    async fn search_playlists(
        &self,
        viewer: Option<Uuid>,
        name: &str,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        Ok(queries::search_visible_playlists(&self.pool, viewer, name).await?)
    }

    async fn playlists_by_user(
        &self,
        user_id: Uuid,
        include_private: bool,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        Ok(queries::get_playlists_by_user_id(&self.pool, user_id, include_private).await?)
    }

    async fn update_playlist(
        &self,
        id: Uuid,
        changes: PlaylistChanges,
    ) -> Result<Option<Playlist>, RepositoryError> {
        Ok(queries::update_playlist(&self.pool, id, &changes).await?)
    }

    async fn delete_playlist(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(queries::delete_playlist_by_id(&self.pool, id).await? > 0)
    }

    async fn add_playlist_song(
        &self,
        playlist_id: Uuid,
        song_id: Uuid,
        position: Option<i32>,
    ) -> Result<PlaylistSong, RepositoryError> {
        Ok(queries::add_playlist_song(&self.pool, playlist_id, song_id, position).await?)
    }

    async fn remove_playlist_song(
        &self,
        playlist_id: Uuid,
        song_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        Ok(queries::remove_playlist_song(&self.pool, playlist_id, song_id).await? > 0)
    }

    async fn playlist_songs(&self, playlist_id: Uuid) -> Result<Vec<Song>, RepositoryError> {
        Ok(queries::get_playlist_songs(&self.pool, playlist_id).await?)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        Ok(queries::add_user(&self.pool, &user_row(user)).await?)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(queries::get_user_by_id(&self.pool, id).await?)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(queries::get_user_by_username(&self.pool, username).await?)
    }

    async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(queries::get_user_by_username_or_email(&self.pool, username, email).await?)
    }
}
