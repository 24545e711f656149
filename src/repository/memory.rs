use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use entities::album::{Album, AlbumChanges, NewAlbum};
use entities::artist::{Artist, ArtistChanges, NewArtist};
use entities::playlist::{NewPlaylist, Playlist, PlaylistChanges, PlaylistSong};
use entities::song::{NewSong, Song, SongChanges};
use entities::user::{NewUser, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::pagination::Page;
use crate::repository::{
    album_row, artist_row, playlist_row, song_row, user_row, AlbumRepository, ArtistRepository,
    PlaylistRepository, RepositoryError, SongRepository, UserRepository, ARTIST_IN_USE,
    DUPLICATE_PLAYLIST_SONG, DUPLICATE_USER, MISSING_ALBUM, MISSING_ARTIST, MISSING_PLAYLIST,
    MISSING_SONG, MISSING_USER, PLAYLIST_FULL,
};

#[derive(Default)]
struct Tables {
    artists: HashMap<Uuid, Artist>,
    albums: HashMap<Uuid, Album>,
    songs: HashMap<Uuid, Song>,
    playlists: HashMap<Uuid, Playlist>,
    playlist_songs: Vec<PlaylistSong>,
    users: HashMap<Uuid, User>,
}

impl Tables {
    fn require_artist(&self, id: Uuid) -> Result<(), RepositoryError> {
        if self.artists.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidReference(MISSING_ARTIST.to_string()))
        }
    }

    fn require_album(&self, id: Option<Uuid>) -> Result<(), RepositoryError> {
        match id {
            Some(id) if !self.albums.contains_key(&id) => {
                Err(RepositoryError::InvalidReference(MISSING_ALBUM.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Process-local store with the same foreign key, uniqueness and cascade
/// rules as the Postgres schema. Selected when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn sorted<T, K, F>(items: impl Iterator<Item = T>, key: F) -> Vec<T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(key);
    items
}

#[async_trait]
impl ArtistRepository for MemoryStore {
    async fn create_artist(&self, artist: NewArtist) -> Result<Artist, RepositoryError> {
        let row = artist_row(artist);
        self.tables.write().await.artists.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, RepositoryError> {
        Ok(self.tables.read().await.artists.get(&id).cloned())
    }

    async fn list_artists(&self, page: Page) -> Result<Vec<Artist>, RepositoryError> {
        let tables = self.tables.read().await;
        let all = sorted(tables.artists.values().cloned(), |a| (a.name.clone(), a.id));
        Ok(page.slice(all))
    }

    async fn search_artists(&self, name: &str) -> Result<Vec<Artist>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables.artists.values().filter(|a| matches(&a.name, name)).cloned();
        Ok(sorted(found, |a| (a.name.clone(), a.id)))
    }

    async fn update_artist(
        &self,
        id: Uuid,
        changes: ArtistChanges,
    ) -> Result<Option<Artist>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(artist) = tables.artists.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            artist.name = name;
        }
        if let Some(biography) = changes.biography {
            artist.biography = Some(biography);
        }
        if let Some(country) = changes.country {
            artist.country = Some(country);
        }
        if let Some(image_url) = changes.image_url {
            artist.image_url = Some(image_url);
        }
        artist.updated_at = Utc::now();
        Ok(Some(artist.clone()))
    }

    async fn delete_artist(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let referenced = tables.albums.values().any(|a| a.artist_id == id)
            || tables.songs.values().any(|s| s.artist_id == id);
        if referenced {
            return Err(RepositoryError::Conflict(ARTIST_IN_USE.to_string()));
        }
        Ok(tables.artists.remove(&id).is_some())
    }
}

#[async_trait]
impl AlbumRepository for MemoryStore {
    async fn create_album(&self, album: NewAlbum) -> Result<Album, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_artist(album.artist_id)?;
        let row = album_row(album);
        tables.albums.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, RepositoryError> {
        Ok(self.tables.read().await.albums.get(&id).cloned())
    }

    async fn list_albums(&self, page: Page) -> Result<Vec<Album>, RepositoryError> {
        let tables = self.tables.read().await;
        let all = sorted(tables.albums.values().cloned(), |a| (a.title.clone(), a.id));
        Ok(page.slice(all))
    }

    async fn albums_by_artist(&self, artist_id: Uuid) -> Result<Vec<Album>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables
            .albums
            .values()
            .filter(|a| a.artist_id == artist_id)
            .cloned();
        // nulls last, like the SQL
        Ok(sorted(found, |a| {
            (a.release_date.is_none(), a.release_date, a.title.clone(), a.id)
        }))
    }

    async fn search_albums(&self, title: &str) -> Result<Vec<Album>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables.albums.values().filter(|a| matches(&a.title, title)).cloned();
        Ok(sorted(found, |a| (a.title.clone(), a.id)))
    }

    async fn update_album(
        &self,
        id: Uuid,
        changes: AlbumChanges,
    ) -> Result<Option<Album>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.albums.contains_key(&id) {
            return Ok(None);
        }
        if let Some(artist_id) = changes.artist_id {
            tables.require_artist(artist_id)?;
        }
        let Some(album) = tables.albums.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            album.title = title;
        }
        if let Some(artist_id) = changes.artist_id {
            album.artist_id = artist_id;
        }
        if let Some(release_date) = changes.release_date {
            album.release_date = Some(release_date);
        }
        if let Some(cover_image_url) = changes.cover_image_url {
            album.cover_image_url = Some(cover_image_url);
        }
        if let Some(genre) = changes.genre {
            album.genre = Some(genre);
        }
        album.updated_at = Utc::now();
        Ok(Some(album.clone()))
    }

    async fn delete_album(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.albums.remove(&id).is_none() {
            return Ok(false);
        }
        for song in tables.songs.values_mut() {
            if song.album_id == Some(id) {
                song.album_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl SongRepository for MemoryStore {
    async fn create_song(&self, song: NewSong) -> Result<Song, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_artist(song.artist_id)?;
        tables.require_album(song.album_id)?;
        let row = song_row(song);
        tables.songs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_song(&self, id: Uuid) -> Result<Option<Song>, RepositoryError> {
        Ok(self.tables.read().await.songs.get(&id).cloned())
    }

    async fn list_songs(&self, page: Page) -> Result<Vec<Song>, RepositoryError> {
        let tables = self.tables.read().await;
        let all = sorted(tables.songs.values().cloned(), |s| (s.title.clone(), s.id));
        Ok(page.slice(all))
    }

    async fn songs_by_artist(&self, artist_id: Uuid) -> Result<Vec<Song>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables
            .songs
            .values()
            .filter(|s| s.artist_id == artist_id)
            .cloned();
        Ok(sorted(found, |s| (s.title.clone(), s.id)))
    }

    async fn songs_by_album(&self, album_id: Uuid) -> Result<Vec<Song>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables
            .songs
            .values()
            .filter(|s| s.album_id == Some(album_id))
            .cloned();
        Ok(sorted(found, |s| (s.created_at, s.id)))
    }

    async fn search_songs(&self, title: &str) -> Result<Vec<Song>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables.songs.values().filter(|s| matches(&s.title, title)).cloned();
        Ok(sorted(found, |s| (s.title.clone(), s.id)))
    }

    async fn update_song(
        &self,
        id: Uuid,
        changes: SongChanges,
    ) -> Result<Option<Song>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.songs.contains_key(&id) {
            return Ok(None);
        }
        if let Some(artist_id) = changes.artist_id {
            tables.require_artist(artist_id)?;
        }
        tables.require_album(changes.album_id)?;
        let Some(song) = tables.songs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            song.title = title;
        }
        if let Some(artist_id) = changes.artist_id {
            song.artist_id = artist_id;
        }
        if let Some(album_id) = changes.album_id {
            song.album_id = Some(album_id);
        }
        if let Some(duration) = changes.duration_seconds {
            song.duration_seconds = duration;
        }
        if let Some(file_url) = changes.file_url {
            song.file_url = file_url;
        }
        if let Some(genre) = changes.genre {
            song.genre = Some(genre);
        }
        song.updated_at = Utc::now();
        Ok(Some(song.clone()))
    }

    async fn delete_song(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.songs.remove(&id).is_none() {
            return Ok(false);
        }
        tables.playlist_songs.retain(|entry| entry.song_id != id);
        Ok(true)
    }

    async fn increment_play_count(&self, id: Uuid) -> Result<Option<i32>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.songs.get_mut(&id).map(|song| {
            song.play_count = song.play_count.saturating_add(1);
            song.updated_at = Utc::now();
            song.play_count
        }))
    }
}

#[async_trait]
impl PlaylistRepository for MemoryStore {
    async fn create_playlist(&self, playlist: NewPlaylist) -> Result<Playlist, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&playlist.user_id) {
            return Err(RepositoryError::InvalidReference(MISSING_USER.to_string()));
        }
        let row = playlist_row(playlist);
        tables.playlists.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>, RepositoryError> {
        Ok(self.tables.read().await.playlists.get(&id).cloned())
    }

    async fn visible_playlists(
        &self,
        viewer: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        let tables = self.tables.read().await;
        let visible = tables
            .playlists
            .values()
            .filter(|p| p.is_public || Some(p.user_id) == viewer)
            .cloned();
        Ok(page.slice(sorted(visible, |p| (p.name.clone(), p.id))))
    }

    async fn search_playlists(
        &self,
        viewer: Option<Uuid>,
        name: &str,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables
            .playlists
            .values()
            .filter(|p| p.is_public || Some(p.user_id) == viewer)
            .filter(|p| matches(&p.name, name))
            .cloned();
        Ok(sorted(found, |p| (p.name.clone(), p.id)))
    }

    async fn playlists_by_user(
        &self,
        user_id: Uuid,
        include_private: bool,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables
            .playlists
            .values()
            .filter(|p| p.user_id == user_id && (p.is_public || include_private))
            .cloned();
        Ok(sorted(found, |p| (p.name.clone(), p.id)))
    }

    async fn update_playlist(
        &self,
        id: Uuid,
        changes: PlaylistChanges,
    ) -> Result<Option<Playlist>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(playlist) = tables.playlists.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            playlist.name = name;
        }
        if let Some(description) = changes.description {
            playlist.description = Some(description);
        }
        if let Some(is_public) = changes.is_public {
            playlist.is_public = is_public;
        }
        if let Some(cover_image_url) = changes.cover_image_url {
            playlist.cover_image_url = Some(cover_image_url);
        }
        playlist.updated_at = Utc::now();
        Ok(Some(playlist.clone()))
    }

    async fn delete_playlist(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.playlists.remove(&id).is_none() {
            return Ok(false);
        }
        tables.playlist_songs.retain(|entry| entry.playlist_id != id);
        Ok(true)
    }

    async fn add_playlist_song(
        &self,
        playlist_id: Uuid,
        song_id: Uuid,
        position: Option<i32>,
    ) -> Result<PlaylistSong, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.playlists.contains_key(&playlist_id) {
            return Err(RepositoryError::InvalidReference(MISSING_PLAYLIST.to_string()));
        }
        if !tables.songs.contains_key(&song_id) {
            return Err(RepositoryError::InvalidReference(MISSING_SONG.to_string()));
        }
        let entries = tables
            .playlist_songs
            .iter()
            .filter(|entry| entry.playlist_id == playlist_id);
        let mut last = 0;
        for entry in entries {
            if entry.song_id == song_id {
                return Err(RepositoryError::Conflict(DUPLICATE_PLAYLIST_SONG.to_string()));
            }
            last = last.max(entry.position);
        }
        let position = match position {
            Some(position) => position,
            None => last
                .checked_add(1)
                .ok_or_else(|| RepositoryError::Conflict(PLAYLIST_FULL.to_string()))?,
        };
        let entry = PlaylistSong {
            playlist_id,
            song_id,
            position,
            added_at: Utc::now(),
        };
        tables.playlist_songs.push(entry.clone());
        Ok(entry)
    }

    async fn remove_playlist_song(
        &self,
        playlist_id: Uuid,
        song_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.playlist_songs.len();
        tables
            .playlist_songs
            .retain(|entry| !(entry.playlist_id == playlist_id && entry.song_id == song_id));
        Ok(tables.playlist_songs.len() < before)
    }

    async fn playlist_songs(&self, playlist_id: Uuid) -> Result<Vec<Song>, RepositoryError> {
        let tables = self.tables.read().await;
        let entries = sorted(
            tables
                .playlist_songs
                .iter()
                .filter(|entry| entry.playlist_id == playlist_id),
            |entry| (entry.position, entry.added_at),
        );
        Ok(entries
            .into_iter()
            .filter_map(|entry| tables.songs.get(&entry.song_id).cloned())
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(RepositoryError::Conflict(DUPLICATE_USER.to_string()));
        }
        let row = user_row(user);
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }
}
