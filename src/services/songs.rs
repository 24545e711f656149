use std::sync::Arc;

use entities::song::{NewSong, Song, SongChanges};
use log::info;
use uuid::Uuid;

use crate::audio::{self, AudioInfo};
use crate::error::ApiError;
use crate::extract::{parse_id, parse_optional_id, FormData};
use crate::pagination::Page;
use crate::repository::{AlbumRepository, ArtistRepository, SongRepository};
use crate::requests::{SongRequest, SongUpdateRequest};
use crate::responses::SongResponse;
use crate::services::{optional, replacement, required, UploadService};

const TITLE_MAX: usize = 255;
const GENRE_MAX: usize = 100;
const URL_MAX: usize = 500;

#[derive(Clone)]
pub struct SongService {
    songs: Arc<dyn SongRepository>,
    artists: Arc<dyn ArtistRepository>,
    albums: Arc<dyn AlbumRepository>,
    uploads: UploadService,
}

fn check_duration(duration: i32) -> Result<i32, ApiError> {
    if duration < 0 {
        return Err(ApiError::BadRequest(
            "duration_seconds must not be negative".to_string(),
        ));
    }
    Ok(duration)
}

impl SongService {
    pub fn new(
        songs: Arc<dyn SongRepository>,
        artists: Arc<dyn ArtistRepository>,
        albums: Arc<dyn AlbumRepository>,
        uploads: UploadService,
    ) -> Self {
        SongService {
            songs,
            artists,
            albums,
            uploads,
        }
    }

    pub(crate) async fn respond(&self, song: Song) -> SongResponse {
        let presigned = self.uploads.presign(Some(&song.file_url)).await;
        SongResponse::from_song(song, presigned)
    }

    pub(crate) async fn respond_all(&self, songs: Vec<Song>) -> Vec<SongResponse> {
        let mut out = Vec::with_capacity(songs.len());
        for song in songs {
            out.push(self.respond(song).await);
        }
        out
    }

    pub async fn list(&self, page: Page) -> Result<Vec<SongResponse>, ApiError> {
        let songs = self.songs.list_songs(page).await?;
        Ok(self.respond_all(songs).await)
    }

    pub async fn search(&self, title: &str) -> Result<Vec<SongResponse>, ApiError> {
        let songs = self.songs.search_songs(title).await?;
        Ok(self.respond_all(songs).await)
    }

    pub async fn get(&self, id: Uuid) -> Result<SongResponse, ApiError> {
        let song = self
            .songs
            .get_song(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Song", id))?;
        Ok(self.respond(song).await)
    }

    pub async fn by_artist(&self, artist_id: Uuid) -> Result<Vec<SongResponse>, ApiError> {
        if self.artists.get_artist(artist_id).await?.is_none() {
            return Err(ApiError::not_found("Artist", artist_id));
        }
        let songs = self.songs.songs_by_artist(artist_id).await?;
        Ok(self.respond_all(songs).await)
    }

    pub async fn by_album(&self, album_id: Uuid) -> Result<Vec<SongResponse>, ApiError> {
        if self.albums.get_album(album_id).await?.is_none() {
            return Err(ApiError::not_found("Album", album_id));
        }
        let songs = self.songs.songs_by_album(album_id).await?;
        Ok(self.respond_all(songs).await)
    }

    pub async fn create(&self, request: SongRequest) -> Result<SongResponse, ApiError> {
        let new = NewSong {
            title: required(&request.title, "title", TITLE_MAX)?,
            artist_id: parse_id(&request.artist_id, "artist")?,
            album_id: parse_optional_id(request.album_id.as_deref(), "album")?,
            duration_seconds: check_duration(request.duration_seconds)?,
            file_url: required(&request.file_url, "file_url", URL_MAX)?,
            genre: optional(request.genre, "genre", GENRE_MAX)?,
        };
        let song = self.songs.create_song(new).await?;
        info!("Created song {} ({})", song.title, song.id);
        Ok(self.respond(song).await)
    }

    /// Multipart variant carrying the audio itself in `audio`. Title, genre
    /// and duration fall back to what the file says about itself.
    pub async fn create_from_form(&self, mut form: FormData) -> Result<SongResponse, ApiError> {
        let file = form
            .take_file("audio")
            .or_else(|| form.take_file("file"))
            .ok_or_else(|| ApiError::BadRequest("Audio file 'audio' is required".to_string()))?;
        let artist_id = match form.text(&["artist_id", "artistId"]) {
            Some(raw) => parse_id(&raw, "artist")?,
            None => return Err(ApiError::BadRequest("artist_id is required".to_string())),
        };
        let album_id = parse_optional_id(form.text(&["album_id", "albumId"]).as_deref(), "album")?;
        let duration = form.int(&["duration_seconds", "durationSeconds", "duration"], "duration_seconds")?;

        let bytes = file.bytes.clone();
        let extension = file.extension().map(str::to_string);
        let info = tokio::task::spawn_blocking(move || audio::probe(&bytes, extension.as_deref()))
            .await
            .unwrap_or_else(|_| AudioInfo::default());

        let title = form.text(&["title"]).or(info.title);
        let title = required(&title.unwrap_or_default(), "title", TITLE_MAX)?;
        let genre = optional(form.text(&["genre"]).or(info.genre), "genre", GENRE_MAX)?;
        let duration_seconds = check_duration(duration.or(info.duration_seconds).unwrap_or(0))?;

        let key = self.uploads.store_audio(file).await?;
        let new = NewSong {
            title,
            artist_id,
            album_id,
            duration_seconds,
            file_url: key.clone(),
            genre,
        };
        match self.songs.create_song(new).await {
            Ok(song) => {
                info!("Created song {} ({}) from upload {}", song.title, song.id, key);
                Ok(self.respond(song).await)
            }
            Err(err) => {
                self.uploads.discard(&key).await;
                Err(err.into())
            }
        }
    }

    pub async fn update(&self, id: Uuid, request: SongUpdateRequest) -> Result<SongResponse, ApiError> {
        let changes = SongChanges {
            title: replacement(request.title, "title", TITLE_MAX)?,
            artist_id: parse_optional_id(request.artist_id.as_deref(), "artist")?,
            album_id: parse_optional_id(request.album_id.as_deref(), "album")?,
            duration_seconds: request.duration_seconds.map(check_duration).transpose()?,
            file_url: replacement(request.file_url, "file_url", URL_MAX)?,
            genre: optional(request.genre, "genre", GENRE_MAX)?,
        };
        let song = self
            .songs
            .update_song(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Song", id))?;
        Ok(self.respond(song).await)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.songs.delete_song(id).await? {
            return Err(ApiError::not_found("Song", id));
        }
        info!("Deleted song {}", id);
        Ok(())
    }

    /// Returns the new play count.
    pub async fn play(&self, id: Uuid) -> Result<i32, ApiError> {
        self.songs
            .increment_play_count(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Song", id))
    }
}
