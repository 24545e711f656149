use std::sync::Arc;

use chrono::NaiveDate;
use entities::album::{Album, AlbumChanges, NewAlbum};
use log::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{parse_id, parse_optional_id, FormData};
use crate::pagination::Page;
use crate::repository::{AlbumRepository, ArtistRepository};
use crate::requests::{AlbumRequest, AlbumUpdateRequest};
use crate::responses::AlbumResponse;
use crate::services::{optional, replacement, required, UploadService};

const TITLE_MAX: usize = 255;
const GENRE_MAX: usize = 100;
const URL_MAX: usize = 500;

#[derive(Clone)]
pub struct AlbumService {
    albums: Arc<dyn AlbumRepository>,
    artists: Arc<dyn ArtistRepository>,
    uploads: UploadService,
}

/// `release_date` wins over `year`, which maps to January 1st.
fn form_release_date(form: &FormData) -> Result<Option<NaiveDate>, ApiError> {
    if let Some(raw) = form.text(&["release_date", "releaseDate"]) {
        return raw
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest("release_date must be an ISO date (YYYY-MM-DD)".to_string()));
    }
    match form.int(&["year"], "year")? {
        None => Ok(None),
        Some(year) => NaiveDate::from_ymd_opt(year, 1, 1)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("{} is not a valid year", year))),
    }
}

impl AlbumService {
    pub fn new(
        albums: Arc<dyn AlbumRepository>,
        artists: Arc<dyn ArtistRepository>,
        uploads: UploadService,
    ) -> Self {
        AlbumService {
            albums,
            artists,
            uploads,
        }
    }

    async fn respond(&self, album: Album) -> AlbumResponse {
        let presigned = self.uploads.presign(album.cover_image_url.as_deref()).await;
        AlbumResponse::from_album(album, presigned)
    }

    async fn respond_all(&self, albums: Vec<Album>) -> Vec<AlbumResponse> {
        let mut out = Vec::with_capacity(albums.len());
        for album in albums {
            out.push(self.respond(album).await);
        }
        out
    }

    pub async fn require(&self, id: Uuid) -> Result<Album, ApiError> {
        self.albums
            .get_album(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Album", id))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<AlbumResponse>, ApiError> {
        let albums = self.albums.list_albums(page).await?;
        Ok(self.respond_all(albums).await)
    }

    pub async fn search(&self, title: &str) -> Result<Vec<AlbumResponse>, ApiError> {
        let albums = self.albums.search_albums(title).await?;
        Ok(self.respond_all(albums).await)
    }

    pub async fn get(&self, id: Uuid) -> Result<AlbumResponse, ApiError> {
        let album = self.require(id).await?;
        Ok(self.respond(album).await)
    }

    pub async fn by_artist(&self, artist_id: Uuid) -> Result<Vec<AlbumResponse>, ApiError> {
        if self.artists.get_artist(artist_id).await?.is_none() {
            return Err(ApiError::not_found("Artist", artist_id));
        }
        let albums = self.albums.albums_by_artist(artist_id).await?;
        Ok(self.respond_all(albums).await)
    }

    pub async fn create(&self, request: AlbumRequest) -> Result<AlbumResponse, ApiError> {
        let new = NewAlbum {
            title: required(&request.title, "title", TITLE_MAX)?,
            artist_id: parse_id(&request.artist_id, "artist")?,
            release_date: request.release_date,
            cover_image_url: optional(request.cover_image_url, "cover_image_url", URL_MAX)?,
            genre: optional(request.genre, "genre", GENRE_MAX)?,
        };
        let album = self.albums.create_album(new).await?;
        info!("Created album {} ({})", album.title, album.id);
        Ok(self.respond(album).await)
    }

    /// Multipart variant. Accepts the camelCase aliases older clients send
    /// and an optional `image` file stored under `albums/`.
    pub async fn create_from_form(&self, mut form: FormData) -> Result<AlbumResponse, ApiError> {
        let title = required(
            &form.text(&["title", "name"]).unwrap_or_default(),
            "title",
            TITLE_MAX,
        )?;
        let artist_id = match form.text(&["artist_id", "artistId"]) {
            Some(raw) => parse_id(&raw, "artist")?,
            None => return Err(ApiError::BadRequest("artist_id is required".to_string())),
        };
        let release_date = form_release_date(&form)?;
        let genre = optional(form.text(&["genre"]), "genre", GENRE_MAX)?;
        let linked = optional(form.text(&["cover_image_url"]), "cover_image_url", URL_MAX)?;
        let uploaded = match form.take_file("image") {
            Some(file) => Some(self.uploads.store_image("albums", file).await?),
            None => None,
        };
        let new = NewAlbum {
            title,
            artist_id,
            release_date,
            cover_image_url: uploaded.clone().or(linked),
            genre,
        };
        match self.albums.create_album(new).await {
            Ok(album) => {
                info!("Created album {} ({})", album.title, album.id);
                Ok(self.respond(album).await)
            }
            Err(err) => {
                if let Some(key) = uploaded {
                    self.uploads.discard(&key).await;
                }
                Err(err.into())
            }
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: AlbumUpdateRequest,
    ) -> Result<AlbumResponse, ApiError> {
        let changes = AlbumChanges {
            title: replacement(request.title, "title", TITLE_MAX)?,
            artist_id: parse_optional_id(request.artist_id.as_deref(), "artist")?,
            release_date: request.release_date,
            cover_image_url: optional(request.cover_image_url, "cover_image_url", URL_MAX)?,
            genre: optional(request.genre, "genre", GENRE_MAX)?,
        };
        let album = self
            .albums
            .update_album(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Album", id))?;
        Ok(self.respond(album).await)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.albums.delete_album(id).await? {
            return Err(ApiError::not_found("Album", id));
        }
        info!("Deleted album {}", id);
        Ok(())
    }
}
