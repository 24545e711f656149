use std::sync::Arc;

use entities::artist::{Artist, ArtistChanges, NewArtist};
use log::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::FormData;
use crate::pagination::Page;
use crate::repository::ArtistRepository;
use crate::requests::{ArtistRequest, ArtistUpdateRequest};
use crate::responses::ArtistResponse;
use crate::services::{optional, replacement, required, UploadService};

const NAME_MAX: usize = 255;
const COUNTRY_MAX: usize = 100;
const URL_MAX: usize = 500;

#[derive(Clone)]
pub struct ArtistService {
    artists: Arc<dyn ArtistRepository>,
    uploads: UploadService,
}

impl ArtistService {
    pub fn new(artists: Arc<dyn ArtistRepository>, uploads: UploadService) -> Self {
        ArtistService { artists, uploads }
    }

    async fn respond(&self, artist: Artist) -> ArtistResponse {
        let presigned = self.uploads.presign(artist.image_url.as_deref()).await;
        ArtistResponse::from_artist(artist, presigned)
    }

    async fn respond_all(&self, artists: Vec<Artist>) -> Vec<ArtistResponse> {
        let mut out = Vec::with_capacity(artists.len());
        for artist in artists {
            out.push(self.respond(artist).await);
        }
        out
    }

    /// Fails with 404 unless the artist exists.
    pub async fn require(&self, id: Uuid) -> Result<Artist, ApiError> {
        self.artists
            .get_artist(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Artist", id))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<ArtistResponse>, ApiError> {
        let artists = self.artists.list_artists(page).await?;
        Ok(self.respond_all(artists).await)
    }

    pub async fn search(&self, name: &str) -> Result<Vec<ArtistResponse>, ApiError> {
        let artists = self.artists.search_artists(name).await?;
        Ok(self.respond_all(artists).await)
    }

    pub async fn get(&self, id: Uuid) -> Result<ArtistResponse, ApiError> {
        let artist = self.require(id).await?;
        Ok(self.respond(artist).await)
    }

    pub async fn create(&self, request: ArtistRequest) -> Result<ArtistResponse, ApiError> {
        let new = NewArtist {
            name: required(&request.name, "name", NAME_MAX)?,
            biography: optional(request.biography, "biography", usize::MAX)?,
            country: optional(request.country, "country", COUNTRY_MAX)?,
            image_url: optional(request.image_url, "image_url", URL_MAX)?,
        };
        let artist = self.artists.create_artist(new).await?;
        info!("Created artist {} ({})", artist.name, artist.id);
        Ok(self.respond(artist).await)
    }

    /// Multipart variant: fields `name`, `biography`, `country` and an
    /// optional `image` file stored under `artists/`.
    pub async fn create_from_form(&self, mut form: FormData) -> Result<ArtistResponse, ApiError> {
        let name = required(&form.text(&["name"]).unwrap_or_default(), "name", NAME_MAX)?;
        let biography = optional(form.text(&["biography"]), "biography", usize::MAX)?;
        let country = optional(form.text(&["country"]), "country", COUNTRY_MAX)?;
        let linked = optional(form.text(&["image_url"]), "image_url", URL_MAX)?;
        let uploaded = match form.take_file("image") {
            Some(file) => Some(self.uploads.store_image("artists", file).await?),
            None => None,
        };
        let new = NewArtist {
            name,
            biography,
            country,
            image_url: uploaded.clone().or(linked),
        };
        match self.artists.create_artist(new).await {
            Ok(artist) => {
                info!("Created artist {} ({})", artist.name, artist.id);
                Ok(self.respond(artist).await)
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
        request: ArtistUpdateRequest,
    ) -> Result<ArtistResponse, ApiError> {
        let changes = ArtistChanges {
            name: replacement(request.name, "name", NAME_MAX)?,
            biography: optional(request.biography, "biography", usize::MAX)?,
            country: optional(request.country, "country", COUNTRY_MAX)?,
            image_url: optional(request.image_url, "image_url", URL_MAX)?,
        };
        let artist = self
            .artists
            .update_artist(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Artist", id))?;
        Ok(self.respond(artist).await)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.artists.delete_artist(id).await? {
            return Err(ApiError::not_found("Artist", id));
        }
        info!("Deleted artist {}", id);
        Ok(())
    }
}
