use std::sync::Arc;

use entities::playlist::{NewPlaylist, Playlist, PlaylistChanges};
use log::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::extract::{parse_id, parse_optional_id};
use crate::pagination::Page;
use crate::repository::{PlaylistRepository, MAX_PLAYLIST_POSITION};
use crate::requests::{AddSongToPlaylistRequest, PlaylistRequest, PlaylistUpdateRequest};
use crate::responses::{PlaylistResponse, PlaylistSongResponse, SongResponse};
use crate::services::{optional, replacement, required, SongService, UploadService};

const NAME_MAX: usize = 255;
const URL_MAX: usize = 500;

/// Playlists are public or private to their owner. Admins see and manage
/// everything; a playlist the caller may not see is reported as missing.
#[derive(Clone)]
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistRepository>,
    songs: SongService,
    uploads: UploadService,
}

fn viewer_id(viewer: Option<&Claims>) -> Option<Uuid> {
    viewer.map(Claims::user_id)
}

fn can_see(playlist: &Playlist, viewer: Option<&Claims>) -> bool {
    playlist.is_public || viewer.map_or(false, |claims| claims.can_manage(playlist.user_id))
}

impl PlaylistService {
    pub fn new(
        playlists: Arc<dyn PlaylistRepository>,
        songs: SongService,
        uploads: UploadService,
    ) -> Self {
        PlaylistService {
            playlists,
            songs,
            uploads,
        }
    }

    async fn respond(&self, playlist: Playlist) -> PlaylistResponse {
        let presigned = self.uploads.presign(playlist.cover_image_url.as_deref()).await;
        PlaylistResponse::from_playlist(playlist, presigned)
    }

    async fn respond_all(&self, playlists: Vec<Playlist>) -> Vec<PlaylistResponse> {
        let mut out = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            out.push(self.respond(playlist).await);
        }
        out
    }

    async fn visible(&self, id: Uuid, viewer: Option<&Claims>) -> Result<Playlist, ApiError> {
        match self.playlists.get_playlist(id).await? {
            Some(playlist) if can_see(&playlist, viewer) => Ok(playlist),
            _ => Err(ApiError::not_found("Playlist", id)),
        }
    }

    /// Visible and owned by the caller (or the caller is an admin).
    async fn managed(&self, id: Uuid, caller: &Claims) -> Result<Playlist, ApiError> {
        let playlist = self.visible(id, Some(caller)).await?;
        if !caller.can_manage(playlist.user_id) {
            return Err(ApiError::Forbidden(
                "Only the owner can modify this playlist".to_string(),
            ));
        }
        Ok(playlist)
    }

    pub async fn list(
        &self,
        viewer: Option<&Claims>,
        page: Page,
    ) -> Result<Vec<PlaylistResponse>, ApiError> {
        let playlists = self.playlists.visible_playlists(viewer_id(viewer), page).await?;
        Ok(self.respond_all(playlists).await)
    }

    pub async fn search(
        &self,
        viewer: Option<&Claims>,
        name: &str,
    ) -> Result<Vec<PlaylistResponse>, ApiError> {
        let playlists = self.playlists.search_playlists(viewer_id(viewer), name).await?;
        Ok(self.respond_all(playlists).await)
    }

    pub async fn get(&self, viewer: Option<&Claims>, id: Uuid) -> Result<PlaylistResponse, ApiError> {
        let playlist = self.visible(id, viewer).await?;
        Ok(self.respond(playlist).await)
    }

    pub async fn by_user(
        &self,
        viewer: Option<&Claims>,
        user_id: Uuid,
    ) -> Result<Vec<PlaylistResponse>, ApiError> {
        let include_private = viewer.map_or(false, |claims| claims.can_manage(user_id));
        let playlists = self.playlists.playlists_by_user(user_id, include_private).await?;
        Ok(self.respond_all(playlists).await)
    }

    pub async fn create(
        &self,
        caller: &Claims,
        request: PlaylistRequest,
    ) -> Result<PlaylistResponse, ApiError> {
        let owner = parse_optional_id(request.user_id.as_deref(), "user")?.unwrap_or(caller.sub);
        if !caller.can_manage(owner) {
            return Err(ApiError::Forbidden(
                "Only admins can create playlists for other users".to_string(),
            ));
        }
        let new = NewPlaylist {
            name: required(&request.name, "name", NAME_MAX)?,
            description: optional(request.description, "description", usize::MAX)?,
            user_id: owner,
            is_public: request.is_public.unwrap_or(true),
            cover_image_url: optional(request.cover_image_url, "cover_image_url", URL_MAX)?,
        };
        let playlist = self.playlists.create_playlist(new).await?;
        info!("{} created playlist {} ({})", caller.username, playlist.name, playlist.id);
        Ok(self.respond(playlist).await)
    }

    pub async fn update(
        &self,
        caller: &Claims,
        id: Uuid,
        request: PlaylistUpdateRequest,
    ) -> Result<PlaylistResponse, ApiError> {
        self.managed(id, caller).await?;
        let changes = PlaylistChanges {
            name: replacement(request.name, "name", NAME_MAX)?,
            description: optional(request.description, "description", usize::MAX)?,
            is_public: request.is_public,
            cover_image_url: optional(request.cover_image_url, "cover_image_url", URL_MAX)?,
        };
        let playlist = self
            .playlists
            .update_playlist(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist", id))?;
        Ok(self.respond(playlist).await)
    }

    pub async fn delete(&self, caller: &Claims, id: Uuid) -> Result<(), ApiError> {
        self.managed(id, caller).await?;
        if !self.playlists.delete_playlist(id).await? {
            return Err(ApiError::not_found("Playlist", id));
        }
        info!("{} deleted playlist {}", caller.username, id);
        Ok(())
    }

    pub async fn songs(
        &self,
        viewer: Option<&Claims>,
        id: Uuid,
    ) -> Result<Vec<SongResponse>, ApiError> {
        self.visible(id, viewer).await?;
        let songs = self.playlists.playlist_songs(id).await?;
        Ok(self.songs.respond_all(songs).await)
    }

    pub async fn add_song(
        &self,
        caller: &Claims,
        id: Uuid,
        request: AddSongToPlaylistRequest,
    ) -> Result<PlaylistSongResponse, ApiError> {
        self.managed(id, caller).await?;
        let song_id = parse_id(&request.song_id, "song")?;
        if let Some(position) = request.position {
            if !(1..=MAX_PLAYLIST_POSITION).contains(&position) {
                return Err(ApiError::BadRequest(format!(
                    "position must be between 1 and {}",
                    MAX_PLAYLIST_POSITION
                )));
            }
        }
        let entry = self
            .playlists
            .add_playlist_song(id, song_id, request.position)
            .await?;
        Ok(entry.into())
    }

    pub async fn remove_song(&self, caller: &Claims, id: Uuid, song_id: Uuid) -> Result<(), ApiError> {
        self.managed(id, caller).await?;
        if !self.playlists.remove_playlist_song(id, song_id).await? {
            return Err(ApiError::NotFound(format!(
                "Song with ID {} is not in playlist {}",
                song_id, id
            )));
        }
        Ok(())
    }
}
