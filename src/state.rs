use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::repository::{MemoryStore, Store};
use crate::services::{
    AlbumService, ArtistService, AuthService, PlaylistService, SongService, UploadService,
};
use crate::storage::{MemoryObjectStore, ObjectStore};

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub artists: ArtistService,
    pub albums: AlbumService,
    pub songs: SongService,
    pub playlists: PlaylistService,
    pub auth: AuthService,
    pub uploads: UploadService,
    pub tokens: Arc<TokenKeys>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, storage: Arc<dyn ObjectStore>, config: &Config) -> Self
    where
        S: Store + 'static,
    {
        let tokens = Arc::new(TokenKeys::new(&config.jwt));
        let uploads = UploadService::new(storage);
        let songs = SongService::new(store.clone(), store.clone(), store.clone(), uploads.clone());
        AppState {
            artists: ArtistService::new(store.clone(), uploads.clone()),
            albums: AlbumService::new(store.clone(), store.clone(), uploads.clone()),
            playlists: PlaylistService::new(store.clone(), songs.clone(), uploads.clone()),
            auth: AuthService::new(store, tokens.clone(), config.jwt.bcrypt_cost),
            songs,
            uploads,
            tokens,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Everything in process memory: no database, no bucket.
    pub fn in_memory(config: &Config) -> Self {
        AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryObjectStore::new("local")),
            config,
        )
    }
}
