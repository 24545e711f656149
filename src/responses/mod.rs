pub mod album_response;
pub mod artist_response;
pub mod auth_response;
pub mod playlist_response;
#[allow(clippy::module_inception)]
pub mod responses;
pub mod song_response;
pub mod upload_response;

pub use album_response::AlbumResponse;
pub use artist_response::ArtistResponse;
pub use auth_response::{AuthResponse, UserResponse};
pub use playlist_response::{PlaylistResponse, PlaylistSongResponse};
pub use responses::{ErrorResponse, HealthResponse, IndexResponse, MessageResponse, PlayCount, PlayCountResponse};
pub use song_response::SongResponse;
pub use upload_response::{FileUploadResponse, PresignedUrlResponse};
