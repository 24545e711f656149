use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::auth_middleware::AuthUser;
use crate::error::ApiError;
use crate::extract::{parse_id, AppJson, AppPath, AppQuery};
use crate::pagination::Pagination;
use crate::requests::{AddSongToPlaylistRequest, NameQuery, PlaylistRequest, PlaylistUpdateRequest};
use crate::responses::{MessageResponse, PlaylistResponse, PlaylistSongResponse, SongResponse};
use crate::services::search_term;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route("/playlists/search", get(search_playlists))
        .route(
            "/playlists/:id",
            get(get_playlist).put(update_playlist).delete(delete_playlist),
        )
        .route(
            "/playlists/:id/songs",
            get(playlist_songs).post(add_playlist_song),
        )
        .route(
            "/playlists/:id/songs/:song_id",
            delete(remove_playlist_song),
        )
        .route("/users/:user_id/playlists", get(user_playlists))
}

async fn list_playlists(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let page = pagination.validate()?;
    let viewer = viewer.map(|AuthUser(claims)| claims);
    Ok(Json(state.playlists.list(viewer.as_ref(), page).await?))
}

async fn search_playlists(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    AppQuery(query): AppQuery<NameQuery>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let name = search_term(query.name, "name")?;
    let viewer = viewer.map(|AuthUser(claims)| claims);
    Ok(Json(state.playlists.search(viewer.as_ref(), &name).await?))
}

async fn get_playlist(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    AppPath(id): AppPath<String>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let id = parse_id(&id, "playlist")?;
    let viewer = viewer.map(|AuthUser(claims)| claims);
    Ok(Json(state.playlists.get(viewer.as_ref(), id).await?))
}

async fn create_playlist(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppJson(request): AppJson<PlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistResponse>), ApiError> {
    let playlist = state.playlists.create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

async fn update_playlist(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<PlaylistUpdateRequest>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let id = parse_id(&id, "playlist")?;
    Ok(Json(state.playlists.update(&caller, id, request).await?))
}

async fn delete_playlist(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "playlist")?;
    state.playlists.delete(&caller, id).await?;
    Ok(Json(MessageResponse::new("Playlist deleted successfully")))
}

async fn playlist_songs(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let id = parse_id(&id, "playlist")?;
    let viewer = viewer.map(|AuthUser(claims)| claims);
    Ok(Json(state.playlists.songs(viewer.as_ref(), id).await?))
}

async fn add_playlist_song(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<AddSongToPlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistSongResponse>), ApiError> {
    let id = parse_id(&id, "playlist")?;
    let entry = state.playlists.add_song(&caller, id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn remove_playlist_song(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath((id, song_id)): AppPath<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "playlist")?;
    let song_id = parse_id(&song_id, "song")?;
    state.playlists.remove_song(&caller, id, song_id).await?;
    Ok(Json(MessageResponse::new("Song removed from playlist")))
}

async fn user_playlists(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    AppPath(user_id): AppPath<String>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user")?;
    let viewer = viewer.map(|AuthUser(claims)| claims);
    Ok(Json(state.playlists.by_user(viewer.as_ref(), user_id).await?))
}
