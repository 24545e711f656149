use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth_middleware::AdminUser;
use crate::error::ApiError;
use crate::extract::{parse_id, AppJson, AppPath, AppQuery, Payload};
use crate::pagination::Pagination;
use crate::requests::{AlbumRequest, AlbumUpdateRequest, TitleQuery};
use crate::responses::{AlbumResponse, MessageResponse, SongResponse};
use crate::services::search_term;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(list_albums).post(create_album))
        .route("/albums/search", get(search_albums))
        .route(
            "/albums/:id",
            get(get_album).put(update_album).delete(delete_album),
        )
        .route("/albums/:id/songs", get(album_songs))
}

async fn list_albums(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> Result<Json<Vec<AlbumResponse>>, ApiError> {
    let page = pagination.validate()?;
    Ok(Json(state.albums.list(page).await?))
}

async fn search_albums(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TitleQuery>,
) -> Result<Json<Vec<AlbumResponse>>, ApiError> {
    let title = search_term(query.title, "title")?;
    Ok(Json(state.albums.search(&title).await?))
}

async fn get_album(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<AlbumResponse>, ApiError> {
    let id = parse_id(&id, "album")?;
    Ok(Json(state.albums.get(id).await?))
}

async fn create_album(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    payload: Payload<AlbumRequest>,
) -> Result<(StatusCode, Json<AlbumResponse>), ApiError> {
    let album = match payload {
        Payload::Json(request) => state.albums.create(request).await?,
        Payload::Form(form) => state.albums.create_from_form(form).await?,
    };
    Ok((StatusCode::CREATED, Json(album)))
}

async fn update_album(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<AlbumUpdateRequest>,
) -> Result<Json<AlbumResponse>, ApiError> {
    let id = parse_id(&id, "album")?;
    Ok(Json(state.albums.update(id, request).await?))
}

async fn delete_album(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "album")?;
    state.albums.delete(id).await?;
    Ok(Json(MessageResponse::new("Album deleted successfully")))
}

async fn album_songs(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let id = parse_id(&id, "album")?;
    Ok(Json(state.songs.by_album(id).await?))
}
