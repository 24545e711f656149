use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth_middleware::AdminUser;
use crate::error::ApiError;
use crate::extract::{parse_id, AppJson, AppPath, AppQuery, FormData, Payload};
use crate::pagination::Pagination;
use crate::requests::{SongRequest, SongUpdateRequest, TitleQuery};
use crate::responses::{MessageResponse, PlayCount, PlayCountResponse, SongResponse};
use crate::services::search_term;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route("/songs/search", get(search_songs))
        .route("/songs/upload", post(upload_song))
        .route(
            "/songs/:id",
            get(get_song).put(update_song).delete(delete_song),
        )
        .route("/songs/:id/play", post(play_song))
}

async fn list_songs(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let page = pagination.validate()?;
    Ok(Json(state.songs.list(page).await?))
}

async fn search_songs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TitleQuery>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let title = search_term(query.title, "title")?;
    Ok(Json(state.songs.search(&title).await?))
}

async fn get_song(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<SongResponse>, ApiError> {
    let id = parse_id(&id, "song")?;
    Ok(Json(state.songs.get(id).await?))
}

async fn create_song(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    payload: Payload<SongRequest>,
) -> Result<(StatusCode, Json<SongResponse>), ApiError> {
    let song = match payload {
        Payload::Json(request) => state.songs.create(request).await?,
        Payload::Form(form) => state.songs.create_from_form(form).await?,
    };
    Ok((StatusCode::CREATED, Json(song)))
}

async fn upload_song(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SongResponse>), ApiError> {
    let multipart = multipart.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let form = FormData::read(multipart).await?;
    let song = state.songs.create_from_form(form).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

async fn update_song(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<SongUpdateRequest>,
) -> Result<Json<SongResponse>, ApiError> {
    let id = parse_id(&id, "song")?;
    Ok(Json(state.songs.update(id, request).await?))
}

async fn delete_song(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "song")?;
    state.songs.delete(id).await?;
    Ok(Json(MessageResponse::new("Song deleted successfully")))
}

async fn play_song(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<PlayCountResponse>, ApiError> {
    let id = parse_id(&id, "song")?;
    let play_count = state.songs.play(id).await?;
    Ok(Json(PlayCountResponse {
        message: "Play count incremented".to_string(),
        data: PlayCount { play_count },
    }))
}
