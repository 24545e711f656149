use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth_middleware::AdminUser;
use crate::error::ApiError;
use crate::extract::{parse_id, AppJson, AppPath, AppQuery, Payload};
use crate::pagination::Pagination;
use crate::requests::{ArtistRequest, ArtistUpdateRequest, NameQuery};
use crate::responses::{AlbumResponse, ArtistResponse, MessageResponse, SongResponse};
use crate::services::search_term;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/search", get(search_artists))
        .route(
            "/artists/:id",
            get(get_artist).put(update_artist).delete(delete_artist),
        )
        .route("/artists/:id/albums", get(artist_albums))
        .route("/artists/:id/songs", get(artist_songs))
}

async fn list_artists(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> Result<Json<Vec<ArtistResponse>>, ApiError> {
    let page = pagination.validate()?;
    Ok(Json(state.artists.list(page).await?))
}

async fn search_artists(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NameQuery>,
) -> Result<Json<Vec<ArtistResponse>>, ApiError> {
    let name = search_term(query.name, "name")?;
    Ok(Json(state.artists.search(&name).await?))
}

async fn get_artist(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let id = parse_id(&id, "artist")?;
    Ok(Json(state.artists.get(id).await?))
}

async fn create_artist(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    payload: Payload<ArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), ApiError> {
    let artist = match payload {
        Payload::Json(request) => state.artists.create(request).await?,
        Payload::Form(form) => state.artists.create_from_form(form).await?,
    };
    Ok((StatusCode::CREATED, Json(artist)))
}

async fn update_artist(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<ArtistUpdateRequest>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let id = parse_id(&id, "artist")?;
    Ok(Json(state.artists.update(id, request).await?))
}

async fn delete_artist(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "artist")?;
    state.artists.delete(id).await?;
    Ok(Json(MessageResponse::new("Artist deleted successfully")))
}

async fn artist_albums(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Vec<AlbumResponse>>, ApiError> {
    let id = parse_id(&id, "artist")?;
    Ok(Json(state.albums.by_artist(id).await?))
}

async fn artist_songs(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let id = parse_id(&id, "artist")?;
    Ok(Json(state.songs.by_artist(id).await?))
}
