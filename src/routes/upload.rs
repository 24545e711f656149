use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};

use crate::auth_middleware::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath, FormData};
use crate::requests::{default_folder, PresignedUrlRequest};
use crate::responses::MessageResponse;
use crate::state::AppState;

/// `POST /upload/image` and `POST /upload/presigned-url` share the catch-all
/// used by `DELETE /upload/{key}`, so the POST side dispatches on the name.
/// The catch-all never matches an empty key, hence the bare routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", delete(delete_without_key))
        .route("/upload/", delete(delete_without_key))
        .route("/upload/*key", post(upload).delete(delete_file))
}

async fn upload(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    AppPath(action): AppPath<String>,
    request: Request,
) -> Result<Response, ApiError> {
    match action.as_str() {
        "image" => upload_image(&state, request).await,
        "presigned-url" => presigned_url(&state, request).await,
        _ => Err(ApiError::NotFound("The requested resource was not found".to_string())),
    }
}

async fn upload_image(state: &AppState, request: Request) -> Result<Response, ApiError> {
    let multipart = Multipart::from_request(request, state)
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let mut form = FormData::read(multipart).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    let folder = form.text(&["folder"]).unwrap_or_else(default_folder);
    let uploaded = state.uploads.upload_image(&folder, file).await?;
    Ok((StatusCode::CREATED, Json(uploaded)).into_response())
}

async fn presigned_url(state: &AppState, request: Request) -> Result<Response, ApiError> {
    let AppJson(body) = AppJson::<PresignedUrlRequest>::from_request(request, state).await?;
    let response = state.uploads.presigned_upload(body).await?;
    Ok(Json(response).into_response())
}

async fn delete_file(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    AppPath(key): AppPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.uploads.delete(&key).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

async fn delete_without_key(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.uploads.delete("").await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
