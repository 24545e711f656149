use axum::Json;

use crate::responses::{HealthResponse, IndexResponse};

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse::default())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
