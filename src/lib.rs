//! SoundVault: a REST backend for a music catalog with JWT authentication
//! and S3-backed file storage.

pub mod audio;
pub mod auth;
pub mod auth_middleware;
pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod repository;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

pub use routes::app;
pub use state::AppState;
