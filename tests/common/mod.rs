#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use soundvault::config::{BootstrapAdmin, Config, JwtConfig};
use soundvault::{app, AppState};

pub const BOUNDARY: &str = "soundvault-test-boundary";

pub fn test_config() -> Config {
    Config {
        jwt: JwtConfig {
            secret: "integration-secret".to_string(),
            bcrypt_cost: 4,
            ..JwtConfig::default()
        },
        ..Config::default()
    }
}

pub struct TestApp {
    router: Router,
    pub admin_token: String,
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let state = AppState::in_memory(&config);
        state
            .auth
            .ensure_admin(&BootstrapAdmin {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password: "admin-password".to_string(),
            })
            .await
            .unwrap();
        let mut app = TestApp {
            router: app(state),
            admin_token: String::new(),
        };
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "admin", "password": "admin-password"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        app.admin_token = body["token"].as_str().unwrap().to_string();
        app
    }

    pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.raw(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn multipart(
        &self,
        uri: &str,
        token: Option<&str>,
        parts: &[Part<'_>],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(multipart_body(parts))).unwrap();
        self.raw(request).await
    }

    /// Registers a regular user and returns `(token, user id)`.
    pub async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "listener-password",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_artist(&self, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/artists",
                Some(&self.admin_token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_album(&self, artist_id: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/albums",
                Some(&self.admin_token),
                Some(json!({ "title": title, "artist_id": artist_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_song(&self, artist_id: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/songs",
                Some(&self.admin_token),
                Some(json!({
                    "title": title,
                    "artist_id": artist_id,
                    "duration_seconds": 200,
                    "file_url": "songs/existing.mp3",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
