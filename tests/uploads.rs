mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{Part, TestApp};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[tokio::test]
async fn image_upload_returns_key_and_links() {
    let app = TestApp::new().await;
    let (token, _) = app.register("uploader").await;
    let (status, body) = app
        .multipart(
            "/api/v1/upload/image",
            Some(&token),
            &[
                Part::Text("folder", "covers"),
                Part::File {
                    name: "file",
                    file_name: "front.png",
                    content_type: "image/png",
                    bytes: PNG,
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let key = body["file_name"].as_str().unwrap();
    assert!(key.starts_with("covers/") && key.ends_with(".png"));
    assert_eq!(body["size_bytes"], PNG.len());
    assert_eq!(body["content_type"], "image/png");
    assert!(body["presigned_url"].as_str().unwrap().contains(key));
}

#[tokio::test]
async fn image_upload_needs_authentication() {
    let app = TestApp::new().await;
    let (status, _) = app
        .multipart(
            "/api/v1/upload/image",
            None,
            &[Part::File {
                name: "file",
                file_name: "front.png",
                content_type: "image/png",
                bytes: PNG,
            }],
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn image_upload_is_validated() {
    let app = TestApp::new().await;
    let token = app.admin_token.clone();
    let not_an_image = [Part::File {
        name: "file",
        file_name: "notes.txt",
        content_type: "text/plain",
        bytes: b"hello",
    }];
    let (status, _) = app.multipart("/api/v1/upload/image", Some(&token), &not_an_image).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_folder = [
        Part::Text("folder", "../escape"),
        Part::File {
            name: "file",
            file_name: "front.png",
            content_type: "image/png",
            bytes: PNG,
        },
    ];
    let (status, _) = app.multipart("/api/v1/upload/image", Some(&token), &bad_folder).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let big = vec![0u8; 10 * 1024 * 1024 + 1];
    let too_big = [Part::File {
        name: "file",
        file_name: "huge.jpg",
        content_type: "image/jpeg",
        bytes: &big,
    }];
    let (status, body) = app.multipart("/api/v1/upload/image", Some(&token), &too_big).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File size exceeds 10MB limit");

    let (status, _) = app.multipart("/api/v1/upload/image", Some(&token), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn presigned_put_url_is_issued() {
    let app = TestApp::new().await;
    let (token, _) = app.register("direct").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/upload/presigned-url",
            Some(&token),
            Some(json!({ "file_name": "avatar.webp", "folder": "avatars" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["expires_in_seconds"], 3600);
    let key = body["file_key"].as_str().unwrap();
    assert!(key.starts_with("avatars/") && key.ends_with(".webp"));
    assert!(body["upload_url"].as_str().unwrap().contains(key));
}

#[tokio::test]
async fn deleting_files_is_admin_only() {
    let app = TestApp::new().await;
    let (token, _) = app.register("plain").await;
    let (_, uploaded) = app
        .multipart(
            "/api/v1/upload/image",
            Some(&token),
            &[Part::File {
                name: "file",
                file_name: "a.png",
                content_type: "image/png",
                bytes: PNG,
            }],
        )
        .await;
    let uri = format!("/api/v1/upload/{}", uploaded["file_name"].as_str().unwrap());

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn artist_form_uploads_the_portrait() {
    let app = TestApp::new().await;
    let (status, artist) = app
        .multipart(
            "/api/v1/artists",
            Some(&app.admin_token),
            &[
                Part::Text("name", "Sarah Vaughan"),
                Part::Text("country", "US"),
                Part::File {
                    name: "image",
                    file_name: "sarah.jpg",
                    content_type: "image/jpeg",
                    bytes: b"\xff\xd8\xff",
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", artist);
    let key = artist["image_url"].as_str().unwrap();
    assert!(key.starts_with("artists/") && key.ends_with(".jpg"));
    assert!(artist["image_presigned_url"].as_str().unwrap().contains(key));
}

#[tokio::test]
async fn deleting_without_a_key_is_a_bad_request() {
    let app = TestApp::new().await;
    for uri in ["/api/v1/upload/", "/api/v1/upload"] {
        let (status, body) = app
            .send(Method::DELETE, uri, Some(&app.admin_token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], "File key is required");
    }
    let (token, _) = app.register("keyless").await;
    let (status, _) = app
        .send(Method::DELETE, "/api/v1/upload/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
