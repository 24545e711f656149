mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{Part, TestApp};

#[tokio::test]
async fn health_endpoints_answer() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn unknown_routes_get_the_error_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn artist_round_trip() {
    let app = TestApp::new().await;
    let (status, created) = app
        .send(
            Method::POST,
            "/api/v1/artists",
            Some(&app.admin_token),
            Some(json!({
                "name": "Nina Simone",
                "country": "US",
                "image_url": "https://cdn.example.com/nina.jpg"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["image_presigned_url"], "https://cdn.example.com/nina.jpg");

    let (status, fetched) = app.get(&format!("/api/v1/artists/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Nina Simone");
    assert_eq!(fetched["country"], "US");

    let (status, listed) = app.get("/api/v1/artists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = TestApp::new().await;
    let (_, created) = app
        .send(
            Method::POST,
            "/api/v1/artists",
            Some(&app.admin_token),
            Some(json!({ "name": "Miles", "biography": "Trumpet", "country": "US" })),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/v1/artists/{}", id),
            Some(&app.admin_token),
            Some(json!({ "name": "Miles Davis" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Miles Davis");
    assert_eq!(updated["biography"], "Trumpet");
    assert_eq!(updated["country"], "US");
}

#[tokio::test]
async fn deleted_artist_is_gone() {
    let app = TestApp::new().await;
    let id = app.create_artist("Short Lived").await;
    let uri = format!("/api/v1/artists/{}", id);
    let (status, body) = app
        .send(Method::DELETE, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn referenced_artist_delete_conflicts() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Busy").await;
    app.create_album(&artist, "First").await;
    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/artists/{}", artist),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn pagination_bounds_are_enforced() {
    let app = TestApp::new().await;
    for uri in [
        "/api/v1/artists?limit=0",
        "/api/v1/artists?limit=101",
        "/api/v1/songs?offset=-1",
        "/api/v1/albums?limit=abc",
    ] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "Bad Request");
    }
    let (status, _) = app.get("/api/v1/artists?limit=100&offset=5", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn pages_slice_the_listing() {
    let app = TestApp::new().await;
    for name in ["A", "B", "C"] {
        app.create_artist(name).await;
    }
    let (_, page) = app.get("/api/v1/artists?limit=1&offset=1", None).await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["name"], "B");
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/artists/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid artist ID");
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/albums",
            Some(&app.admin_token),
            Some(json!({ "title": "X", "artist_id": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_artist_reference_is_a_bad_request() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/songs",
            Some(&app.admin_token),
            Some(json!({
                "title": "Ghost",
                "artist_id": "9a1c1c67-8f3a-4b8e-9a8e-6e7f6c0b1d2e",
                "duration_seconds": 10,
                "file_url": "songs/ghost.mp3"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_require_admin() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::POST, "/api/v1/artists", None, Some(json!({ "name": "X" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, _) = app.register("listener").await;
    let (status, body) = app
        .send(Method::POST, "/api/v1/artists", Some(&token), Some(json!({ "name": "X" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/artists",
            Some(&app.admin_token),
            Some(json!({ "biography": "no name" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn search_is_case_insensitive_and_requires_a_term() {
    let app = TestApp::new().await;
    app.create_artist("Aretha Franklin").await;
    app.create_artist("Etta James").await;
    let (status, found) = app.get("/api/v1/artists/search?name=aRETHA", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    let (status, _) = app.get("/api/v1/artists/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nested_listings_follow_the_parent() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Coltrane").await;
    let album = app.create_album(&artist, "Giant Steps").await;
    let (status, song) = app
        .send(
            Method::POST,
            "/api/v1/songs",
            Some(&app.admin_token),
            Some(json!({
                "title": "Naima",
                "artist_id": artist,
                "album_id": album,
                "duration_seconds": 261,
                "file_url": "songs/naima.mp3"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(song["file_presigned_url"].as_str().unwrap().contains("songs/naima.mp3"));

    let (_, albums) = app.get(&format!("/api/v1/artists/{}/albums", artist), None).await;
    assert_eq!(albums.as_array().unwrap().len(), 1);
    let (_, songs) = app.get(&format!("/api/v1/albums/{}/songs", album), None).await;
    assert_eq!(songs[0]["title"], "Naima");

    let missing = "/api/v1/artists/5b0f8c0e-1c57-4c8f-9a73-3c1e0a5d6f10/songs";
    let (status, _) = app.get(missing, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_album_keeps_its_songs() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Monk").await;
    let album = app.create_album(&artist, "Brilliant Corners").await;
    let (_, song) = app
        .send(
            Method::POST,
            "/api/v1/songs",
            Some(&app.admin_token),
            Some(json!({
                "title": "Pannonica",
                "artist_id": artist,
                "album_id": album,
                "duration_seconds": 500,
                "file_url": "songs/pannonica.mp3"
            })),
        )
        .await;
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/albums/{}", album),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, song) = app
        .get(&format!("/api/v1/songs/{}", song["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(song["album_id"].is_null());
}

#[tokio::test]
async fn play_count_increments_by_one() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Bird").await;
    let song = app.create_song(&artist, "Ornithology").await;
    let uri = format!("/api/v1/songs/{}/play", song);
    let (status, body) = app.send(Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["play_count"], 1);
    let (_, body) = app.send(Method::POST, &uri, None, None).await;
    assert_eq!(body["data"]["play_count"], 2);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/songs/0e5e2f1a-8c0c-4e38-9a8a-1b1b1b1b1b1b/play",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn album_form_accepts_year_and_cover() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Bill Evans").await;
    let (status, album) = app
        .multipart(
            "/api/v1/albums",
            Some(&app.admin_token),
            &[
                Part::Text("name", "Sunday at the Village Vanguard"),
                Part::Text("artistId", &artist),
                Part::Text("year", "1961"),
                Part::File {
                    name: "image",
                    file_name: "cover.png",
                    content_type: "image/png",
                    bytes: &[0x89, b'P', b'N', b'G'],
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", album);
    assert_eq!(album["release_date"], "1961-01-01");
    let cover = album["cover_image_url"].as_str().unwrap();
    assert!(cover.starts_with("albums/") && cover.ends_with(".png"));
    assert!(album["cover_presigned_url"].as_str().unwrap().contains(cover));
}

#[tokio::test]
async fn song_form_stores_the_audio() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Dizzy").await;
    let (status, song) = app
        .multipart(
            "/api/v1/songs/upload",
            Some(&app.admin_token),
            &[
                Part::Text("title", "Salt Peanuts"),
                Part::Text("artist_id", &artist),
                Part::Text("duration_seconds", "190"),
                Part::File {
                    name: "audio",
                    file_name: "salt-peanuts.mp3",
                    content_type: "audio/mpeg",
                    bytes: b"not really mp3 data",
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", song);
    assert_eq!(song["duration_seconds"], 190);
    assert!(song["file_url"].as_str().unwrap().starts_with("songs/"));
    assert_eq!(song["play_count"], 0);
}

#[tokio::test]
async fn song_form_without_title_is_rejected() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Anonymous").await;
    let (status, _) = app
        .multipart(
            "/api/v1/songs",
            Some(&app.admin_token),
            &[
                Part::Text("artist_id", &artist),
                Part::File {
                    name: "audio",
                    file_name: "untitled.mp3",
                    content_type: "audio/mpeg",
                    bytes: b"no tags here",
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
