mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::TestApp;

async fn create_playlist(app: &TestApp, token: &str, name: &str, public: bool) -> Value {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/playlists",
            Some(token),
            Some(json!({ "name": name, "is_public": public })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn creating_requires_a_token_and_defaults_owner() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::POST, "/api/v1/playlists", None, Some(json!({ "name": "Mine" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, user_id) = app.register("owner").await;
    let playlist = create_playlist(&app, &token, "Mine", true).await;
    assert_eq!(playlist["user_id"], user_id.as_str());
    assert_eq!(playlist["is_public"], true);
}

#[tokio::test]
async fn only_admins_create_for_others() {
    let app = TestApp::new().await;
    let (alice, _) = app.register("alice").await;
    let (_, bob_id) = app.register("bob").await;
    let body = json!({ "name": "For Bob", "user_id": bob_id });
    let (status, _) = app
        .send(Method::POST, "/api/v1/playlists", Some(&alice), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, created) = app
        .send(Method::POST, "/api/v1/playlists", Some(&app.admin_token), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"], bob_id.as_str());
}

#[tokio::test]
async fn private_playlists_are_invisible_to_others() {
    let app = TestApp::new().await;
    let (owner, _) = app.register("secretive").await;
    let (other, _) = app.register("curious").await;
    let playlist = create_playlist(&app, &owner, "Hidden", false).await;
    let uri = format!("/api/v1/playlists/{}", playlist["id"].as_str().unwrap());

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&uri, Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, Some(&app.admin_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, anonymous) = app.get("/api/v1/playlists", None).await;
    assert!(anonymous.as_array().unwrap().is_empty());
    let (_, own) = app.get("/api/v1/playlists", Some(&owner)).await;
    assert_eq!(own.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn user_playlists_hide_private_ones_from_strangers() {
    let app = TestApp::new().await;
    let (owner, owner_id) = app.register("collector").await;
    create_playlist(&app, &owner, "Public", true).await;
    create_playlist(&app, &owner, "Private", false).await;
    let uri = format!("/api/v1/users/{}/playlists", owner_id);
    let (_, anonymous) = app.get(&uri, None).await;
    assert_eq!(anonymous.as_array().unwrap().len(), 1);
    let (_, own) = app.get(&uri, Some(&owner)).await;
    assert_eq!(own.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn songs_append_in_order() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Chet Baker").await;
    let first = app.create_song(&artist, "My Funny Valentine").await;
    let second = app.create_song(&artist, "Almost Blue").await;
    let (token, _) = app.register("dj").await;
    let playlist = create_playlist(&app, &token, "Late Night", true).await;
    let songs_uri = format!("/api/v1/playlists/{}/songs", playlist["id"].as_str().unwrap());

    let (status, entry) = app
        .send(Method::POST, &songs_uri, Some(&token), Some(json!({ "song_id": first })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["position"], 1);
    let (_, entry) = app
        .send(Method::POST, &songs_uri, Some(&token), Some(json!({ "song_id": second })))
        .await;
    assert_eq!(entry["position"], 2);

    let (status, _) = app
        .send(Method::POST, &songs_uri, Some(&token), Some(json!({ "song_id": first })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            Method::POST,
            &songs_uri,
            Some(&token),
            Some(json!({ "song_id": "3f2b1c4d-0000-4000-8000-000000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, songs) = app.get(&songs_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = songs
        .as_array()
        .unwrap()
        .iter()
        .map(|song| song["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["My Funny Valentine", "Almost Blue"]);
}

#[tokio::test]
async fn only_owner_or_admin_modifies() {
    let app = TestApp::new().await;
    let (owner, _) = app.register("owner2").await;
    let (intruder, _) = app.register("intruder").await;
    let playlist = create_playlist(&app, &owner, "Mine", true).await;
    let uri = format!("/api/v1/playlists/{}", playlist["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&intruder), Some(json!({ "name": "Stolen" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .send(Method::PUT, &uri, Some(&owner), Some(json!({ "is_public": false })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Mine");
    assert_eq!(updated["is_public"], false);

    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn removing_a_song_not_in_the_playlist_is_not_found() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Sonny Rollins").await;
    let song = app.create_song(&artist, "St. Thomas").await;
    let (token, _) = app.register("remover").await;
    let playlist = create_playlist(&app, &token, "Calypso", true).await;
    let id = playlist["id"].as_str().unwrap();
    let uri = format!("/api/v1/playlists/{}/songs/{}", id, song);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.send(
        Method::POST,
        &format!("/api/v1/playlists/{}/songs", id),
        Some(&token),
        Some(json!({ "song_id": song })),
    )
    .await;
    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn explicit_positions_order_the_playlist() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Bill Evans").await;
    let waltz = app.create_song(&artist, "Waltz for Debby").await;
    let peace = app.create_song(&artist, "Peace Piece").await;
    let blue = app.create_song(&artist, "Blue in Green").await;
    let (token, _) = app.register("arranger").await;
    let playlist = create_playlist(&app, &token, "Village Vanguard", true).await;
    let songs_uri = format!("/api/v1/playlists/{}/songs", playlist["id"].as_str().unwrap());

    let (status, entry) = app
        .send(
            Method::POST,
            &songs_uri,
            Some(&token),
            Some(json!({ "song_id": waltz, "position": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["position"], 5);
    app.send(
        Method::POST,
        &songs_uri,
        Some(&token),
        Some(json!({ "song_id": peace, "position": 2 })),
    )
    .await;
    let (_, entry) = app
        .send(Method::POST, &songs_uri, Some(&token), Some(json!({ "song_id": blue })))
        .await;
    assert_eq!(entry["position"], 6);

    let (_, songs) = app.get(&songs_uri, None).await;
    let titles: Vec<&str> = songs
        .as_array()
        .unwrap()
        .iter()
        .map(|song| song["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Peace Piece", "Waltz for Debby", "Blue in Green"]);
}

#[tokio::test]
async fn positions_out_of_range_are_rejected() {
    let app = TestApp::new().await;
    let artist = app.create_artist("Ahmad Jamal").await;
    let first = app.create_song(&artist, "Poinciana").await;
    let second = app.create_song(&artist, "But Not for Me").await;
    let (token, _) = app.register("bounds").await;
    let playlist = create_playlist(&app, &token, "Pershing", true).await;
    let songs_uri = format!("/api/v1/playlists/{}/songs", playlist["id"].as_str().unwrap());

    for position in [0, -3, i32::MAX] {
        let (status, body) = app
            .send(
                Method::POST,
                &songs_uri,
                Some(&token),
                Some(json!({ "song_id": first, "position": position })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }

    let (status, entry) = app
        .send(
            Method::POST,
            &songs_uri,
            Some(&token),
            Some(json!({ "song_id": first, "position": 1_000_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["position"], 1_000_000);
    let (status, entry) = app
        .send(Method::POST, &songs_uri, Some(&token), Some(json!({ "song_id": second })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["position"], 1_000_001);
}
