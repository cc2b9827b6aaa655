//! Integration tests for the game catalog endpoints.

mod common;

use axum::http::StatusCode;
use common::{assert_error_body, body_json, delete, get, post_multipart, put_json};
use ludex_core::game::GameRecord;

fn sample_game(id: &str, folder: &str, name: &str) -> GameRecord {
    GameRecord {
        id: id.to_string(),
        folder: folder.to_string(),
        name: name.to_string(),
        steam_app_id: "100".to_string(),
        ..GameRecord::default()
    }
}

// ---------------------------------------------------------------------------
// Test: GET /api/games on a fresh catalog returns an empty array
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_catalog_lists_as_bare_empty_array() {
    let harness = common::build_test_app().await;
    let response = get(harness.app, "/api/games").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Test: GET /api/games/{id} for an unknown id returns the error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_game_returns_404_envelope() {
    let harness = common::build_test_app().await;
    let response = get(harness.app, "/api/games/game-404").await;

    assert_error_body(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: seeded games appear in list and by-id lookups, in insertion order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_games_are_listed_and_retrievable() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();
    harness
        .store
        .upsert(&sample_game("game-2", "second-game", "Second Game"))
        .await
        .unwrap();

    let response = get(harness.app.clone(), "/api/games").await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["id"], "game-1");
    assert_eq!(list[1]["id"], "game-2");

    let response = get(harness.app, "/api/games/game-2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let game = body_json(response).await;
    assert_eq!(game["name"], "Second Game");
    assert_eq!(game["folder"], "second-game");
}

// ---------------------------------------------------------------------------
// Test: PUT /api/games/{id} shallow-merges and keeps id/folder immutable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_merges_fields_and_keeps_identity() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    let patch = serde_json::json!({
        "name": "Renamed Game",
        "players": "2+",
        "id": "game-evil",
        "folder": "elsewhere",
    });
    let response = put_json(harness.app.clone(), "/api/games/game-1", &patch).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["game"]["name"], "Renamed Game");
    assert_eq!(json["game"]["players"], "2+");
    assert_eq!(json["game"]["id"], "game-1");
    assert_eq!(json["game"]["folder"], "first-game");

    // The merge is persisted, and untouched fields survive.
    let stored = harness.store.get("game-1").await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed Game");
    assert_eq!(stored.steam_app_id, "100");
    assert_eq!(stored.folder, "first-game");
}

#[tokio::test]
async fn update_rejects_unsafe_asset_paths() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    for patch in [
        serde_json::json!({ "screenshots": ["../../outside.jpg"] }),
        serde_json::json!({ "trailerUrl": "/etc/passwd" }),
        serde_json::json!({ "downloadFiles": [
            { "name": "x", "filename": "..\\escape.exe", "size": 1, "type": "application" }
        ] }),
    ] {
        let response = put_json(harness.app.clone(), "/api/games/game-1", &patch).await;
        assert_error_body(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }

    // The stored record is untouched.
    let stored = harness.store.get("game-1").await.unwrap().unwrap();
    assert!(stored.screenshots.is_empty());
    assert_eq!(stored.trailer_url, "");
    assert!(stored.download_files.is_empty());
}

#[tokio::test]
async fn update_of_unknown_game_returns_404() {
    let harness = common::build_test_app().await;
    let response = put_json(
        harness.app,
        "/api/games/game-404",
        &serde_json::json!({ "name": "x" }),
    )
    .await;

    assert_error_body(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: DELETE /api/games/{id} with and without removeFiles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_with_remove_files_cascades_to_the_folder() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();
    let folder = harness.store.game_dir("first-game");
    assert!(folder.join("info.json").exists());

    let response = delete(
        harness.app.clone(),
        "/api/games/game-1?removeFiles=true",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    assert!(!folder.exists());
    let response = get(harness.app, "/api/games/game-1").await;
    assert_error_body(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[tokio::test]
async fn delete_without_remove_files_keeps_the_folder() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    let response = delete(harness.app, "/api/games/game-1").await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(harness.store.game_dir("first-game").exists());
    assert!(harness.store.get("game-1").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_of_unknown_game_returns_404() {
    let harness = common::build_test_app().await;
    let response = delete(harness.app, "/api/games/game-404").await;

    assert_error_body(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: POST /api/games/{id}/files stores uploads and upserts entries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_stores_files_and_classifies_them() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    let response = post_multipart(
        harness.app,
        "/api/games/game-1/files",
        &[
            ("setup.exe", b"MZ-fake-installer".as_slice()),
            ("readme.txt", b"read me".as_slice()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["files"].as_array().unwrap().len(), 2);
    assert_eq!(json["files"][0]["type"], "application");
    assert_eq!(json["files"][1]["type"], "document");

    // Bytes landed in the game folder and the record gained entries.
    let dir = harness.store.game_dir("first-game");
    assert_eq!(
        std::fs::read(dir.join("setup.exe")).unwrap(),
        b"MZ-fake-installer"
    );
    let stored = harness.store.get("game-1").await.unwrap().unwrap();
    assert_eq!(stored.download_files.len(), 2);
}

#[tokio::test]
async fn reuploading_a_filename_replaces_its_entry() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    let first = post_multipart(
        harness.app.clone(),
        "/api/games/game-1/files",
        &[("patch.zip", b"v1".as_slice())],
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_multipart(
        harness.app,
        "/api/games/game-1/files",
        &[("patch.zip", b"v2-longer".as_slice())],
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);

    let stored = harness.store.get("game-1").await.unwrap().unwrap();
    assert_eq!(stored.download_files.len(), 1);
    assert_eq!(stored.download_files[0].filename, "patch.zip");
    assert_eq!(stored.download_files[0].size, 9);
}

#[tokio::test]
async fn upload_with_no_files_returns_400() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    let response = post_multipart(harness.app, "/api/games/game-1/files", &[]).await;
    assert_error_body(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
}

#[tokio::test]
async fn upload_with_traversal_filename_returns_400() {
    let harness = common::build_test_app().await;
    harness
        .store
        .upsert(&sample_game("game-1", "first-game", "First Game"))
        .await
        .unwrap();

    let response = post_multipart(
        harness.app,
        "/api/games/game-1/files",
        &[("../escape.exe", b"nope".as_slice())],
    )
    .await;
    assert_error_body(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // Nothing escaped the games directory.
    assert!(!harness.data_dir.path().join("games/escape.exe").exists());
    assert!(!harness.data_dir.path().join("escape.exe").exists());
}

#[tokio::test]
async fn upload_to_unknown_game_returns_404() {
    let harness = common::build_test_app().await;
    let response = post_multipart(
        harness.app,
        "/api/games/game-404/files",
        &[("setup.exe", b"x".as_slice())],
    )
    .await;

    assert_error_body(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
