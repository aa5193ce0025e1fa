// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workouts survive a restart on the file blob store; bad data does not
//! stop the app from starting.

use std::sync::Arc;

use axum::http::StatusCode;
use tempfile::TempDir;
use tower::ServiceExt;
use workout_map::db::{keys, BlobStore, FileBlobStore, MemoryBlobStore};

mod common;
use common::{body_json, cycling_form, empty_request, json_request, running_form};

#[tokio::test]
async fn test_workouts_survive_restart() {
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = {
        let store = FileBlobStore::open(dir.path()).unwrap();
        let (app, state) = common::create_test_app_with(Arc::new(store)).await;

        let mut ids = Vec::new();
        for form in [running_form("5.2", "24", "178"), cycling_form("27", "95", "523")] {
            common::load_map_and_click(&app, 39.0, -12.0).await;
            let response = app
                .clone()
                .oneshot(json_request("POST", "/api/workouts", form))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            ids.push(body_json(response).await["row"]["id"].as_str().unwrap().to_string());
        }

        // Wait for the queued saves before "closing the tab".
        state.persistence.load().await;
        ids
    };

    let store = FileBlobStore::open(dir.path()).unwrap();
    let (app, state) = common::create_test_app_with(Arc::new(store)).await;

    {
        let tracker = state.tracker.lock().await;
        let restored: Vec<&str> = tracker.store().iter().map(|w| w.id()).collect();
        assert_eq!(restored, ids.iter().map(String::as_str).collect::<Vec<_>>());

        let run = tracker.store().find_by_id(&ids[0]).unwrap();
        assert!((run.pace().unwrap() - 4.6154).abs() < 1e-4);
        let ride = tracker.store().find_by_id(&ids[1]).unwrap();
        assert!((ride.speed().unwrap() - 17.0526).abs() < 1e-4);
    }

    // Rows render before the map is available; markers wait for it.
    let listing = body_json(
        app.oneshot(empty_request("GET", "/api/workouts"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listing["rows"].as_array().unwrap().len(), 2);
    assert!(listing["markers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_storage_starts_empty() {
    let blobs = MemoryBlobStore::new();
    blobs.set(keys::WORKOUTS, "[{\"type\":\"running\"").unwrap();

    let (app, state) = common::create_test_app_with(Arc::new(blobs.clone())).await;
    assert!(state.tracker.lock().await.store().is_empty());

    // The app keeps working and overwrites the bad blob on the next save.
    common::load_map_and_click(&app, 39.0, -12.0).await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/workouts",
            running_form("5.2", "24", "178"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(state.persistence.load().await.len(), 1);
}

#[tokio::test]
async fn test_legacy_local_storage_payload_loads() {
    let blobs = MemoryBlobStore::new();
    blobs
        .set(
            keys::WORKOUTS,
            r#"[{"date":"2024-03-05T10:00:00.000Z","id":"9632800000","clicks":0,
                "coords":[39,-12],"distance":5.2,"duration":24,"type":"running",
                "cadence":178,"pace":4.615384615384615,"description":"Running on March 5"},
               {"date":"2024-03-06T08:30:00.000Z","id":"9718200000","clicks":2,
                "coords":[39.5,-12.5],"distance":27,"duration":95,"type":"cycling",
                "elevationGain":523,"speed":17.05263157894737,"description":"Cycling on March 6"}]"#,
        )
        .unwrap();

    let (_, state) = common::create_test_app_with(Arc::new(blobs)).await;
    let tracker = state.tracker.lock().await;
    assert_eq!(tracker.store().len(), 2);
    let ride = tracker.store().find_by_id("9718200000").unwrap();
    assert_eq!(ride.description(), "Cycling on March 6");
    assert_eq!(ride.clicks(), 2);
}

#[tokio::test]
async fn test_duplicate_stored_ids_keep_every_workout() {
    let blobs = MemoryBlobStore::new();
    blobs
        .set(
            keys::WORKOUTS,
            r#"[{"date":"2024-03-05T10:00:00.000Z","id":"9632800000","clicks":0,
                "coords":[39,-12],"distance":5.2,"duration":24,"type":"running",
                "cadence":178,"description":"Running on March 5"},
               {"date":"2024-03-05T10:00:00.000Z","id":"9632800000","clicks":0,
                "coords":[39.1,-12.1],"distance":8,"duration":40,"type":"running",
                "cadence":170,"description":"Running on March 5"},
               {"date":"2024-03-06T08:30:00.000Z","id":"9718200000","clicks":0,
                "coords":[39.5,-12.5],"distance":27,"duration":95,"type":"cycling",
                "elevationGain":523,"description":"Cycling on March 6"}]"#,
        )
        .unwrap();

    let (app, state) = common::create_test_app_with(Arc::new(blobs)).await;
    assert_eq!(state.tracker.lock().await.store().len(), 3);

    common::load_map_and_click(&app, 39.0, -12.0).await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/workouts",
            running_form("5.2", "24", "178"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let persisted = state.persistence.load().await;
    assert_eq!(persisted.len(), 4);
    assert_eq!(persisted.find_by_id("9632800000").unwrap().distance(), 5.2);
    assert_eq!(persisted.find_by_id("9632800001").unwrap().distance(), 8.0);
    assert!(persisted.find_by_id("9718200000").is_some());
}
