// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end planner flows against the full router.
//!
//! The database is the offline mock throughout, so every persistence call
//! fails; the API must still serve the optimistic in-memory state.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dayplan_tracker::calendar::{canonical_date, Calendar};
use serde_json::Value;
use tower::ServiceExt;

mod common;

fn today_key() -> String {
    canonical_date(Calendar::ist().today())
}

async fn send(app: &Router, token: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn add_activity(app: &Router, token: &str, date: &str, name: &str) -> String {
    let (status, json) = send(
        app,
        token,
        "POST",
        &format!("/api/day/{date}/activities"),
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["activity"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_add_toggle_and_daily_stats() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);
    let date = today_key();

    let run_id = add_activity(&app, &token, &date, "Run").await;
    add_activity(&app, &token, &date, "Read").await;

    let (status, json) = send(
        &app,
        &token,
        "POST",
        &format!("/api/day/{date}/completions/{run_id}/toggle"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["completed"], true);
    assert_eq!(json["stats"]["total"], 2);
    assert_eq!(json["stats"]["completed"], 1);
    assert_eq!(json["stats"]["percentage"], 50);

    let (status, day) = send(&app, &token, "GET", &format!("/api/day/{date}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["plan"].as_array().unwrap().len(), 2);
    assert_eq!(day["completion"][&run_id], true);
    assert_eq!(day["can_edit_plan"], true);
    assert_eq!(day["can_edit_completion"], true);
}

#[tokio::test]
async fn test_toggle_twice_restores_prior_state() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);
    let date = today_key();

    let id = add_activity(&app, &token, &date, "Run").await;
    let uri = format!("/api/day/{date}/completions/{id}/toggle");

    let (_, first) = send(&app, &token, "POST", &uri, None).await;
    let (_, second) = send(&app, &token, "POST", &uri, None).await;

    assert_eq!(first["completed"], true);
    assert_eq!(second["completed"], false);
    assert_eq!(second["stats"]["completed"], 0);
}

#[tokio::test]
async fn test_delete_keeps_orphaned_completion_entry() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);
    let date = today_key();

    let run_id = add_activity(&app, &token, &date, "Run").await;
    add_activity(&app, &token, &date, "Read").await;
    send(
        &app,
        &token,
        "POST",
        &format!("/api/day/{date}/completions/{run_id}/toggle"),
        None,
    )
    .await;

    let (status, json) = send(
        &app,
        &token,
        "DELETE",
        &format!("/api/day/{date}/activities/{run_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], true);
    // The deleted entry no longer counts toward stats.
    assert_eq!(json["stats"]["total"], 1);
    assert_eq!(json["stats"]["completed"], 0);

    // The completion entry stays in the map, inert.
    let (_, day) = send(&app, &token, "GET", &format!("/api/day/{date}"), None).await;
    assert_eq!(day["completion"][&run_id], true);
}

#[tokio::test]
async fn test_delete_unknown_id_is_idempotent() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);
    let date = today_key();

    let (status, json) = send(
        &app,
        &token,
        "DELETE",
        &format!("/api/day/{date}/activities/999"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], false);
}

#[tokio::test]
async fn test_reorder_moves_entry_to_target_position() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);
    let date = today_key();

    let a = add_activity(&app, &token, &date, "A").await;
    let b = add_activity(&app, &token, &date, "B").await;
    let c = add_activity(&app, &token, &date, "C").await;

    let (status, json) = send(
        &app,
        &token,
        "POST",
        &format!("/api/day/{date}/reorder"),
        Some(serde_json::json!({ "moved_id": c, "target_id": a })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let order: Vec<&str> = json["plan"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec![c.as_str(), a.as_str(), b.as_str()]);
}

#[tokio::test]
async fn test_suggestions_filter_and_create_new_flag() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);
    let date = today_key();

    add_activity(&app, &token, &date, "Morning Run").await;
    add_activity(&app, &token, &date, "Read").await;

    let (status, json) = send(&app, &token, "GET", "/api/catalog/suggestions?q=run", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["suggestions"],
        serde_json::json!(["Morning Run"]),
    );
    assert_eq!(json["exact_match"], false);

    let (_, exact) = send(
        &app,
        &token,
        "GET",
        "/api/catalog/suggestions?q=morning%20run",
        None,
    )
    .await;
    assert_eq!(exact["exact_match"], true);
}

#[tokio::test]
async fn test_users_are_partitioned() {
    let (app, state) = common::create_test_app();
    let token_a = common::create_test_jwt("user-a", &state.config.jwt_signing_key);
    let token_b = common::create_test_jwt("user-b", &state.config.jwt_signing_key);
    let date = today_key();

    add_activity(&app, &token_a, &date, "Run").await;

    let (_, day) = send(&app, &token_b, "GET", &format!("/api/day/{date}"), None).await;
    assert_eq!(day["plan"].as_array().unwrap().len(), 0);
    assert_eq!(day["stats"]["total"], 0);
}

#[tokio::test]
async fn test_me_reports_user_and_today() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-42", &state.config.jwt_signing_key);

    let (status, json) = send(&app, &token, "GET", "/api/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], "user-42");
    assert_eq!(json["today"], today_key());
}
