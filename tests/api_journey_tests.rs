// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end journey and admin API tests over the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use chrono::{Duration, Months, Utc};
use journey_tracker::middleware::auth::ADMIN_ROLE;
use journey_tracker::models::User;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{create_test_app, create_test_jwt, journey, USER_ID};

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn journey_json(start_offset_hours: i64, distance: f64) -> Value {
    let now = Utc::now();
    json!({
        "starting_location": "Location A",
        "arrival_location": "Location B",
        "start_time": now.to_rfc3339(),
        "arrival_time": (now + Duration::hours(start_offset_hours)).to_rfc3339(),
        "transportation_type": 1,
        "route_distance": distance,
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// USER JOURNEY ROUTES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_journey_returns_created() {
    let (app, state, store) = create_test_app();
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "POST",
            "/api/journeys",
            &token,
            Some(journey_json(5, 10.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], USER_ID);
    assert_eq!(body["route_distance"], 10.0);
    assert!(body["id"].as_u64().is_some());
    assert_eq!(store.journey_count().await, 1);
}

#[tokio::test]
async fn test_create_journey_rejects_time_order() {
    let (app, state, store) = create_test_app();
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "POST",
            "/api/journeys",
            &token,
            Some(journey_json(-1, 10.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(store.journey_count().await, 0);
}

#[tokio::test]
async fn test_create_journey_rejects_zero_distance() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "POST",
            "/api/journeys",
            &token,
            Some(journey_json(1, 0.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_journeys_returns_only_callers() {
    let (app, state, store) = create_test_app();
    let now = Utc::now();
    store.insert_journey(journey(1, USER_ID, 1, now, 1.0)).await;
    store.insert_journey(journey(2, "other", 1, now, 1.0)).await;
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request("GET", "/api/journeys", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_get_journey_by_id() {
    let (app, state, store) = create_test_app();
    store
        .insert_journey(journey(7, USER_ID, 2, Utc::now(), 3.5))
        .await;
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request("GET", "/api/journeys/7", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["transportation_type"], 2);
}

#[tokio::test]
async fn test_get_missing_journey_returns_not_found() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request("GET", "/api/journeys/42", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_update_journey_uses_path_id() {
    let (app, state, store) = create_test_app();
    store
        .insert_journey(journey(3, USER_ID, 1, Utc::now(), 1.0))
        .await;
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let mut body = journey_json(2, 8.0);
    body["id"] = json!(999);

    let response = app
        .oneshot(request("PUT", "/api/journeys/3", &token, Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 3);
    assert_eq!(body["route_distance"], 8.0);
}

#[tokio::test]
async fn test_update_other_users_journey_returns_not_found() {
    let (app, state, store) = create_test_app();
    store
        .insert_journey(journey(3, "other", 1, Utc::now(), 1.0))
        .await;
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "PUT",
            "/api/journeys/3",
            &token,
            Some(journey_json(2, 8.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_journey() {
    let (app, state, store) = create_test_app();
    store
        .insert_journey(journey(4, USER_ID, 1, Utc::now(), 1.0))
        .await;
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request("DELETE", "/api/journeys/4", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["deleted"], true);
    assert_eq!(store.journey_count().await, 0);
}

#[tokio::test]
async fn test_delete_missing_journey_returns_not_found() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request("DELETE", "/api/journeys/4", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_goal_reflects_created_journeys() {
    let (app, state, store) = create_test_app();
    store.insert_user(User::new(USER_ID, "alice")).await;
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/journeys",
            &token,
            Some(journey_json(1, 25.0)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(request("GET", "/api/me/goal", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], USER_ID);
    assert_eq!(body["daily_goal_achieved"], true);
}

#[tokio::test]
async fn test_goal_for_unknown_user_returns_not_found() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt(USER_ID, &[], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request("GET", "/api/me/goal", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ═══════════════════════════════════════════════════════════════════════════
// ADMIN ROUTES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_admin_filter_by_type_and_dates() {
    let (app, state, store) = create_test_app();
    let now = Utc::now();
    for (id, mode, start) in [
        (1, 1, now),
        (2, 2, now - Duration::days(2)),
        (3, 1, now - Months::new(1)),
    ] {
        let mut j = journey(id, USER_ID, mode, start, 5.0);
        j.arrival_time = start;
        store.insert_journey(j).await;
    }
    let token = create_test_jwt("admin-1", &[ADMIN_ROLE], &state.config.jwt_signing_key);

    let uri = format!(
        "/api/admin/journeys?user_id={}&transportation_type=1&start_date={}&end_date={}",
        USER_ID,
        (now - Duration::days(7)).format("%Y-%m-%d"),
        now.format("%Y-%m-%d"),
    );
    let response = app
        .oneshot(request("GET", &uri, &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_admin_filter_rejects_malformed_date() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt("admin-1", &[ADMIN_ROLE], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "GET",
            "/api/admin/journeys?start_date=yesterday",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "bad_request");
}

#[tokio::test]
async fn test_admin_filter_empty_mode_means_any() {
    let (app, state, store) = create_test_app();
    let now = Utc::now();
    store.insert_journey(journey(1, USER_ID, 1, now, 1.0)).await;
    store.insert_journey(journey(2, USER_ID, 2, now, 1.0)).await;
    let token = create_test_jwt("admin-1", &[ADMIN_ROLE], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "GET",
            "/api/admin/journeys?transportation_type=&user_name=",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_filter_rejects_non_integer_mode() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt("admin-1", &[ADMIN_ROLE], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "GET",
            "/api/admin/journeys?transportation_type=car",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("transportation_type"));
}

#[tokio::test]
async fn test_admin_filter_rejects_inverted_range() {
    let (app, state, _) = create_test_app();
    let token = create_test_jwt("admin-1", &[ADMIN_ROLE], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "GET",
            "/api/admin/journeys?start_date=2024-02-01&end_date=2024-01-01",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");
}

#[tokio::test]
async fn test_admin_monthly_distance() {
    let (app, state, store) = create_test_app();
    store.insert_user(User::new(USER_ID, "alice")).await;
    let now = Utc::now();
    store
        .insert_journey(journey(1, USER_ID, 1, now - Months::new(1), 10.0))
        .await;
    store
        .insert_journey(journey(2, USER_ID, 1, now - Months::new(2), 15.0))
        .await;
    store
        .insert_journey(journey(3, USER_ID, 1, now - Months::new(2), 5.0))
        .await;
    let token = create_test_jwt("admin-1", &[ADMIN_ROLE], &state.config.jwt_signing_key);

    let response = app
        .oneshot(request(
            "GET",
            "/api/admin/stats/monthly-distance",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Most recent month first
    assert_eq!(rows[0]["total_route_distance"], 10.0);
    assert_eq!(rows[1]["total_route_distance"], 20.0);
    assert_eq!(rows[0]["user_name"], "alice");
}
