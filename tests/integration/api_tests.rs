//! In-process API tests against the in-memory store

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parkpass_server::{
    api::create_router, models::Park, models::UserClaims, repository::Repository, AppConfig,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn park(code: &str, name: &str, position: Option<(f64, f64)>) -> Park {
    Park {
        id: 0,
        park_code: code.to_string(),
        name: name.to_string(),
        states: "US".to_string(),
        description: Some(format!("{} National Park", name)),
        latitude: position.map(|p| p.0),
        longitude: position.map(|p| p.1),
        created_at: None,
    }
}

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let repository = Repository::in_memory(vec![
        park("ACAD", "Acadia", Some((44.35, -68.21))),
        park("ZION", "Zion", Some((37.29, -113.05))),
    ]);
    let state = AppState::new(config.clone(), repository);
    (create_router(state), config)
}

fn token_for(config: &AppConfig, user_id: &str) -> String {
    UserClaims::new(user_id, 3600)
        .create_token(&config.auth.jwt_secret)
        .expect("Failed to create token")
}

async fn send(
    app: &Router,
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
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

async fn progress(app: &Router, token: &str) -> Value {
    let (status, body) = send(app, Method::GET, "/api/v1/progress", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn state_of(progress: &Value, code: &str) -> &'static str {
    for (group, state) in [
        ("visited", "visited"),
        ("bucket_list", "bucketList"),
        ("not_visited", "notVisited"),
    ] {
        let found = progress[group]
            .as_array()
            .expect("group should be an array")
            .iter()
            .any(|p| p["park_code"] == code);
        if found {
            return state;
        }
    }
    panic!("park {} missing from progress", code);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_parks_are_public() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/parks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let parks = body.as_array().unwrap();
    assert_eq!(parks.len(), 2);
    assert_eq!(parks[0]["park_code"], "ACAD");
    assert!(parks[0]["latitude"].is_number());
}

#[tokio::test]
async fn test_visits_require_authentication() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/visits", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some("not-a-token"),
        Some(json!({ "park_code": "ZION" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/visits?park_code=ZION", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_park_code_is_bad_request() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "is_bucket_list": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Park code is required");

    let (status, _) = send(&app, Method::DELETE, "/api/v1/visits", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_date_is_bad_request() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "ZION", "visited_date": "last summer" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    // No body and no content type
    let (status, body) = send(&app, Method::POST, "/api/v1/visits", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["message"], "Park code is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "ZION", "is_bucket_list": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits/batch",
        Some(&token),
        Some(json!({ "park_codes": "ZION" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    // Nothing was written
    let (_, visits) = send(&app, Method::GET, "/api/v1/visits", Some(&token), None).await;
    assert_eq!(visits, json!([]));
}

#[tokio::test]
async fn test_unknown_park_is_not_found() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "NOPE" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_visit_lifecycle() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    // Nothing recorded yet
    let body = progress(&app, &token).await;
    assert_eq!(state_of(&body, "ACAD"), "notVisited");
    assert_eq!(state_of(&body, "ZION"), "notVisited");
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["visited"], 0);

    // Bucket list
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "ZION", "is_bucket_list": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["message"], "Park added to bucket list");
    assert!(body["visit"]["visited_date"].is_null());

    let body = progress(&app, &token).await;
    assert_eq!(state_of(&body, "ZION"), "bucketList");
    assert_eq!(body["summary"]["visited"], 0);
    assert_eq!(body["summary"]["bucket_list"], 1);

    // Bucket list -> visited, same row
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "ZION", "is_bucket_list": false, "visited_date": "2024-05-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "transitioned");
    assert_eq!(body["visit"]["is_bucket_list"], false);
    assert!(body["visit"]["visited_date"]
        .as_str()
        .unwrap()
        .starts_with("2024-05-01"));

    let body = progress(&app, &token).await;
    assert_eq!(state_of(&body, "ZION"), "visited");
    assert_eq!(body["summary"]["visited"], 1);
    assert_eq!(body["summary"]["bucket_list"], 0);
    assert_eq!(body["summary"]["unvisited"], 1);

    let (_, visits) = send(&app, Method::GET, "/api/v1/visits", Some(&token), None).await;
    assert_eq!(visits.as_array().unwrap().len(), 1);

    // Same request again is a no-op
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "ZION", "is_bucket_list": false, "visited_date": "2024-05-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unchanged");
    let (_, visits) = send(&app, Method::GET, "/api/v1/visits", Some(&token), None).await;
    assert_eq!(visits.as_array().unwrap().len(), 1);

    // Unvisit
    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/v1/visits?park_code=ZION",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let body = progress(&app, &token).await;
    assert_eq!(state_of(&body, "ZION"), "notVisited");
    assert_eq!(body["summary"]["visited"], 0);

    // Deleting again is silent
    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/v1/visits?park_code=ZION",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_visits_are_scoped_to_caller() {
    let (app, config) = app();
    let alice = token_for(&config, "user_alice");
    let bob = token_for(&config, "user_bob");

    send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&alice),
        Some(json!({ "park_code": "ACAD" })),
    )
    .await;

    let (_, visits) = send(&app, Method::GET, "/api/v1/visits", Some(&bob), None).await;
    assert!(visits.as_array().unwrap().is_empty());

    let (_, visits) = send(&app, Method::GET, "/api/v1/visits", Some(&alice), None).await;
    assert_eq!(visits[0]["park_code"], "ACAD");
    assert!(visits[0]["visited_date"].is_string());
}

#[tokio::test]
async fn test_batch_marks_bucket_list_visited() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits/batch",
        Some(&token),
        Some(json!({ "park_codes": ["ACAD", "ZION"], "is_bucket_list": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["bucket_list"], 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/visits/batch",
        Some(&token),
        Some(json!({
            "park_codes": ["ACAD", "ZION", "NOPE"],
            "is_bucket_list": false,
            "visited_date": "2024-07-04"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], json!(["ACAD", "ZION"]));
    assert_eq!(body["failed"][0]["park_code"], "NOPE");
    assert_eq!(body["summary"]["visited"], 2);
    assert_eq!(body["summary"]["bucket_list"], 0);
    assert_eq!(body["summary"]["percent_complete"], 100);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/visits/batch",
        Some(&token),
        Some(json!({ "park_codes": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_map_markers_follow_status() {
    let (app, config) = app();
    let token = token_for(&config, "user_1");

    send(
        &app,
        Method::POST,
        "/api/v1/visits",
        Some(&token),
        Some(json!({ "park_code": "ZION", "is_bucket_list": true })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/v1/map", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewport"]["zoom"], 4);
    assert_eq!(body["legend"].as_array().unwrap().len(), 3);

    let markers = body["markers"].as_array().unwrap();
    let zion = markers.iter().find(|m| m["park_code"] == "ZION").unwrap();
    assert_eq!(zion["status"], "bucketList");
    assert_eq!(zion["color"], "#facc15");
    assert_eq!(zion["primary_action"]["kind"], "markVisited");
    assert_eq!(zion["primary_action"]["requires_date"], true);
    assert_eq!(zion["secondary_action"]["kind"], "removeFromBucketList");
    assert_eq!(zion["secondary_action"]["method"], "DELETE");
    assert_eq!(zion["secondary_action"]["path"], "/visits");
    assert_eq!(zion["secondary_action"]["query"]["park_code"], "ZION");

    let acad = markers.iter().find(|m| m["park_code"] == "ACAD").unwrap();
    assert_eq!(acad["status"], "notVisited");
    assert_eq!(acad["secondary_action"]["kind"], "addToBucketList");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "ParkPass API");
}
