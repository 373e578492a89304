//! Integration tests for the overlap endpoint, driven through the full router.

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use disrepair_server::{build_router, AppState, ServerConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app_with(config: ServerConfig) -> Router {
    build_router(AppState::new(config))
}

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn keyed_config() -> ServerConfig {
    ServerConfig {
        api_keys: HashMap::from([("secret-1".to_string(), "acme".to_string())]),
        ..ServerConfig::default()
    }
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/overlap")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn partial_overlap_body() -> Value {
    json!({
        "periods": [
            {"roomName": "A", "startDate": "01/01/2025", "endDate": "10/01/2025"},
            {"roomName": "B", "startDate": "05/01/2025", "endDate": "15/01/2025"}
        ],
        "totalRooms": 2
    })
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn calculate_returns_rows_sorted_by_room_count() {
    let response = send(app(), post_json(&partial_overlap_body())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-ratelimit-limit"], "60");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "59");

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!([
            {"roomCount": 1, "weeksInDisrepair": 1.3, "percentageOfProperty": 50.0},
            {"roomCount": 2, "weeksInDisrepair": 0.9, "percentageOfProperty": 100.0}
        ])
    );
}

#[tokio::test]
async fn room_list_sets_the_denominator() {
    let body = json!({
        "periods": [
            {"roomName": "A", "startDate": "01/01/2025", "endDate": "07/01/2025"}
        ],
        "totalRooms": 10,
        "rooms": ["A", "B", "C", "D"]
    });

    let json = body_json(send(app(), post_json(&body)).await).await;

    assert_eq!(json[0]["percentageOfProperty"], 25.0);
}

#[tokio::test]
async fn missing_total_counts_distinct_rooms() {
    let body = json!({
        "periods": [
            {"roomName": "A", "startDate": "01/01/2025", "endDate": "07/01/2025"},
            {"roomName": "B", "startDate": "08/01/2025", "endDate": "14/01/2025"}
        ]
    });

    let json = body_json(send(app(), post_json(&body)).await).await;

    assert_eq!(
        json,
        json!([{"roomCount": 1, "weeksInDisrepair": 2.0, "percentageOfProperty": 50.0}])
    );
}

#[tokio::test]
async fn decade_long_period_is_aggregated() {
    let body = json!({
        "periods": [{"roomName": "Hall", "startDate": "01/01/2000", "endDate": "31/12/2009"}]
    });

    let response = send(app(), post_json(&body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{"roomCount": 1, "weeksInDisrepair": 521.9, "percentageOfProperty": 100.0}])
    );
}

// ---------------------------------------------------------------------------
// Validation failures → 400 { error }
// ---------------------------------------------------------------------------

async fn assert_bad_request(body: Request<Body>, expected_fragment: &str) {
    let response = send(app(), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["error"].as_str().expect("error must be a string");
    assert!(
        message.contains(expected_fragment),
        "'{message}' should contain '{expected_fragment}'"
    );
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn missing_periods_is_bad_request() {
    assert_bad_request(post_json(&json!({"totalRooms": 2})), "periods").await;
}

#[tokio::test]
async fn empty_periods_is_bad_request() {
    assert_bad_request(post_json(&json!({"periods": []})), "must not be empty").await;
}

#[tokio::test]
async fn missing_room_name_is_bad_request() {
    let body = json!({
        "periods": [{"startDate": "01/01/2025", "endDate": "07/01/2025"}]
    });
    assert_bad_request(post_json(&body), "roomName").await;
}

#[tokio::test]
async fn malformed_date_is_bad_request() {
    let body = json!({
        "periods": [{"roomName": "A", "startDate": "2025/01/01", "endDate": "07/01/2025"}]
    });
    assert_bad_request(post_json(&body), "Invalid date format: '2025/01/01'").await;
}

#[tokio::test]
async fn inverted_period_is_bad_request() {
    let body = json!({
        "periods": [{"roomName": "A", "startDate": "10/01/2025", "endDate": "01/01/2025"}]
    });
    assert_bad_request(post_json(&body), "before startDate").await;
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/overlap")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert_bad_request(request, "Invalid JSON body").await;
}

// ---------------------------------------------------------------------------
// Methods and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_is_method_not_allowed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/overlap")
        .body(Body::empty())
        .unwrap();

    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], "Method not allowed");
}

#[tokio::test]
async fn plain_options_is_ok() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/overlap")
        .body(Body::empty())
        .unwrap();

    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/overlap")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn configured_keys_require_a_key() {
    let response = send(app_with(keyed_config()), post_json(&partial_overlap_body())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn known_key_is_accepted() {
    let mut request = post_json(&partial_overlap_body());
    request
        .headers_mut()
        .insert("x-api-key", "secret-1".parse().unwrap());

    let response = send(app_with(keyed_config()), request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_party_marker_bypasses_key() {
    let mut request = post_json(&partial_overlap_body());
    request
        .headers_mut()
        .insert("x-disrepair-client", "web-form".parse().unwrap());

    let response = send(app_with(keyed_config()), request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn requests_beyond_the_window_limit_get_429() {
    let app = app_with(ServerConfig {
        rate_limit_max: 2,
        rate_limit_window: Duration::from_secs(60),
        ..ServerConfig::default()
    });

    for _ in 0..2 {
        let response = send(app.clone(), post_json(&partial_overlap_body())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(app, post_json(&partial_overlap_body())).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn api_keys_have_separate_quotas() {
    let app = app_with(ServerConfig {
        rate_limit_max: 1,
        api_keys: HashMap::from([
            ("k1".to_string(), "one".to_string()),
            ("k2".to_string(), "two".to_string()),
        ]),
        ..ServerConfig::default()
    });

    for key in ["k1", "k2"] {
        let mut request = post_json(&partial_overlap_body());
        request.headers_mut().insert("x-api-key", key.parse().unwrap());
        let response = send(app.clone(), request).await;
        assert_eq!(response.status(), StatusCode::OK, "first request for {key}");
    }

    let mut request = post_json(&partial_overlap_body());
    request.headers_mut().insert("x-api-key", "k1".parse().unwrap());
    assert_eq!(send(app, request).await.status(), StatusCode::TOO_MANY_REQUESTS);
}
