//! REST router tests driven through tower's `oneshot`

mod common;
use common::print_test_header;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use marquee_banner::{BannerModule, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    BannerModule::in_memory(Config::default()).router()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_get_settings_returns_defaults() {
    print_test_header(
        "test_get_settings_returns_defaults",
        &["GET on a fresh module returns the default snapshot and its hash."],
    );

    let app = app();
    let (status, body) = send(&app, Method::GET, "/banner/v1/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["enabled"], false);
    assert_eq!(body["settings"]["repeat_count"], 5);
    assert_eq!(body["settings"]["background_color"], "#1e73be");
    assert_eq!(body["settings"]["button"]["lock_position"], "right");
    assert_eq!(body["settings_hash"].as_str().map(str::len), Some(16));
}

#[tokio::test]
async fn test_put_settings_validates_and_persists() {
    print_test_header(
        "test_put_settings_validates_and_persists",
        &["PUT returns the validated snapshot and GET reads it back."],
    );

    let app = app();
    let (status, saved) = send(
        &app,
        Method::PUT,
        "/banner/v1/settings",
        Some(json!({
            "enabled": "1",
            "message": "<p onclick=\"x()\">Hello</p>",
            "scroll_speed_seconds": 1,
            "text_color": "#ABCDEF",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["settings"]["enabled"], true);
    assert_eq!(saved["settings"]["message"], "Hello");
    assert_eq!(saved["settings"]["scroll_speed_seconds"], 10);
    assert_eq!(saved["settings"]["text_color"], "#ABCDEF");

    let (_, read) = send(&app, Method::GET, "/banner/v1/settings", None).await;
    assert_eq!(read, saved);
}

#[tokio::test]
async fn test_put_non_object_is_a_problem() {
    print_test_header(
        "test_put_non_object_is_a_problem",
        &["A JSON body that is not an object maps to a 400 problem document."],
    );

    let app = app();
    let (status, body) = send(&app, Method::PUT, "/banner/v1/settings", Some(json!("enabled"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Invalid Input");
    assert_eq!(body["instance"], "/banner/v1/settings");
}

#[tokio::test]
async fn test_render_endpoint() {
    print_test_header(
        "test_render_endpoint",
        &[
            "POST /render decides and renders for the given path, width and time.",
            "Width is classified with the configured breakpoints.",
        ],
    );

    let app = app();
    send(
        &app,
        Method::PUT,
        "/banner/v1/settings",
        Some(json!({
            "enabled": true,
            "message": "Sale!",
            "scroll_speed_seconds": 60,
            "mobile_speed_multiplier": 0.5,
            "exclude_urls": "/checkout/",
            "end_date": "2024-12-31",
        })),
    )
    .await;

    println!("\n📝 Stage 1: Visible on a mobile width");
    let (status, body) = send(
        &app,
        Method::POST,
        "/banner/v1/render",
        Some(json!({ "path": "/shop/?ref=x", "width": 390, "now": "2024-06-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["show_banner"], true);
    assert_eq!(body["banner_reason"], "visible");
    assert_eq!(body["viewport"], "mobile");
    assert_eq!(body["image_reason"], "no_image");
    let html = body["html"].as_str().unwrap_or_default();
    assert!(html.contains("marquee-banner-scroll 30s linear infinite"));

    println!("\n📝 Stage 2: Excluded path");
    let (_, body) = send(
        &app,
        Method::POST,
        "/banner/v1/render",
        Some(json!({ "path": "/checkout/", "now": "2024-06-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(body["show_banner"], false);
    assert_eq!(body["banner_reason"], "excluded");
    assert_eq!(body["html"], "");
    assert!(body.get("banner_html").is_none());

    println!("\n📝 Stage 3: After the end date");
    let (_, body) = send(
        &app,
        Method::POST,
        "/banner/v1/render",
        Some(json!({ "path": "/", "viewport": "desktop", "now": "2025-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(body["banner_reason"], "outside_schedule");
}

#[tokio::test]
async fn test_render_rejects_unknown_fields() {
    print_test_header(
        "test_render_rejects_unknown_fields",
        &["Malformed render requests are rejected by the JSON extractor."],
    );

    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/banner/v1/render",
        Some(json!({ "path": "/", "viewport": "watch" })),
    )
    .await;
    assert!(status.is_client_error());
}
