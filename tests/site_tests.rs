
use reqwest::StatusCode;
use serde_json::json;
use test_utils::*;

#[actix_rt::test]
async fn health_reports_configured_backends() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "testing");
    assert_eq!(body["record_store"], "Configured");
}

#[actix_rt::test]
async fn home_lists_entry_points() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["routes"]["events"], "/api/v1/events");
}

#[actix_rt::test]
async fn route_resolves_admin_only_on_exact_fragment() {
    let app = TestApp::spawn().await;

    let (_, admin) = app.get_json("/api/v1/route?fragment=%23admin").await;
    let (_, other) = app.get_json("/api/v1/route?fragment=%23events").await;
    let (_, empty) = app.get_json("/api/v1/route").await;
    let (_, by_url) = app
        .get_json("/api/v1/route?url=https%3A%2F%2Fsite.example%2F%23admin")
        .await;

    assert_eq!(admin["route"], "admin");
    assert_eq!(other["route"], "public");
    assert_eq!(empty["route"], "public");
    assert_eq!(by_url["route"], "admin");
}

#[actix_rt::test]
async fn events_feed_carries_carousel_window() {
    let mut app = TestApp::spawn().await;
    let base = app.backend.url();
    let rows = json!([
        event_row(5, "Newest", "e-5.jpg", &base),
        event_row(4, "Fourth", "e-4.jpg", &base),
        event_row(3, "Third", "e-3.jpg", &base),
        event_row(2, "Second", "e-2.jpg", &base),
        event_row(1, "Oldest", "e-1.jpg", &base),
    ]);
    let listing = app.mock_listing("events", rows).await;

    let (status, desktop) = app.get_json("/api/v1/events?width=1280").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(desktop["items"].as_array().unwrap().len(), 5);
    assert_eq!(desktop["items"][0]["title"], "Newest");
    assert_eq!(desktop["view"]["items_per_view"], 3);
    assert_eq!(desktop["view"]["index"], 0);
    assert_eq!(desktop["max_index"], 2);
    assert_eq!(desktop["rotation_secs"], 4);

    let (_, mobile) = app.get_json("/api/v1/events?width=375").await;
    assert_eq!(mobile["view"]["items_per_view"], 1);
    assert_eq!(mobile["max_index"], 4);

    listing.assert_async().await;
}

#[actix_rt::test]
async fn posters_feed_uses_poster_period() {
    let mut app = TestApp::spawn().await;
    let base = app.backend.url();
    let rows = json!([
        poster_row(2, "p-2.mp4", "video", &base),
        poster_row(1, "p-1.jpg", "image", &base),
    ]);
    app.mock_listing("posters", rows).await;

    let (status, body) = app.get_json("/api/v1/posters").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["media_type"], "video");
    assert_eq!(body["view"]["items_per_view"], 3);
    assert_eq!(body["max_index"], 0);
    assert_eq!(body["rotation_secs"], 5);
}

#[actix_rt::test]
async fn store_failure_is_a_server_error() {
    let mut app = TestApp::spawn().await;
    app.backend
        .mock("GET", "/rest/v1/events")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .with_body(r#"{"message":"upstream unavailable"}"#)
        .create_async()
        .await;

    let (status, body) = app.get_json("/api/v1/events").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("upstream unavailable"));
}
