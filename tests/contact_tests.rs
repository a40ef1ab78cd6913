
use mockito::Matcher;
use reqwest::{Method, StatusCode};
use serde_json::json;
use test_utils::*;

const WEBHOOK_PATH: &str = "/macros/s/test/exec";

fn valid_form() -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "phone": "+1 (555) 123-4567",
        "email": "ada@example.com",
        "message": "Would love to have you speak at our meetup."
    })
}

#[actix_rt::test]
async fn valid_message_is_forwarded_once() {
    let mut app = TestApp::spawn().await;
    let webhook = app.backend
        .mock("POST", WEBHOOK_PATH)
        .match_body(Matcher::Json(valid_form()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = app.send_json(Method::POST, "/api/v1/contact", Some(valid_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["type"], "success");
    assert_eq!(body["form"]["email"], "");
    webhook.assert_async().await;
}

#[actix_rt::test]
async fn webhook_error_status_still_counts_as_sent() {
    let mut app = TestApp::spawn().await;
    let webhook = app.backend
        .mock("POST", WEBHOOK_PATH)
        .with_status(500)
        .with_body(r#"{"result":"error"}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = app.send_json(Method::POST, "/api/v1/contact", Some(valid_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["type"], "success");
    assert_eq!(body["form"]["name"], "");
    assert_eq!(body["form"]["message"], "");
    webhook.assert_async().await;
}

#[actix_rt::test]
async fn webhook_html_answer_still_counts_as_sent() {
    let mut app = TestApp::spawn().await;
    let webhook = app.backend
        .mock("POST", WEBHOOK_PATH)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Moved Temporarily</body></html>")
        .expect(1)
        .create_async()
        .await;

    let (status, body) = app.send_json(Method::POST, "/api/v1/contact", Some(valid_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["type"], "success");
    assert_eq!(body["form"]["email"], "");
    webhook.assert_async().await;
}

#[actix_rt::test]
async fn short_phone_never_reaches_webhook() {
    let mut app = TestApp::spawn().await;
    let webhook = app.backend
        .mock("POST", WEBHOOK_PATH)
        .expect(0)
        .create_async()
        .await;

    let mut form = valid_form();
    form["phone"] = json!("12345");
    let (status, body) = app.send_json(Method::POST, "/api/v1/contact", Some(form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "phone");
    assert_eq!(body["details"][0]["message"], "Phone number must be at least 10 digits");
    assert_eq!(body["status"]["text"], "Please fix all errors before submitting");
    webhook.assert_async().await;
}

#[actix_rt::test]
async fn every_invalid_field_is_reported() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send_json(Method::POST, "/api/v1/contact", Some(json!({ "name": "A", "email": "nope" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["name", "phone", "email", "message"]);
}

#[actix_rt::test]
async fn unreachable_webhook_keeps_the_message() {
    let app = TestApp::spawn_with(|config| {
        config.form_webhook_url = "http://127.0.0.1:9/unreachable".to_string();
    })
    .await;

    let (status, body) = app.send_json(Method::POST, "/api/v1/contact", Some(valid_form())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["status"]["text"],
        "Oops! Something went wrong. Please try again or contact me directly via email."
    );
    assert_eq!(body["form"]["message"], "Would love to have you speak at our meetup.");
}

#[actix_rt::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
