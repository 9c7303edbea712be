//! Owner share management over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use livepet_core::types::UserId;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store_reachable"], true);
}

#[tokio::test]
async fn test_create_share_returns_link_and_code_once() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({
            "recipient_email": "dr.lee@vetclinic.example",
            "recipient_name": "Dr. Lee",
            "expiration_hours": 48,
        }))
        .await;

    let token = data["share_token"].as_str().expect("share_token");
    assert_eq!(token.len(), 64);
    assert_eq!(
        data["share_url"],
        format!("https://livepet.test/shared/health/{token}")
    );
    let code = data["access_code"].as_str().expect("access_code");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(data["email_sent"], true);

    let sent = app.relay.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient_email, "dr.lee@vetclinic.example");
    assert_eq!(sent[0].expiration_hours, 48);

    // The owner can inspect the share later but never sees the code again.
    let id = data["share_id"].as_str().expect("share_id");
    let response = app
        .request("GET", &format!("/api/shares/{id}"), None, Some(&app.owner_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "active");
    assert_eq!(response.body["data"]["requires_code"], true);
    assert!(response.body["data"].get("access_code").is_none());
}

#[tokio::test]
async fn test_create_share_requires_bearer_token() {
    let app = TestApp::new().await;
    let path = format!("/api/pets/{}/shares", app.pet.id);
    let body = json!({ "recipient_email": "friend@example.com" });

    let response = app.request("POST", &path, Some(body.clone()), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("POST", &path, Some(body), Some("not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.relay.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_create_share_rejects_invalid_options() {
    let app = TestApp::new().await;
    let path = format!("/api/pets/{}/shares", app.pet.id);

    for body in [
        json!({ "recipient_email": "friend@example.com", "expiration_hours": 5 }),
        json!({ "recipient_email": "friend@example.com", "max_views": 0 }),
        json!({ "recipient_email": "not-an-email" }),
        json!({ "expiration_hours": 24 }),
    ] {
        let response = app
            .request("POST", &path, Some(body.clone()), Some(&app.owner_token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "accepted {body}");
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }

    let response = app
        .request("POST", "/api/pets/nope/shares", Some(json!({})), Some(&app.owner_token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cannot_share_someone_elses_pet() {
    let app = TestApp::new().await;
    let stranger = app.token_for(UserId::new(), "stranger@example.com");
    let path = format!("/api/pets/{}/shares", app.pet.id);

    let response = app
        .request(
            "POST",
            &path,
            Some(json!({ "recipient_email": "friend@example.com" })),
            Some(&stranger),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.relay.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_list_shares_is_owner_scoped() {
    let app = TestApp::new().await;
    app.create_share(json!({ "recipient_email": "a@example.com" })).await;
    app.create_share(json!({ "recipient_email": "b@example.com" })).await;

    let response = app
        .request("GET", "/api/shares?page=1&per_page=10", None, Some(&app.owner_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let page = &response.body["data"];
    assert_eq!(page["total_items"], 2);
    assert_eq!(page["items"][0]["recipient_email"], "b@example.com");
    assert_eq!(page["items"][1]["recipient_email"], "a@example.com");

    let stranger = app.token_for(UserId::new(), "stranger@example.com");
    let response = app.request("GET", "/api/shares", None, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_revoke_stops_the_link() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({
            "recipient_email": "sitter@example.com",
            "require_access_code": false,
        }))
        .await;
    let id = data["share_id"].as_str().expect("share_id");
    let token = data["share_token"].as_str().expect("share_token");

    let stranger = app.token_for(UserId::new(), "stranger@example.com");
    let revoke_path = format!("/api/shares/{id}/revoke");
    let response = app.request("POST", &revoke_path, None, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("POST", &revoke_path, None, Some(&app.owner_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "revoked");

    // Revoking again is harmless.
    let response = app
        .request("POST", &revoke_path, None, Some(&app.owner_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "revoked");

    let response = app.public_request("GET", &helpers::shared_path(token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "invalid_or_expired");
}

#[tokio::test]
async fn test_access_logs_record_attempts() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({ "recipient_email": "vet@example.com" }))
        .await;
    let id = data["share_id"].as_str().expect("share_id");
    let token = data["share_token"].as_str().expect("share_token");
    let code = data["access_code"].as_str().expect("access_code");

    let wrong = if code == "000000" { "111111" } else { "000000" };
    app.public_request("POST", &helpers::verify_path(token), Some(json!({ "code": wrong })))
        .await;
    app.public_request("POST", &helpers::verify_path(token), Some(json!({ "code": code })))
        .await;

    let logs_path = format!("/api/shares/{id}/access-logs");
    let response = app.request("GET", &logs_path, None, Some(&app.owner_token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let entries = response.body["data"].as_array().expect("log entries");
    let successes = entries.iter().filter(|e| e["success"] == true).count();
    assert_eq!(entries.len(), 2, "unexpected log: {entries:?}");
    assert_eq!(successes, 1);
    assert!(entries.iter().all(|e| e["ip_address"] == helpers::RECIPIENT_IP));

    let stranger = app.token_for(UserId::new(), "stranger@example.com");
    let response = app.request("GET", &logs_path, None, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
