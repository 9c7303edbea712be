//! Anonymous recipient access to share links over HTTP.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use livepet_core::types::ShareId;
use livepet_entity::share::{CategoryVisibility, NewShareGrant};

use crate::helpers::{TestApp, shared_path, verify_path};

#[tokio::test]
async fn test_coded_link_challenge_then_profile() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({
            "recipient_email": "dr.lee@vetclinic.example",
            "recipient_name": "Dr. Lee",
            "message": "Annual checkup notes",
            "allow_vitals": false,
            "allow_documents": false,
        }))
        .await;
    let token = data["share_token"].as_str().expect("share_token");
    let code = data["access_code"].as_str().expect("access_code");

    let response = app.public_request("GET", &shared_path(token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "code_required");
    assert_eq!(response.body["data"]["challenge"]["recipient_name"], "Dr. Lee");
    assert!(response.body["data"].get("profile").is_none());

    let response = app
        .public_request("POST", &verify_path(token), Some(json!({ "code": code })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let profile = &response.body["data"]["profile"];
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(profile["pet"]["name"], "Mochi");
    assert_eq!(profile["pet"]["id"], app.pet.id.to_string());
    assert!(profile["pet"].get("user_id").is_none());
    assert_eq!(profile["health_records"][0]["title"], "Rabies booster");
    assert!(profile["alerts"].as_array().is_some_and(|a| a.is_empty()));
    assert!(profile.get("vitals").is_none());
    assert!(profile.get("documents").is_none());
    assert_eq!(profile["share"]["message"], "Annual checkup notes");
}

#[tokio::test]
async fn test_wrong_code_is_401_and_uses_no_view() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({ "recipient_email": "vet@example.com", "max_views": 1 }))
        .await;
    let token = data["share_token"].as_str().expect("share_token");
    let code = data["access_code"].as_str().expect("access_code");
    let wrong = if code == "123456" { "654321" } else { "123456" };

    for _ in 0..3 {
        let response = app
            .public_request("POST", &verify_path(token), Some(json!({ "code": wrong })))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["error"], "invalid_code");
    }

    let response = app
        .public_request("POST", &verify_path(token), Some(json!({ "code": code })))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The single view is gone now.
    let response = app
        .public_request("POST", &verify_path(token), Some(json!({ "code": code })))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "invalid_or_expired");
}

#[tokio::test]
async fn test_codeless_link_loads_directly_until_views_run_out() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({
            "recipient_email": "sitter@example.com",
            "require_access_code": false,
            "max_views": 2,
        }))
        .await;
    let token = data["share_token"].as_str().expect("share_token");
    assert!(data["access_code"].is_null());

    for _ in 0..2 {
        let response = app.public_request("GET", &shared_path(token), None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["status"], "ok");
        assert_eq!(response.body["data"]["profile"]["vitals"][0]["value"], 4.2);
    }

    let response = app.public_request("GET", &shared_path(token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_malformed_tokens() {
    let app = TestApp::new().await;
    for token in ["f".repeat(64), "not-a-token".to_string(), "F".repeat(64)] {
        let response = app.public_request("GET", &shared_path(&token), None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["message"], "This link is no longer valid");
    }
}

#[tokio::test]
async fn test_expired_link_never_resolves() {
    let app = TestApp::new().await;
    let token = "ab".repeat(32);
    let created_at = Utc::now() - Duration::hours(30);
    app.store
        .put_share(
            NewShareGrant {
                share_token: token.clone(),
                user_id: app.owner_id,
                pet_id: app.pet.id,
                access_code: None,
                recipient_email: "late@example.com".to_string(),
                recipient_name: None,
                message: None,
                created_at,
                expires_at: created_at + Duration::hours(24),
                max_views: None,
                visibility: CategoryVisibility::default(),
            }
            .into_grant(ShareId::new()),
        )
        .await;

    let response = app.public_request("GET", &shared_path(&token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app
        .public_request("POST", &verify_path(&token), Some(json!({ "code": "123456" })))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_denial_reason_disclosed_when_configured() {
    let app = TestApp::with_config(|c| c.share.disclose_denial_reason = true).await;
    let data = app
        .create_share(json!({ "recipient_email": "vet@example.com" }))
        .await;
    let id = data["share_id"].as_str().expect("share_id");
    let token = data["share_token"].as_str().expect("share_token");

    app.request(
        "POST",
        &format!("/api/shares/{id}/revoke"),
        None,
        Some(&app.owner_token),
    )
    .await;

    let response = app.public_request("GET", &shared_path(token), None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.body["error"], "revoked");
}

#[tokio::test]
async fn test_verify_needs_a_json_body() {
    let app = TestApp::new().await;
    let data = app
        .create_share(json!({ "recipient_email": "vet@example.com" }))
        .await;
    let token = data["share_token"].as_str().expect("share_token");

    let response = app
        .public_request("POST", &verify_path(token), Some(json!({ "pin": "1" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_routes_are_rate_limited() {
    let app = TestApp::with_config(|c| {
        c.rate_limit.enabled = true;
        c.rate_limit.burst = 3;
        c.rate_limit.requests_per_minute = 1;
    })
    .await;
    let token = "f".repeat(64);

    for _ in 0..3 {
        let response = app.public_request("GET", &shared_path(&token), None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
    let response = app.public_request("GET", &shared_path(&token), None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["error"], "RATE_LIMITED");

    // Owner routes are not throttled by the public bucket.
    let response = app
        .request("GET", "/api/shares", None, Some(&app.owner_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rotating_forwarded_for_shares_one_bucket() {
    let app = TestApp::with_config(|c| {
        c.rate_limit.enabled = true;
        c.rate_limit.burst = 3;
        c.rate_limit.requests_per_minute = 1;
    })
    .await;
    let token = "e".repeat(64);

    for i in 0..3 {
        let forwarded = format!("198.51.100.{i}");
        let response = app
            .public_request_forwarded("GET", &shared_path(&token), None, &forwarded)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
    let response = app
        .public_request_forwarded("GET", &shared_path(&token), None, "198.51.100.99")
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_code_attempts_are_limited_per_link() {
    let app = TestApp::with_config(|c| {
        c.rate_limit.enabled = true;
        c.rate_limit.burst = 100;
        c.rate_limit.code_attempts_per_token = 3;
        c.rate_limit.code_attempts_per_minute = 1;
        c.rate_limit.trust_forwarded_for = true;
    })
    .await;
    let data = app
        .create_share(json!({ "recipient_email": "vet@example.com" }))
        .await;
    let token = data["share_token"].as_str().expect("share_token");
    let code = data["access_code"].as_str().expect("access_code");
    let wrong = if code == "123456" { "654321" } else { "123456" };

    for i in 0..3 {
        let forwarded = format!("198.51.100.{i}");
        let response = app
            .public_request_forwarded(
                "POST",
                &verify_path(token),
                Some(json!({ "code": wrong })),
                &forwarded,
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    // A fresh address does not buy more guesses at the same link.
    let response = app
        .public_request_forwarded(
            "POST",
            &verify_path(token),
            Some(json!({ "code": code })),
            "192.0.2.200",
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    // Resolving the link is throttled per client only.
    let response = app
        .public_request_forwarded("GET", &shared_path(token), None, "192.0.2.200")
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_earlier_shares_are_not_visible_to_later_recipients() {
    let app = TestApp::new().await;
    app.create_share(json!({
        "recipient_email": "first.vet@example.com",
        "require_access_code": false,
    }))
    .await;
    let data = app
        .create_share(json!({
            "recipient_email": "sitter@example.com",
            "require_access_code": false,
        }))
        .await;
    let token = data["share_token"].as_str().expect("share_token");

    let response = app.public_request("GET", &shared_path(token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let records = response.body["data"]["profile"]["health_records"]
        .as_array()
        .expect("health_records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Rabies booster");
    assert!(!response.body.to_string().contains("first.vet@example.com"));
}
