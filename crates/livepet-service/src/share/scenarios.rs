//! End-to-end behavior of issuance, the gateway, and revocation against the
//! in-memory store.

use chrono::{Duration, Utc};

use livepet_core::error::ErrorKind;
use livepet_core::types::{PageRequest, PetId};
use livepet_database::ShareStore;
use livepet_entity::health::SHARE_EVENT_RECORD_TYPE;
use livepet_entity::share::{ShareState, ShareStatus};

use super::access::{AccessOutcome, DenialReason};
use super::service::{CreateShareRequest, CreatedShare};
use crate::testing::{Fixture, RecordingRelay, recipient};

fn open_request() -> CreateShareRequest {
    CreateShareRequest {
        require_access_code: false,
        ..CreateShareRequest::for_recipient("vet@example.com")
    }
}

async fn issue(fx: &Fixture, req: CreateShareRequest) -> CreatedShare {
    fx.shares
        .create_share(&fx.owner, fx.pet.id, req)
        .await
        .expect("create share")
}

async fn views(fx: &Fixture, created: &CreatedShare) -> i32 {
    fx.store
        .find_share_by_id(created.share_id)
        .await
        .expect("find")
        .expect("exists")
        .views_count
}

#[tokio::test]
async fn test_open_share_loads_enabled_categories() {
    let fx = Fixture::new().await;
    fx.add_record("Rabies booster", 10).await;
    fx.add_record("Annual checkup", 20).await;
    fx.add_alert("Heartworm pill").await;

    let created = issue(
        &fx,
        CreateShareRequest {
            expiration_hours: 1,
            ..open_request()
        },
    )
    .await;
    assert!(created.access_code.is_none());

    let outcome = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve");
    let profile = match outcome {
        AccessOutcome::Granted(profile) => profile,
        other => panic!("expected granted, got {}", other.code()),
    };

    assert_eq!(profile.pet.id, fx.pet.id);
    assert_eq!(profile.pet.name, "Biscuit");
    let records = profile.health_records.as_ref().expect("records enabled");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Annual checkup");
    assert_eq!(profile.alerts.as_ref().map(Vec::len), Some(1));
    assert_eq!(profile.vitals.as_ref().map(Vec::len), Some(0));
    assert_eq!(profile.documents.as_ref().map(Vec::len), Some(0));
    assert_eq!(views(&fx, &created).await, 1);
}

#[tokio::test]
async fn test_single_view_share_is_exhausted_after_one_view() {
    let fx = Fixture::new().await;
    let created = issue(
        &fx,
        CreateShareRequest {
            max_views: Some(1),
            ..open_request()
        },
    )
    .await;

    let first = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve");
    assert_eq!(first.code(), "ok");

    let second = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve");
    assert!(matches!(
        second,
        AccessOutcome::Denied(DenialReason::ViewLimitReached)
    ));
    assert_eq!(second.code(), "view_limit_reached");
    assert_eq!(views(&fx, &created).await, 1);
}

#[tokio::test]
async fn test_coded_share_challenge_then_verify() {
    let fx = Fixture::new().await;
    let created = issue(&fx, CreateShareRequest::for_recipient("vet@example.com")).await;
    let code = created.access_code.clone().expect("code issued");
    assert_eq!(code.len(), 6);

    let challenge = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve");
    assert_eq!(challenge.code(), "code_required");

    let wrong = if code == "000000" { "000001" } else { "000000" };
    let rejected = fx
        .access
        .verify_code(&created.share_token, wrong, &recipient())
        .await
        .expect("verify");
    assert!(matches!(rejected, AccessOutcome::InvalidCode));
    assert_eq!(views(&fx, &created).await, 0);

    let accepted = fx
        .access
        .verify_code(&created.share_token, &code, &recipient())
        .await
        .expect("verify");
    assert_eq!(accepted.code(), "ok");
    assert_eq!(views(&fx, &created).await, 1);

    let logs = fx
        .shares
        .access_logs(&fx.owner, created.share_id)
        .await
        .expect("logs");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs.iter().filter(|l| l.success).count(), 1);
    assert!(logs.iter().all(|l| l.viewed_section == "summary"));
    assert!(logs.iter().all(|l| l.ip_address.as_deref() == Some("203.0.113.7")));
}

#[tokio::test]
async fn test_revoke_blocks_access_and_is_idempotent() {
    let fx = Fixture::new().await;
    let created = issue(&fx, open_request()).await;

    let first = fx
        .shares
        .revoke(&fx.owner, created.share_id)
        .await
        .expect("revoke");
    assert_eq!(first.grant.status, ShareStatus::Revoked);
    assert_eq!(first.state, ShareState::Revoked);
    let revoked_at = first.grant.revoked_at.expect("stamped");

    let outcome = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve");
    assert!(matches!(outcome, AccessOutcome::Denied(DenialReason::Revoked)));

    let second = fx
        .shares
        .revoke(&fx.owner, created.share_id)
        .await
        .expect("second revoke is not an error");
    assert_eq!(second.grant.revoked_at, Some(revoked_at));
}

#[tokio::test]
async fn test_malformed_email_persists_nothing() {
    let fx = Fixture::new().await;
    let err = fx
        .shares
        .create_share(
            &fx.owner,
            fx.pet.id,
            CreateShareRequest::for_recipient("not-an-email"),
        )
        .await
        .expect_err("must reject");
    assert_eq!(err.kind, ErrorKind::Validation);

    let page = fx
        .shares
        .list_shares(&fx.owner, PageRequest::default())
        .await
        .expect("list");
    assert_eq!(page.total_items, 0);
    assert!(fx.relay.sent.lock().await.is_empty());
    assert!(fx.store.records_for(fx.pet.id).await.is_empty());
}

#[tokio::test]
async fn test_rejects_unlisted_window_and_zero_views() {
    let fx = Fixture::new().await;
    for req in [
        CreateShareRequest {
            expiration_hours: 5,
            ..open_request()
        },
        CreateShareRequest {
            max_views: Some(0),
            ..open_request()
        },
    ] {
        let err = fx
            .shares
            .create_share(&fx.owner, fx.pet.id, req)
            .await
            .expect_err("must reject");
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

#[tokio::test]
async fn test_cannot_share_someone_elses_pet() {
    let fx = Fixture::new().await;
    let err = fx
        .shares
        .create_share(&fx.owner, PetId::new(), open_request())
        .await
        .expect_err("not owned");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_expired_share_never_resolves() {
    let fx = Fixture::new().await;
    let created = issue(&fx, CreateShareRequest::for_recipient("vet@example.com")).await;
    let code = created.access_code.clone().expect("code");

    let mut grant = fx
        .store
        .find_share_by_id(created.share_id)
        .await
        .expect("find")
        .expect("exists");
    grant.created_at = Utc::now() - Duration::hours(3);
    grant.expires_at = Utc::now() - Duration::hours(1);
    fx.store.put_share(grant).await;

    let resolved = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve");
    assert!(matches!(resolved, AccessOutcome::Denied(DenialReason::Expired)));
    assert_eq!(resolved.code(), "invalid_or_expired");

    let verified = fx
        .access
        .verify_code(&created.share_token, &code, &recipient())
        .await
        .expect("verify");
    assert!(matches!(verified, AccessOutcome::Denied(DenialReason::Expired)));
    assert_eq!(views(&fx, &created).await, 0);
}

#[tokio::test]
async fn test_revoked_share_rejects_correct_code() {
    let fx = Fixture::new().await;
    let created = issue(&fx, CreateShareRequest::for_recipient("vet@example.com")).await;
    let code = created.access_code.clone().expect("code");
    fx.shares
        .revoke(&fx.owner, created.share_id)
        .await
        .expect("revoke");

    let outcome = fx
        .access
        .verify_code(&created.share_token, &code, &recipient())
        .await
        .expect("verify");
    assert!(matches!(outcome, AccessOutcome::Denied(DenialReason::Revoked)));
}

#[tokio::test]
async fn test_unknown_and_malformed_tokens_denied() {
    let fx = Fixture::new().await;
    let unknown = "f".repeat(64);
    for token in ["", "short", unknown.as_str()] {
        let outcome = fx
            .access
            .resolve_share(token, &recipient())
            .await
            .expect("resolve");
        assert!(matches!(outcome, AccessOutcome::Denied(DenialReason::NotFound)));
    }
}

#[tokio::test]
async fn test_coded_share_never_loads_without_match() {
    let fx = Fixture::new().await;
    fx.add_record("Rabies booster", 10).await;
    let created = issue(&fx, CreateShareRequest::for_recipient("vet@example.com")).await;
    let code = created.access_code.clone().expect("code");

    for attempt in ["", "12345", "1234567", "abcdef", "999999", "000000"] {
        if attempt == code {
            continue;
        }
        let outcome = fx
            .access
            .verify_code(&created.share_token, attempt, &recipient())
            .await
            .expect("verify");
        assert!(!matches!(outcome, AccessOutcome::Granted(_)));
    }
    assert_eq!(views(&fx, &created).await, 0);
}

#[tokio::test]
async fn test_disabled_categories_absent_from_output() {
    let fx = Fixture::new().await;
    fx.add_record("Rabies booster", 10).await;
    fx.add_vital(21.5).await;
    fx.add_alert("Heartworm pill").await;
    fx.add_document("Bloodwork").await;

    let created = issue(
        &fx,
        CreateShareRequest {
            allow_vitals: false,
            allow_documents: false,
            ..open_request()
        },
    )
    .await;

    let AccessOutcome::Granted(profile) = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve")
    else {
        panic!("expected granted");
    };
    assert!(profile.vitals.is_none());
    assert!(profile.documents.is_none());
    assert!(profile.health_records.is_some());

    let json = serde_json::to_value(&*profile).expect("serialize");
    assert!(json.get("vitals").is_none());
    assert!(json.get("documents").is_none());
    assert!(json.get("health_records").is_some());
    assert!(json["pet"].get("user_id").is_none());
}

#[tokio::test]
async fn test_identity_only_share() {
    let fx = Fixture::new().await;
    fx.add_record("Rabies booster", 10).await;
    let created = issue(
        &fx,
        CreateShareRequest {
            allow_health_records: false,
            allow_vitals: false,
            allow_alerts: false,
            allow_documents: false,
            ..open_request()
        },
    )
    .await;

    let AccessOutcome::Granted(profile) = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve")
    else {
        panic!("expected granted");
    };
    assert_eq!(profile.pet.id, fx.pet.id);
    assert!(profile.health_records.is_none());
    assert!(profile.alerts.is_none());
}

#[tokio::test]
async fn test_round_trip_pet_identity() {
    let fx = Fixture::new().await;
    let created = issue(&fx, CreateShareRequest::for_recipient("vet@example.com")).await;
    let code = created.access_code.clone().expect("code");

    let outcome = fx
        .access
        .verify_code(&created.share_token, &code, &recipient())
        .await
        .expect("verify");
    let AccessOutcome::Granted(profile) = outcome else {
        panic!("expected granted");
    };
    assert_eq!(profile.pet.id, fx.pet.id);
    assert_eq!(profile.pet.species, fx.pet.species);
    assert_eq!(profile.share.expires_at, created.expires_at);
}

#[tokio::test]
async fn test_concurrent_verification_respects_cap() {
    let fx = Fixture::new().await;
    let created = issue(
        &fx,
        CreateShareRequest {
            max_views: Some(3),
            ..CreateShareRequest::for_recipient("vet@example.com")
        },
    )
    .await;
    let code = created.access_code.clone().expect("code");

    let mut handles = Vec::new();
    for _ in 0..24 {
        let access = fx.access.clone();
        let token = created.share_token.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            access
                .verify_code(&token, &code, &recipient())
                .await
                .expect("verify")
        }));
    }

    let mut granted = 0;
    for handle in handles {
        match handle.await.expect("join") {
            AccessOutcome::Granted(_) => granted += 1,
            AccessOutcome::Denied(DenialReason::ViewLimitReached) => {}
            other => panic!("unexpected outcome {}", other.code()),
        }
    }
    assert_eq!(granted, 3);
    assert_eq!(views(&fx, &created).await, 3);
}

#[tokio::test]
async fn test_issuance_sends_email_and_records_timeline() {
    let fx = Fixture::new().await;
    let created = issue(
        &fx,
        CreateShareRequest {
            recipient_name: Some("  Dr. Rivera ".to_string()),
            message: Some("   ".to_string()),
            expiration_hours: 72,
            ..CreateShareRequest::for_recipient(" vet@example.com ")
        },
    )
    .await;
    assert!(created.email_sent);
    assert_eq!(
        created.share_url,
        format!("https://livepet.test/shared/health/{}", created.share_token)
    );
    assert!(!created.share_url.contains(created.access_code.as_deref().unwrap_or("-")));

    let sent = fx.relay.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient_email, "vet@example.com");
    assert_eq!(sent[0].recipient_name.as_deref(), Some("Dr. Rivera"));
    assert_eq!(sent[0].message, None);
    assert_eq!(sent[0].expiration_hours, 72);
    assert_eq!(sent[0].pet_name, "Biscuit");

    let timeline = fx.store.records_for(fx.pet.id).await;
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].title, "Health Profile Shared");
    assert_eq!(timeline[0].record_type, SHARE_EVENT_RECORD_TYPE);
    let code = created.access_code.as_deref().expect("code");
    let rendered = serde_json::to_string(&timeline[0]).expect("serialize");
    assert!(!rendered.contains(code));
    assert!(!rendered.contains("vet@example.com"));
}

#[tokio::test]
async fn test_share_events_stay_off_shared_profiles() {
    let fx = Fixture::new().await;
    fx.add_record("Annual checkup", 20).await;
    issue(
        &fx,
        CreateShareRequest {
            require_access_code: false,
            ..CreateShareRequest::for_recipient("first.vet@example.com")
        },
    )
    .await;
    let second = issue(
        &fx,
        CreateShareRequest {
            require_access_code: false,
            ..CreateShareRequest::for_recipient("sitter@example.com")
        },
    )
    .await;
    assert_eq!(fx.store.records_for(fx.pet.id).await.len(), 3);

    let outcome = fx
        .access
        .resolve_share(&second.share_token, &recipient())
        .await
        .expect("resolve");
    let profile = match outcome {
        AccessOutcome::Granted(profile) => profile,
        other => panic!("expected granted, got {}", other.code()),
    };
    let records = profile.health_records.as_ref().expect("records enabled");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Annual checkup");
    assert!(records.iter().all(|r| r.record_type != SHARE_EVENT_RECORD_TYPE));

    let rendered = serde_json::to_string(&*profile).expect("serialize");
    assert!(!rendered.contains("first.vet@example.com"));
}

#[tokio::test]
async fn test_relay_failure_still_creates_share() {
    let fx = Fixture::with_relay(RecordingRelay {
        fail: true,
        ..RecordingRelay::default()
    })
    .await;
    let created = issue(&fx, open_request()).await;
    assert!(!created.email_sent);

    let summary = fx
        .shares
        .get_share(&fx.owner, created.share_id)
        .await
        .expect("share exists");
    assert_eq!(summary.state, ShareState::Active);
}

#[tokio::test]
async fn test_failed_category_is_omitted() {
    let fx = Fixture::with_flaky_health().await;
    fx.add_record("Rabies booster", 10).await;
    fx.add_vital(21.5).await;

    // Timeline write fails here too; issuance must still succeed.
    let created = issue(&fx, open_request()).await;

    let AccessOutcome::Granted(profile) = fx
        .access
        .resolve_share(&created.share_token, &recipient())
        .await
        .expect("resolve")
    else {
        panic!("expected granted");
    };
    assert!(profile.vitals.is_none());
    assert_eq!(profile.health_records.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_owner_views_are_owner_scoped() {
    let fx = Fixture::new().await;
    let created = issue(&fx, open_request()).await;
    let stranger = crate::context::RequestContext::new(
        livepet_core::types::UserId::new(),
        "stranger@example.com".to_string(),
        None,
        None,
    );

    for err in [
        fx.shares.get_share(&stranger, created.share_id).await.err(),
        fx.shares.revoke(&stranger, created.share_id).await.err(),
        fx.shares.access_logs(&stranger, created.share_id).await.err(),
    ] {
        assert_eq!(err.map(|e| e.kind), Some(ErrorKind::NotFound));
    }

    let page = fx
        .shares
        .list_shares(&fx.owner, PageRequest::default())
        .await
        .expect("list");
    assert_eq!(page.total_items, 1);
    assert!(!page.items[0].requires_code);
    let other = fx
        .shares
        .list_shares(&stranger, PageRequest::default())
        .await
        .expect("list");
    assert_eq!(other.total_items, 0);
}
