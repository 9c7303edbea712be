//! Public share link handlers for anonymous recipients.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use livepet_service::share::{AccessOutcome, DenialReason};

use crate::dto::request::VerifyCodeRequest;
use crate::dto::response::{ApiResponse, SharedAccessResponse};
use crate::error::{ApiError, ApiErrorResponse};
use crate::extractors::{ApiJson, Recipient};
use crate::state::AppState;

/// GET /api/shared/health/{token}
pub async fn resolve_share(
    State(state): State<AppState>,
    Recipient(client): Recipient,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = state.access_service.resolve_share(&token, &client).await?;
    Ok(outcome_response(outcome, state.config.share.disclose_denial_reason))
}

/// POST /api/shared/health/{token}/verify
pub async fn verify_code(
    State(state): State<AppState>,
    Recipient(client): Recipient,
    Path(token): Path<String>,
    ApiJson(req): ApiJson<VerifyCodeRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .access_service
        .verify_code(&token, &req.code, &client)
        .await?;
    Ok(outcome_response(outcome, state.config.share.disclose_denial_reason))
}

/// Map a gateway outcome to an HTTP response.
///
/// Unless `disclose` is set every denial looks the same, so a recipient
/// cannot tell an unknown token from a revoked or used-up one.
pub fn outcome_response(outcome: AccessOutcome, disclose: bool) -> Response {
    match outcome {
        AccessOutcome::Granted(profile) => {
            Json(ApiResponse::ok(SharedAccessResponse::granted(*profile))).into_response()
        }
        AccessOutcome::CodeRequired(challenge) => {
            Json(ApiResponse::ok(SharedAccessResponse::challenge(challenge))).into_response()
        }
        AccessOutcome::InvalidCode => (
            StatusCode::UNAUTHORIZED,
            Json(ApiErrorResponse::new("invalid_code", "Invalid access code")),
        )
            .into_response(),
        AccessOutcome::Denied(reason) => denial_response(reason, disclose),
    }
}

fn denial_response(reason: DenialReason, disclose: bool) -> Response {
    let (status, message) = match (disclose, reason) {
        (false, _) | (true, DenialReason::NotFound) | (true, DenialReason::Expired) => {
            (StatusCode::NOT_FOUND, "This link is no longer valid")
        }
        (true, DenialReason::Revoked) => (StatusCode::GONE, "This link has been revoked"),
        (true, DenialReason::ViewLimitReached) => {
            (StatusCode::GONE, "This link has reached its view limit")
        }
    };
    let code = if disclose {
        reason.code()
    } else {
        DenialReason::NotFound.code()
    };
    (status, Json(ApiErrorResponse::new(code, message))).into_response()
}
