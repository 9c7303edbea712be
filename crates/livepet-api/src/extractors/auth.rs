//! `AuthUser` extractor: pulls the owner's bearer token from the
//! Authorization header, validates it, and injects a request context.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use livepet_core::error::AppError;
use livepet_service::RequestContext;

use super::client::{client_ip, user_agent};
use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated owner context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(token)?;

        let ctx = RequestContext::new(
            claims.user_id(),
            claims.email,
            client_ip(
                &parts.headers,
                &parts.extensions,
                state.config.rate_limit.trust_forwarded_for,
            ),
            user_agent(&parts.headers),
        );

        Ok(AuthUser(ctx))
    }
}
