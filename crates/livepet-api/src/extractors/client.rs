//! Client address and user agent of an incoming request.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, header};

use livepet_service::ClientInfo;

use crate::error::ApiError;
use crate::state::AppState;

/// Socket peer of the request. When `trust_forwarded_for` is set the first
/// `X-Forwarded-For` hop wins, since the peer is then the proxy.
pub fn client_ip(
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_forwarded_for: bool,
) -> Option<String> {
    let forwarded = trust_forwarded_for
        .then(|| forwarded_for(headers))
        .flatten();

    forwarded.or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// `User-Agent` header value.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Anonymous recipient of a share link.
#[derive(Debug, Clone)]
pub struct Recipient(pub ClientInfo);

impl FromRequestParts<AppState> for Recipient {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let trust = state.config.rate_limit.trust_forwarded_for;
        Ok(Recipient(ClientInfo {
            ip_address: client_ip(&parts.headers, &parts.extensions, trust),
            user_agent: user_agent(&parts.headers),
        }))
    }
}
