//! Request context for owners and client details for anonymous recipients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livepet_core::types::UserId;

/// Context for an authenticated owner request.
///
/// Built by the API layer from the bearer token and passed explicitly into
/// every owner operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated owner.
    pub user_id: UserId,
    /// The owner's email, from the token.
    pub email: String,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: UserId,
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            email,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }
}

/// What is known about an anonymous recipient's client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}
