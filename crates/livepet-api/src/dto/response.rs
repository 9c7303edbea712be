//! Response DTOs.

use serde::{Deserialize, Serialize};

use livepet_service::share::{ShareChallenge, SharedProfile};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Whether the backing store answered.
    pub store_reachable: bool,
}

/// Answer of the public share routes when the link is usable.
///
/// `status` is `code_required` together with `challenge`, or `ok` together
/// with `profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedAccessResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ShareChallenge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<SharedProfile>,
}

impl SharedAccessResponse {
    /// The link needs its access code.
    pub fn challenge(challenge: ShareChallenge) -> Self {
        Self {
            status: "code_required".to_string(),
            challenge: Some(challenge),
            profile: None,
        }
    }

    /// Access granted.
    pub fn granted(profile: SharedProfile) -> Self {
        Self {
            status: "ok".to_string(),
            challenge: None,
            profile: Some(profile),
        }
    }
}
