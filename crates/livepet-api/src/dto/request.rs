//! Request DTOs.

use serde::{Deserialize, Serialize};

pub use livepet_service::share::CreateShareRequest;

/// Access code entered by a recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    /// The six-digit code from the share email.
    pub code: String,
}
