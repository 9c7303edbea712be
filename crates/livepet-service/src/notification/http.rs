//! Relay for Resend-compatible HTTP email APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use livepet_core::config::notification::NotificationConfig;
use livepet_core::error::{AppError, ErrorKind};
use livepet_core::result::AppResult;

use super::relay::{NotificationRelay, ShareEmail};
use super::template::render_share_email;

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends share emails with a single bounded POST and no retry.
#[derive(Clone)]
pub struct HttpEmailRelay {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl std::fmt::Debug for HttpEmailRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmailRelay")
            .field("api_url", &self.api_url)
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

impl HttpEmailRelay {
    /// Build the relay and its HTTP client.
    pub fn new(config: &NotificationConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build email HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl NotificationRelay for HttpEmailRelay {
    async fn send_share_email(&self, email: &ShareEmail) -> AppResult<()> {
        let rendered = render_share_email(email);
        let body = SendEmailBody {
            from: &self.from_address,
            to: &email.recipient_email,
            subject: &rendered.subject,
            html: &rendered.html,
            text: &rendered.text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Email API request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, detail = %detail, "Email API rejected share email");
            return Err(AppError::external_service(format!(
                "Email API returned {status}"
            )));
        }

        debug!(to = %email.recipient_email, "Share email accepted by email API");
        Ok(())
    }
}
