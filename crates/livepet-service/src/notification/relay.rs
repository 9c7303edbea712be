//! Notification relay seam and the non-HTTP relays.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use livepet_core::config::notification::{NotificationConfig, RelayProvider};
use livepet_core::error::AppError;
use livepet_core::result::AppResult;

use super::http::HttpEmailRelay;
use super::template::render_share_email;

/// Everything needed to tell a recipient about a new share.
#[derive(Clone)]
pub struct ShareEmail {
    /// Recipient address.
    pub recipient_email: String,
    /// Recipient display name.
    pub recipient_name: Option<String>,
    /// Name of the shared pet.
    pub pet_name: String,
    /// Link the recipient opens.
    pub share_url: String,
    /// Access code, when the grant requires one.
    pub access_code: Option<String>,
    /// Lifetime of the grant in hours.
    pub expiration_hours: u32,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Personal note from the owner.
    pub message: Option<String>,
}

impl fmt::Debug for ShareEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareEmail")
            .field("recipient_email", &self.recipient_email)
            .field("pet_name", &self.pet_name)
            .field("has_access_code", &self.access_code.is_some())
            .field("expiration_hours", &self.expiration_hours)
            .finish_non_exhaustive()
    }
}

/// Delivers share emails. Callers treat every error as non-fatal.
#[async_trait]
pub trait NotificationRelay: Send + Sync + 'static {
    /// Send the share email for a newly issued grant.
    async fn send_share_email(&self, email: &ShareEmail) -> AppResult<()>;
}

/// Writes the email envelope to the log instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogRelay;

#[async_trait]
impl NotificationRelay for LogRelay {
    async fn send_share_email(&self, email: &ShareEmail) -> AppResult<()> {
        let rendered = render_share_email(email);
        info!(
            to = %email.recipient_email,
            subject = %rendered.subject,
            expiration_hours = email.expiration_hours,
            has_access_code = email.access_code.is_some(),
            "Email relay not configured; share email queued to log"
        );
        Ok(())
    }
}

/// Refuses every send.
#[derive(Debug, Clone, Default)]
pub struct DisabledRelay;

#[async_trait]
impl NotificationRelay for DisabledRelay {
    async fn send_share_email(&self, _email: &ShareEmail) -> AppResult<()> {
        Err(AppError::service_unavailable("Email delivery is disabled"))
    }
}

/// Build the relay selected by `notification.provider`.
pub fn build_relay(config: &NotificationConfig) -> AppResult<Arc<dyn NotificationRelay>> {
    let relay: Arc<dyn NotificationRelay> = match config.provider {
        RelayProvider::Http => Arc::new(HttpEmailRelay::new(config)?),
        RelayProvider::Log => Arc::new(LogRelay),
        RelayProvider::Disabled => Arc::new(DisabledRelay),
    };
    info!(provider = ?config.provider, "Notification relay ready");
    Ok(relay)
}
