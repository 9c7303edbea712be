//! Owner-side share management: issuance, listing, and revocation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use livepet_core::config::share::ShareConfig;
use livepet_core::error::AppError;
use livepet_core::result::AppResult;
use livepet_core::types::{PageRequest, PageResponse, PetId, ShareId};
use livepet_database::{HealthStore, ShareStore};
use livepet_entity::access_log::AccessLogEntry;
use livepet_entity::health::{NewHealthRecord, SHARE_EVENT_RECORD_TYPE};
use livepet_entity::pet::PetProfile;
use livepet_entity::share::{
    CategoryVisibility, ExpirationWindow, NewShareGrant, ShareGrant, ShareState,
};

use super::link::LinkService;
use crate::context::RequestContext;
use crate::notification::{NotificationRelay, ShareEmail};

/// Owner request to share a pet's health profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareRequest {
    /// Where the link is sent.
    #[validate(email(message = "recipient_email must be a valid email address"))]
    pub recipient_email: String,
    /// Recipient display name.
    #[validate(length(max = 200))]
    pub recipient_name: Option<String>,
    /// Personal note included in the email and profile.
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    /// One of 1, 6, 12, 24, 48, 72, 168, 720.
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: u32,
    /// View cap; omit for unlimited.
    #[validate(range(min = 1, message = "max_views must be at least 1"))]
    pub max_views: Option<i32>,
    /// Whether recipients must enter a six-digit code.
    #[serde(default = "default_true")]
    pub require_access_code: bool,
    #[serde(default = "default_true")]
    pub allow_health_records: bool,
    #[serde(default = "default_true")]
    pub allow_vitals: bool,
    #[serde(default = "default_true")]
    pub allow_alerts: bool,
    #[serde(default = "default_true")]
    pub allow_documents: bool,
}

impl CreateShareRequest {
    /// A request with the default options for `recipient_email`.
    pub fn for_recipient(recipient_email: impl Into<String>) -> Self {
        Self {
            recipient_email: recipient_email.into(),
            recipient_name: None,
            message: None,
            expiration_hours: default_expiration_hours(),
            max_views: None,
            require_access_code: true,
            allow_health_records: true,
            allow_vitals: true,
            allow_alerts: true,
            allow_documents: true,
        }
    }

    fn visibility(&self) -> CategoryVisibility {
        CategoryVisibility {
            allow_health_records: self.allow_health_records,
            allow_vitals: self.allow_vitals,
            allow_alerts: self.allow_alerts,
            allow_documents: self.allow_documents,
        }
    }
}

/// Returned to the owner after issuance. The only place the access code is
/// ever shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedShare {
    pub share_id: ShareId,
    pub share_token: String,
    pub access_code: Option<String>,
    pub share_url: String,
    pub expires_at: DateTime<Utc>,
    /// `false` means the link exists but the email may not have been sent.
    pub email_sent: bool,
}

/// Owner view of a grant with its effective state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSummary {
    #[serde(flatten)]
    pub grant: ShareGrant,
    pub state: ShareState,
    pub requires_code: bool,
    pub remaining_views: Option<i32>,
    pub share_url: String,
}

/// Manages grant issuance, listing, and revocation for owners.
#[derive(Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    health: Arc<dyn HealthStore>,
    relay: Arc<dyn NotificationRelay>,
    links: LinkService,
    config: ShareConfig,
    relay_timeout: Duration,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService")
            .field("config", &self.config)
            .field("relay_timeout", &self.relay_timeout)
            .finish_non_exhaustive()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        health: Arc<dyn HealthStore>,
        relay: Arc<dyn NotificationRelay>,
        config: ShareConfig,
        relay_timeout: Duration,
    ) -> Self {
        Self {
            shares,
            health,
            relay,
            links: LinkService::new(),
            config,
            relay_timeout,
        }
    }

    /// Issue a grant for one of the owner's pets.
    ///
    /// Input is validated before the store is touched. The timeline record
    /// and the email are best effort: their failure never fails issuance.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        pet_id: PetId,
        req: CreateShareRequest,
    ) -> AppResult<CreatedShare> {
        let req = normalize(req);
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid share request: {e}")))?;
        let window = ExpirationWindow::try_from(req.expiration_hours).map_err(AppError::validation)?;

        let pet = self
            .health
            .find_owned_pet(pet_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pet not found"))?;

        let share_token = self.links.generate_token();
        let access_code = req
            .require_access_code
            .then(|| self.links.generate_access_code());
        let created_at = Utc::now();
        let expires_at = created_at + window.duration();

        let grant = self
            .shares
            .create_share(&NewShareGrant {
                share_token,
                user_id: ctx.user_id,
                pet_id,
                access_code,
                recipient_email: req.recipient_email.clone(),
                recipient_name: req.recipient_name.clone(),
                message: req.message.clone(),
                created_at,
                expires_at,
                max_views: req.max_views,
                visibility: req.visibility(),
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            pet_id = %pet_id,
            share_id = %grant.id,
            expiration_hours = window.hours(),
            max_views = ?grant.max_views,
            requires_code = grant.requires_code(),
            "Health profile share created"
        );

        let share_url = self.config.share_url(&grant.share_token);
        self.record_on_timeline(ctx, &pet, &grant, window).await;
        let email_sent = self.send_email(&pet, &grant, &share_url, window).await;

        Ok(CreatedShare {
            share_id: grant.id,
            share_token: grant.share_token,
            access_code: grant.access_code,
            share_url,
            expires_at: grant.expires_at,
            email_sent,
        })
    }

    /// The owner's grants, newest first.
    pub async fn list_shares(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<ShareSummary>> {
        let now = Utc::now();
        let page = self
            .shares
            .list_shares_by_owner(ctx.user_id, &page.normalized())
            .await?;
        Ok(page.map(|grant| self.summarize(grant, now)))
    }

    /// One of the owner's grants.
    pub async fn get_share(&self, ctx: &RequestContext, share_id: ShareId) -> AppResult<ShareSummary> {
        let grant = self.owned_grant(ctx, share_id).await?;
        Ok(self.summarize(grant, Utc::now()))
    }

    /// Revoke one of the owner's grants. Revoking twice is a no-op.
    pub async fn revoke(&self, ctx: &RequestContext, share_id: ShareId) -> AppResult<ShareSummary> {
        let now = Utc::now();
        let grant = self
            .shares
            .revoke_share(share_id, ctx.user_id, now)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        info!(user_id = %ctx.user_id, share_id = %share_id, "Health profile share revoked");
        Ok(self.summarize(grant, now))
    }

    /// Access log of one of the owner's grants, newest first.
    pub async fn access_logs(
        &self,
        ctx: &RequestContext,
        share_id: ShareId,
    ) -> AppResult<Vec<AccessLogEntry>> {
        let grant = self.owned_grant(ctx, share_id).await?;
        self.shares.list_access_logs(grant.id).await
    }

    async fn owned_grant(&self, ctx: &RequestContext, share_id: ShareId) -> AppResult<ShareGrant> {
        self.shares
            .find_share_by_id(share_id)
            .await?
            .filter(|g| g.user_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    fn summarize(&self, grant: ShareGrant, now: DateTime<Utc>) -> ShareSummary {
        ShareSummary {
            state: grant.state_at(now),
            requires_code: grant.requires_code(),
            remaining_views: grant.remaining_views(),
            share_url: self.config.share_url(&grant.share_token),
            grant,
        }
    }

    async fn record_on_timeline(
        &self,
        ctx: &RequestContext,
        pet: &PetProfile,
        grant: &ShareGrant,
        window: ExpirationWindow,
    ) {
        let record = NewHealthRecord {
            pet_id: pet.id,
            user_id: ctx.user_id,
            record_type: SHARE_EVENT_RECORD_TYPE.to_string(),
            title: "Health Profile Shared".to_string(),
            description: Some(match grant.recipient_name.as_deref() {
                Some(name) => format!("Health profile shared with {name} for {window}"),
                None => format!("Health profile shared for {window}"),
            }),
            date: grant.created_at.date_naive(),
            notes: Some(format!(
                "Expires {}. Access code {}.",
                grant.expires_at.format("%Y-%m-%d %H:%M UTC"),
                if grant.requires_code() { "required" } else { "not required" }
            )),
        };
        if let Err(e) = self.health.create_record(&record).await {
            warn!(share_id = %grant.id, pet_id = %pet.id, error = %e, "Failed to add share to health timeline");
        }
    }

    async fn send_email(
        &self,
        pet: &PetProfile,
        grant: &ShareGrant,
        share_url: &str,
        window: ExpirationWindow,
    ) -> bool {
        let email = ShareEmail {
            recipient_email: grant.recipient_email.clone(),
            recipient_name: grant.recipient_name.clone(),
            pet_name: pet.name.clone(),
            share_url: share_url.to_string(),
            access_code: grant.access_code.clone(),
            expiration_hours: window.hours(),
            expires_at: grant.expires_at,
            message: grant.message.clone(),
        };

        match tokio::time::timeout(self.relay_timeout, self.relay.send_share_email(&email)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(share_id = %grant.id, error = %e, "Share created but email was not sent");
                false
            }
            Err(_) => {
                warn!(share_id = %grant.id, timeout = ?self.relay_timeout, "Share email relay timed out");
                false
            }
        }
    }
}

/// Trim free text and drop empty optionals.
fn normalize(mut req: CreateShareRequest) -> CreateShareRequest {
    req.recipient_email = req.recipient_email.trim().to_string();
    req.recipient_name = non_empty(req.recipient_name);
    req.message = non_empty(req.message);
    req
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_expiration_hours() -> u32 {
    ExpirationWindow::default().hours()
}

fn default_true() -> bool {
    true
}
