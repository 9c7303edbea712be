//! Anonymous recipient gateway: resolves tokens, checks access codes, and
//! hands out the filtered profile.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use livepet_core::result::AppResult;
use livepet_database::ShareStore;
use livepet_entity::access_log::{NewAccessLogEntry, SUMMARY_SECTION};
use livepet_entity::share::{ShareGrant, ShareState};

use super::link::LinkService;
use super::profile::{ProfileLoader, SharedProfile};
use crate::context::ClientInfo;

/// Why a token cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No grant has this token.
    NotFound,
    /// The grant is past its expiry.
    Expired,
    /// The owner revoked the grant.
    Revoked,
    /// Every allowed view has been used.
    ViewLimitReached,
}

impl DenialReason {
    /// Outcome code for this denial.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound | Self::Expired => "invalid_or_expired",
            Self::Revoked => "revoked",
            Self::ViewLimitReached => "view_limit_reached",
        }
    }
}

/// What a recipient sees before entering the access code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareChallenge {
    /// Recipient display name.
    pub recipient_name: Option<String>,
    /// Personal note from the owner.
    pub message: Option<String>,
    /// Hard expiry of the grant.
    pub expires_at: DateTime<Utc>,
}

/// Result of a gateway call.
#[derive(Debug, Clone)]
pub enum AccessOutcome {
    /// The token cannot be used.
    Denied(DenialReason),
    /// The grant is usable but needs its access code.
    CodeRequired(ShareChallenge),
    /// The supplied code did not match.
    InvalidCode,
    /// Access granted; one view was consumed.
    Granted(Box<SharedProfile>),
}

impl AccessOutcome {
    /// Logical outcome code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Denied(reason) => reason.code(),
            Self::CodeRequired(_) => "code_required",
            Self::InvalidCode => "invalid_code",
            Self::Granted(_) => "ok",
        }
    }
}

/// Gateway for share links. Never grants access on a store error.
#[derive(Clone)]
pub struct AccessService {
    shares: Arc<dyn ShareStore>,
    profiles: ProfileLoader,
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService")
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(shares: Arc<dyn ShareStore>, profiles: ProfileLoader) -> Self {
        Self { shares, profiles }
    }

    /// First contact with a link.
    ///
    /// Grants without an access code are verified immediately, which
    /// consumes a view.
    pub async fn resolve_share(&self, token: &str, client: &ClientInfo) -> AppResult<AccessOutcome> {
        let now = Utc::now();
        let grant = match self.usable_grant(token, now).await? {
            Ok(grant) => grant,
            Err(reason) => return Ok(AccessOutcome::Denied(reason)),
        };

        if grant.requires_code() {
            return Ok(AccessOutcome::CodeRequired(ShareChallenge {
                recipient_name: grant.recipient_name,
                message: grant.message,
                expires_at: grant.expires_at,
            }));
        }

        self.grant_view(&grant, client, now).await
    }

    /// Check a recipient-supplied access code and, on a match, consume a
    /// view and return the profile.
    pub async fn verify_code(
        &self,
        token: &str,
        code: &str,
        client: &ClientInfo,
    ) -> AppResult<AccessOutcome> {
        let now = Utc::now();
        let grant = match self.usable_grant(token, now).await? {
            Ok(grant) => grant,
            Err(reason) => return Ok(AccessOutcome::Denied(reason)),
        };

        if let Some(expected) = grant.access_code.as_deref() {
            if !LinkService::codes_match(expected, code) {
                warn!(share_id = %grant.id, "Share access code mismatch");
                self.log_attempt(&grant, false, client, now).await;
                return Ok(AccessOutcome::InvalidCode);
            }
        }

        self.grant_view(&grant, client, now).await
    }

    /// Look the token up and run the gates in order: existence, expiry,
    /// revocation, view cap.
    async fn usable_grant(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Result<ShareGrant, DenialReason>> {
        if !LinkService::is_well_formed_token(token) {
            return Ok(Err(DenialReason::NotFound));
        }
        let Some(grant) = self.shares.find_share_by_token(token).await? else {
            return Ok(Err(DenialReason::NotFound));
        };
        Ok(match grant.state_at(now) {
            ShareState::Active => Ok(grant),
            ShareState::Expired => Err(DenialReason::Expired),
            ShareState::Revoked => Err(DenialReason::Revoked),
            ShareState::Exhausted => Err(DenialReason::ViewLimitReached),
        })
    }

    async fn grant_view(
        &self,
        grant: &ShareGrant,
        client: &ClientInfo,
        now: DateTime<Utc>,
    ) -> AppResult<AccessOutcome> {
        // Another request may have used the last view since the gates ran.
        let Some(consumed) = self.shares.consume_view(grant.id, now).await? else {
            let current = self.shares.find_share_by_id(grant.id).await?;
            let reason = match current.map(|g| g.state_at(now)) {
                None => DenialReason::NotFound,
                Some(ShareState::Expired) => DenialReason::Expired,
                Some(ShareState::Revoked) => DenialReason::Revoked,
                Some(_) => DenialReason::ViewLimitReached,
            };
            info!(share_id = %grant.id, reason = reason.code(), "Share view refused at consume");
            return Ok(AccessOutcome::Denied(reason));
        };

        self.log_attempt(&consumed, true, client, now).await;
        info!(
            share_id = %consumed.id,
            pet_id = %consumed.pet_id,
            views_count = consumed.views_count,
            "Shared health profile viewed"
        );

        let profile = self.profiles.load_profile(&consumed).await?;
        Ok(AccessOutcome::Granted(Box::new(profile)))
    }

    async fn log_attempt(
        &self,
        grant: &ShareGrant,
        success: bool,
        client: &ClientInfo,
        now: DateTime<Utc>,
    ) {
        let entry = NewAccessLogEntry {
            share_id: grant.id,
            viewed_section: SUMMARY_SECTION.to_string(),
            success,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            accessed_at: now,
        };
        if let Err(e) = self.shares.append_access_log(&entry).await {
            warn!(share_id = %grant.id, success, error = %e, "Failed to write share access log");
        }
    }
}
