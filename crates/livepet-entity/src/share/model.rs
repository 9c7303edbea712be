//! Health profile share grant model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{PetId, ShareId, UserId};

/// Stored lifecycle status. Expiry is derived from `expires_at`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareStatus {
    /// The grant can be resolved.
    Active,
    /// Revoked by the owner. Terminal.
    Revoked,
}

/// Effective state of a grant at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareState {
    /// Resolvable.
    Active,
    /// Past `expires_at`, whatever the stored status.
    Expired,
    /// Revoked by the owner.
    Revoked,
    /// `views_count` reached `max_views`.
    Exhausted,
}

/// Which health categories a grant discloses. Pet identity is always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategoryVisibility {
    /// Health timeline records.
    pub allow_health_records: bool,
    /// Vital sign measurements.
    pub allow_vitals: bool,
    /// Active alerts and reminders.
    pub allow_alerts: bool,
    /// Uploaded documents.
    pub allow_documents: bool,
}

impl Default for CategoryVisibility {
    fn default() -> Self {
        Self {
            allow_health_records: true,
            allow_vitals: true,
            allow_alerts: true,
            allow_documents: true,
        }
    }
}

impl CategoryVisibility {
    /// A grant that shows only the pet's identity.
    pub fn none() -> Self {
        Self {
            allow_health_records: false,
            allow_vitals: false,
            allow_alerts: false,
            allow_documents: false,
        }
    }
}

/// A token-based grant disclosing part of one pet's health profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareGrant {
    /// Internal identifier.
    pub id: ShareId,
    /// Opaque URL token (64 lowercase hex chars).
    pub share_token: String,
    /// Owning user.
    pub user_id: UserId,
    /// Pet whose profile is shared.
    pub pet_id: PetId,
    /// Six-digit access code, when one is required.
    #[serde(skip_serializing)]
    pub access_code: Option<String>,
    /// Recipient address the link was sent to.
    pub recipient_email: String,
    /// Recipient display name.
    pub recipient_name: Option<String>,
    /// Personal note from the owner.
    pub message: Option<String>,
    /// Issuance time.
    pub created_at: DateTime<Utc>,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// View cap; `None` is unlimited.
    pub max_views: Option<i32>,
    /// Successful views so far.
    pub views_count: i32,
    /// Time of the most recent successful view.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// Stored lifecycle status.
    pub status: ShareStatus,
    /// Set once, on the first revocation.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Disclosed categories.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub visibility: CategoryVisibility,
}

impl ShareGrant {
    /// Whether `now` is past the expiry instant. The instant itself is still
    /// active, matching the conditional consume in the stores.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the grant has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.status == ShareStatus::Revoked
    }

    /// Whether the view cap has been reached.
    pub fn view_limit_reached(&self) -> bool {
        self.max_views.is_some_and(|max| self.views_count >= max)
    }

    /// Whether recipients must present an access code.
    pub fn requires_code(&self) -> bool {
        self.access_code.is_some()
    }

    /// Effective state, checked in order: expiry, revocation, view cap.
    pub fn state_at(&self, now: DateTime<Utc>) -> ShareState {
        if self.is_expired_at(now) {
            ShareState::Expired
        } else if self.is_revoked() {
            ShareState::Revoked
        } else if self.view_limit_reached() {
            ShareState::Exhausted
        } else {
            ShareState::Active
        }
    }

    /// Views left before the cap, `None` when unlimited.
    pub fn remaining_views(&self) -> Option<i32> {
        self.max_views
            .map(|max| (max - self.views_count).max(0))
    }
}

/// Data required to persist a new grant. New grants start active with zero views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareGrant {
    /// Opaque URL token.
    pub share_token: String,
    /// Owning user.
    pub user_id: UserId,
    /// Pet being shared.
    pub pet_id: PetId,
    /// Six-digit code, if any.
    #[serde(skip_serializing)]
    pub access_code: Option<String>,
    /// Recipient address.
    pub recipient_email: String,
    /// Recipient display name.
    pub recipient_name: Option<String>,
    /// Personal note.
    pub message: Option<String>,
    /// Issuance time.
    pub created_at: DateTime<Utc>,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// View cap.
    pub max_views: Option<i32>,
    /// Disclosed categories.
    pub visibility: CategoryVisibility,
}

impl NewShareGrant {
    /// Materialize the row a store would insert.
    pub fn into_grant(self, id: ShareId) -> ShareGrant {
        ShareGrant {
            id,
            share_token: self.share_token,
            user_id: self.user_id,
            pet_id: self.pet_id,
            access_code: self.access_code,
            recipient_email: self.recipient_email,
            recipient_name: self.recipient_name,
            message: self.message,
            created_at: self.created_at,
            expires_at: self.expires_at,
            max_views: self.max_views,
            views_count: 0,
            last_accessed_at: None,
            status: ShareStatus::Active,
            revoked_at: None,
            visibility: self.visibility,
        }
    }
}
