//! Health profile sharing: issuance, gateway, and revocation.

pub mod access;
pub mod link;
pub mod profile;
pub mod service;

pub use access::{AccessOutcome, AccessService, DenialReason, ShareChallenge};
pub use link::LinkService;
pub use profile::{GrantMetadata, ProfileLoader, SharedProfile};
pub use service::{CreateShareRequest, CreatedShare, ShareService, ShareSummary};

#[cfg(test)]
mod scenarios;
