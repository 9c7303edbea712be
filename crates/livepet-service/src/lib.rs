//! # livepet-service
//!
//! Business logic for health profile sharing. Services receive their
//! stores and relay through constructor injection as `Arc` trait objects.
//!
//! - `share::ShareService` issues, lists, and revokes grants for owners.
//! - `share::AccessService` is the anonymous recipient gateway.
//! - `notification` delivers the share email on a best-effort basis.

pub mod context;
pub mod notification;
pub mod share;

pub use context::{ClientInfo, RequestContext};
pub use notification::{NotificationRelay, ShareEmail};
pub use share::{AccessOutcome, AccessService, LinkService, ProfileLoader, ShareService};

#[cfg(test)]
mod testing;
