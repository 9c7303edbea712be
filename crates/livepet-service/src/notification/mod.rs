//! Outbound share notifications.

pub mod http;
pub mod relay;
pub mod template;

pub use http::HttpEmailRelay;
pub use relay::{DisabledRelay, LogRelay, NotificationRelay, ShareEmail, build_relay};
pub use template::{RenderedEmail, render_share_email};
