//! Share grant entities.

pub mod model;
pub mod window;

pub use model::{CategoryVisibility, NewShareGrant, ShareGrant, ShareState, ShareStatus};
pub use window::ExpirationWindow;
