//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::AuthUser;
pub use client::Recipient;
pub use json::ApiJson;
pub use pagination::PaginationParams;
