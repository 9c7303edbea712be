//! # livepet-api
//!
//! HTTP surface of the share service. Owner routes take a bearer token;
//! the public share routes are anonymous and rate limited per client.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
