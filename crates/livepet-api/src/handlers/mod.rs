//! HTTP request handlers.

pub mod health;
pub mod share;
pub mod shared;
