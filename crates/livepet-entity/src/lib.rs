//! # livepet-entity
//!
//! Domain entity models for the Livepet health share service. Every struct
//! in this crate is a database row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod access_log;
pub mod health;
pub mod pet;
pub mod share;
