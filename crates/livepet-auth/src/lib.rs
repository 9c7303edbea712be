//! # livepet-auth
//!
//! Identity provider for owner-facing routes. Owners present an HS256 bearer
//! token; recipients of a share link are never authenticated principals.
//!
//! ## Modules
//!
//! - `jwt`: token claims, signing, and validation

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
