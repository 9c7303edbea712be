//! Typed path parameter helpers.

use std::str::FromStr;

use livepet_core::error::AppError;

/// Parses a typed ID from a path segment.
pub fn parse_id<T: FromStr>(s: &str) -> Result<T, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid id: {s}")))
}
