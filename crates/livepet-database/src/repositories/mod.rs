//! PostgreSQL implementations of the store traits.

pub mod health;
pub mod share;

pub use health::HealthRepository;
pub use share::ShareRepository;
