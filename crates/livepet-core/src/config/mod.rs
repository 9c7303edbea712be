//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay and `LIVEPET__*`
//! environment variables. Each sub-module is one configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod notification;
pub mod rate_limit;
pub mod share;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::notification::NotificationConfig;
use self::rate_limit::RateLimitConfig;
use self::share::ShareConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Data store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Owner authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Share issuance and gateway settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Outbound email relay settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Public share route throttling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `LIVEPET__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LIVEPET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject combinations that would only fail later at runtime.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == database::StoreProvider::Postgres
            && self.database.url.trim().is_empty()
        {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.notification.provider == notification::RelayProvider::Http
            && self.notification.api_key.trim().is_empty()
        {
            return Err(AppError::configuration(
                "notification.api_key is required when notification.provider = \"http\"",
            ));
        }
        if self.share.public_origin.ends_with('/') {
            return Err(AppError::configuration(
                "share.public_origin must not end with '/'",
            ));
        }
        Ok(())
    }
}
