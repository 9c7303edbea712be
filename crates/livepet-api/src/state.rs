//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::{Duration, Instant};

use livepet_auth::JwtDecoder;
use livepet_core::config::AppConfig;
use livepet_database::Stores;
use livepet_service::notification::NotificationRelay;
use livepet_service::{AccessService, ProfileLoader, ShareService};

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Share and health stores
    pub stores: Stores,
    /// Bearer token validation for owner routes
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Owner share management
    pub share_service: Arc<ShareService>,
    /// Public share gateway
    pub access_service: Arc<AccessService>,
    /// Throttle for the public share routes, absent when disabled
    pub rate_limiter: Option<RateLimiter>,
    /// Throttle for code attempts against one share token
    pub code_attempt_limiter: Option<RateLimiter>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wires the services over already opened stores and relay.
    pub fn new(config: AppConfig, stores: Stores, relay: Arc<dyn NotificationRelay>) -> Self {
        let relay_timeout = Duration::from_secs(config.notification.timeout_seconds);

        let share_service = ShareService::new(
            Arc::clone(&stores.shares),
            Arc::clone(&stores.health),
            relay,
            config.share.clone(),
            relay_timeout,
        );
        let profiles = ProfileLoader::new(Arc::clone(&stores.health), &config.share);
        let access_service = AccessService::new(Arc::clone(&stores.shares), profiles);

        let rate_limiter = config.rate_limit.enabled.then(|| {
            RateLimiter::new(
                config.rate_limit.burst,
                f64::from(config.rate_limit.requests_per_minute) / 60.0,
            )
        });
        let code_attempt_limiter = config.rate_limit.enabled.then(|| {
            RateLimiter::new(
                config.rate_limit.code_attempts_per_token,
                f64::from(config.rate_limit.code_attempts_per_minute) / 60.0,
            )
        });

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            share_service: Arc::new(share_service),
            access_service: Arc::new(access_service),
            rate_limiter,
            code_attempt_limiter,
            stores,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
