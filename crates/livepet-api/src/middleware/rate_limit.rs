//! Token bucket rate limiter for the public share routes.
//!
//! Access codes are six digits, so each client gets a small burst and a slow
//! refill. Code verification is also throttled per share token, so one link
//! cannot be guessed at from many addresses. Exhausted buckets answer
//! `429 Too Many Requests`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tracing::warn;

use livepet_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::client::client_ip;
use crate::state::AppState;

/// Buckets kept before idle ones are swept.
const SWEEP_THRESHOLD: usize = 10_000;

/// Simple in-memory token bucket rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Client key → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens: max_tokens.max(1),
            refill_rate,
        }
    }

    /// Attempts to consume a token for the given key.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        let capacity = f64::from(self.max_tokens);

        if buckets.len() >= SWEEP_THRESHOLD {
            let refill_rate = self.refill_rate;
            buckets.retain(|_, b| {
                b.tokens + now.duration_since(b.last_refill).as_secs_f64() * refill_rate < capacity
            });
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Middleware applied to the public share routes, keyed on the client.
pub async fn share_rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(request).await;
    };

    let key = client_ip(
        request.headers(),
        request.extensions(),
        state.config.rate_limit.trust_forwarded_for,
    )
    .unwrap_or_else(|| "unknown".to_string());
    if !limiter.check(&key).await {
        warn!(client = %key, "Public share rate limit exceeded");
        return throttled();
    }

    next.run(request).await
}

/// Middleware applied to code verification, keyed on the share token.
pub async fn code_attempt_rate_limit(
    State(state): State<AppState>,
    Path(token): Path<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.code_attempt_limiter.as_ref() else {
        return next.run(request).await;
    };

    if !limiter.check(&token).await {
        warn!("Code attempts for one share link exceeded");
        return throttled();
    }

    next.run(request).await
}

fn throttled() -> Response {
    ApiError(AppError::rate_limit(
        "Too many attempts. Please wait a moment and try again.",
    ))
    .into_response()
}
