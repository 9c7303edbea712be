//! Route definitions for the Livepet share API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with all routes and per-route middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(owner_share_routes())
        .merge(public_share_routes(state.clone()));

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Owner endpoints; every handler takes an `AuthUser`.
fn owner_share_routes() -> Router<AppState> {
    Router::new()
        .route("/pets/{pet_id}/shares", post(handlers::share::create_share))
        .route("/shares", get(handlers::share::list_shares))
        .route("/shares/{id}", get(handlers::share::get_share))
        .route("/shares/{id}/revoke", post(handlers::share::revoke_share))
        .route("/shares/{id}/access-logs", get(handlers::share::access_logs))
}

/// Anonymous recipient endpoints, rate limited per client and, for code
/// verification, per share token.
fn public_share_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/shared/health/{token}", get(handlers::shared::resolve_share))
        .route(
            "/shared/health/{token}/verify",
            post(handlers::shared::verify_code).route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                middleware::rate_limit::code_attempt_rate_limit,
            )),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::rate_limit::share_rate_limit,
        ))
}
