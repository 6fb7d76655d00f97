//! Marigold Booking library.
//!
//! This crate provides the booking service as a library, allowing the
//! full router to be exercised by the integration tests exactly as the
//! binary serves it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Assemble the full application router, session layer included.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::readiness))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
