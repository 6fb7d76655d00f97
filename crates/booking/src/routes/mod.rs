//! HTTP route handlers for the booking service.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                        - Liveness check
//! GET   /health/ready                  - Readiness (probes the scheduling backend)
//!
//! # Catalog (reference data)
//! GET   /api/services                  - Bookable services
//! GET   /api/stylists                  - Bookable stylists (may be empty)
//!
//! # Booking wizard
//! POST  /api/booking                   - Start a fresh booking session
//! GET   /api/booking                   - Current wizard snapshot
//! PATCH /api/booking/data              - Merge a partial edit into the booking
//! POST  /api/booking/next              - Advance (gated; silent no-op when blocked)
//! POST  /api/booking/previous          - Step back
//! POST  /api/booking/jump              - Jump via the step indicator
//! POST  /api/booking/finalize          - Confirm the booking (cash, or paid online)
//!
//! # Payment sub-flow (online path only)
//! POST  /api/booking/payment/intent    - Create the payment intent (idempotent)
//! POST  /api/booking/payment/outcome   - Record the browser SDK's outcome
//! POST  /api/booking/payment/retry     - Reset a failed attempt
//! ```

pub mod catalog;
pub mod finalize;
pub mod payment;
pub mod wizard;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(catalog::services))
        .route("/stylists", get(catalog::stylists))
}

/// Create the booking wizard routes router.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(wizard::start).get(wizard::show))
        .route("/data", patch(wizard::update_data))
        .route("/next", post(wizard::next))
        .route("/previous", post(wizard::previous))
        .route("/jump", post(wizard::jump))
        .route("/finalize", post(finalize::finalize))
        .route("/payment/intent", post(payment::create_intent))
        .route("/payment/outcome", post(payment::submit_outcome))
        .route("/payment/retry", post(payment::retry))
}

/// Create all routes for the booking service.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(catalog_routes())
            .nest("/booking", booking_routes()),
    )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the scheduling backend answers before returning OK; without
/// it the wizard cannot even start. Returns 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_reachable().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
