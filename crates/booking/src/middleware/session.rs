//! Session middleware configuration.
//!
//! Sessions use tower-sessions with the in-memory store: the booking
//! aggregate is deliberately ephemeral (durable records are created by
//! the confirmation endpoint, server-side), so nothing session-shaped
//! needs to outlive the process.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::BookingConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "mg_booking";

/// Session expiry in seconds. A booking that sat untouched for a day is
/// abandoned; the client simply starts over.
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer(config: &BookingConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Secure cookies when served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
