//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::BookingConfig;
use crate::services::{CatalogClient, ConfirmationClient, PaymentsClient};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Catalog(#[from] crate::services::CatalogError),
    #[error("payments client: {0}")]
    Payments(#[from] crate::services::PaymentsError),
    #[error("confirmation client: {0}")]
    Confirmation(#[from] crate::services::ConfirmationError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the three
/// upstream clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BookingConfig,
    catalog: CatalogClient,
    payments: PaymentsClient,
    confirmations: ConfirmationClient,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any upstream client fails to build (e.g. a
    /// malformed API key).
    pub fn new(config: BookingConfig) -> Result<Self, StateError> {
        let catalog = CatalogClient::new(&config.scheduling)?;
        let payments = PaymentsClient::new(&config.payments)?;
        let confirmations = ConfirmationClient::new(&config.scheduling)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                payments,
                confirmations,
            }),
        })
    }

    /// Get a reference to the booking configuration.
    #[must_use]
    pub fn config(&self) -> &BookingConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the payments client.
    #[must_use]
    pub fn payments(&self) -> &PaymentsClient {
        &self.inner.payments
    }

    /// Get a reference to the confirmation client.
    #[must_use]
    pub fn confirmations(&self) -> &ConfirmationClient {
        &self.inner.confirmations
    }
}
