//! Clients for the three upstream services the wizard depends on.
//!
//! - [`catalog`] - services/stylists reference data (read-only, cached)
//! - [`payments`] - payment-intent creation and the payment sub-state machine
//! - [`confirmation`] - the booking-confirmation endpoint and finalizer

pub mod catalog;
pub mod confirmation;
pub mod payments;

pub use catalog::{CatalogClient, CatalogError, Service, Stylist};
pub use confirmation::{ConfirmBookingRequest, ConfirmationClient, ConfirmationError};
pub use payments::{
    CreateIntentRequest, PaymentBridge, PaymentIntent, PaymentsClient, PaymentsError, SdkOutcome,
};
