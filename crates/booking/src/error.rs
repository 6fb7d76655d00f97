//! Unified error handling with Sentry integration.
//!
//! Every route handler returns `Result<T, AppError>`. Server-class errors
//! are captured to Sentry before the response is built; clients get a JSON
//! body with a stable `code` and a safe message.
//!
//! Note what is NOT here: a blocked `next()` is a silent no-op by
//! contract, never an error - the snapshot simply comes back unchanged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use marigold_core::PaymentIntentId;

use crate::services::{CatalogError, ConfirmationError, PaymentsError};

/// Application-level error type for the booking service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Services/stylists reference data could not be loaded. Retryable;
    /// blocks the first step until it resolves.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Payment-intent creation failed. No charge has occurred; fully safe
    /// to retry.
    #[error("Payments error: {0}")]
    Payments(#[from] PaymentsError),

    /// The confirmation endpoint failed for an unpaid (cash) booking.
    /// Retryable.
    #[error("Confirmation error: {0}")]
    Confirmation(#[from] ConfirmationError),

    /// The confirmation endpoint failed AFTER a successful charge. Money
    /// has moved but the booking is unconfirmed - never auto-retried,
    /// the client is told to contact support with the intent id.
    #[error("Booking confirmation failed after successful payment")]
    SupportNeeded {
        payment_intent_id: Option<PaymentIntentId>,
    },

    /// No booking wizard in this session.
    #[error("No booking in progress")]
    NoActiveBooking,

    /// The requested operation does not fit the wizard's current state.
    #[error("Wrong step: {0}")]
    WrongStep(String),

    /// A finalize call is already running for this booking.
    #[error("Confirmation already in progress")]
    FinalizeInFlight,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Session(e.to_string())
    }
}

/// Wire shape for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    /// Support reference for post-payment confirmation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_intent_id: Option<PaymentIntentId>,
}

impl AppError {
    const fn code(&self) -> &'static str {
        match self {
            Self::Catalog(_) => "catalog_unavailable",
            Self::Payments(PaymentsError::CreateInFlight | PaymentsError::AlreadyCreated) => {
                "intent_conflict"
            }
            Self::Payments(_) => "payment_intent_failed",
            Self::Confirmation(_) => "confirmation_failed",
            Self::SupportNeeded { .. } => "support_needed",
            Self::NoActiveBooking => "no_active_booking",
            Self::WrongStep(_) => "wrong_step",
            Self::FinalizeInFlight => "finalize_in_flight",
            Self::BadRequest(_) => "bad_request",
            Self::Session(_) | Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture anything that indicates a broken dependency or bug.
        // SupportNeeded is the loudest: money moved without a booking.
        let guard_conflict = matches!(
            self,
            Self::Payments(PaymentsError::CreateInFlight | PaymentsError::AlreadyCreated)
        );
        if !guard_conflict
            && matches!(
                self,
                Self::Catalog(_)
                    | Self::Payments(_)
                    | Self::Confirmation(_)
                    | Self::SupportNeeded { .. }
                    | Self::Session(_)
                    | Self::Internal(_)
            )
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Payments(PaymentsError::CreateInFlight | PaymentsError::AlreadyCreated) => {
                StatusCode::CONFLICT
            }
            Self::Catalog(_) | Self::Payments(_) | Self::Confirmation(_) => StatusCode::BAD_GATEWAY,
            Self::SupportNeeded { .. } | Self::WrongStep(_) | Self::FinalizeInFlight => {
                StatusCode::CONFLICT
            }
            Self::NoActiveBooking => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose upstream error details to clients
        let message = match &self {
            Self::Catalog(_) => "Could not load booking options, please retry".to_string(),
            Self::Payments(PaymentsError::CreateInFlight | PaymentsError::AlreadyCreated) => {
                self.to_string()
            }
            Self::Payments(_) => "Could not start the payment, please retry".to_string(),
            Self::Confirmation(_) => "Could not confirm the booking, please retry".to_string(),
            Self::SupportNeeded { payment_intent_id } => {
                let reference = payment_intent_id
                    .as_ref()
                    .map_or_else(String::new, |id| format!(" (reference {id})"));
                format!(
                    "Your payment went through but we could not confirm the booking. \
                     Please contact us{reference} - do not pay again."
                )
            }
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let code = self.code();
        let payment_intent_id = match self {
            Self::SupportNeeded { payment_intent_id } => payment_intent_id,
            _ => None,
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                code,
                payment_intent_id,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NoActiveBooking;
        assert_eq!(err.to_string(), "No booking in progress");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::NoActiveBooking), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::WrongStep("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(get_status(AppError::FinalizeInFlight), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_support_needed_is_conflict_with_reference() {
        let err = AppError::SupportNeeded {
            payment_intent_id: Some(PaymentIntentId::new("pi_1")),
        };
        assert_eq!(err.code(), "support_needed");
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_retryable_upstream_failures_are_bad_gateway() {
        let err = AppError::Catalog(CatalogError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }
}
