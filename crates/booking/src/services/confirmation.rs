//! Booking-confirmation client.
//!
//! The scheduling backend owns durable appointment records; this client
//! submits the finished wizard to it. The route layer enforces the
//! single-in-flight rule and the distinction between a retryable cash
//! failure and the support-only failure after a successful charge.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use marigold_core::{AppointmentId, PaymentIntentId};

use crate::config::SchedulingConfig;

/// Errors that can occur when confirming a booking.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Request body for the confirmation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmBookingRequest {
    /// Present for online payments, `None` for cash bookings.
    pub payment_intent_id: Option<PaymentIntentId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub appointment_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The confirmed appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmedAppointment {
    pub id: AppointmentId,
    #[serde(default)]
    pub confirmation_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConfirmResponse {
    appointment: ConfirmedAppointment,
}

/// Client for the scheduling backend's confirmation endpoint.
#[derive(Clone)]
pub struct ConfirmationClient {
    inner: Arc<ConfirmationClientInner>,
}

struct ConfirmationClientInner {
    client: reqwest::Client,
    base_url: url::Url,
}

impl ConfirmationClient {
    /// Create a new confirmation client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SchedulingConfig) -> Result<Self, ConfirmationError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ConfirmationError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ConfirmationClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Submit the booking for confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails. Callers decide whether the
    /// failure is retryable - it is NOT when a charge already succeeded.
    #[instrument(skip(self, request), fields(customer = %request.customer_email))]
    pub async fn confirm(
        &self,
        request: &ConfirmBookingRequest,
    ) -> Result<ConfirmedAppointment, ConfirmationError> {
        let url = self
            .inner
            .base_url
            .join("appointments")
            .map_err(|e| ConfirmationError::Parse(format!("Invalid confirmation URL: {e}")))?;

        let response = self.inner.client.post(url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ConfirmationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ConfirmResponse = response
            .json()
            .await
            .map_err(|e| ConfirmationError::Parse(e.to_string()))?;
        Ok(parsed.appointment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_request_serializes_null_intent() {
        let request = ConfirmBookingRequest {
            payment_intent_id: None,
            customer_name: "Ada".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: "555-0101".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_time: "10:00".to_string(),
            end_time: "10:45".to_string(),
            notes: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json["payment_intent_id"].is_null());
        assert_eq!(json["start_time"], "10:00");
        // notes are omitted entirely rather than sent as null
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_confirmed_appointment_parses() {
        let parsed: ConfirmResponse =
            serde_json::from_str(r#"{"appointment":{"id":42,"confirmation_number":"MG-0042"}}"#)
                .unwrap();
        assert_eq!(parsed.appointment.id, AppointmentId::new(42));
        assert_eq!(
            parsed.appointment.confirmation_number.as_deref(),
            Some("MG-0042")
        );
    }
}
