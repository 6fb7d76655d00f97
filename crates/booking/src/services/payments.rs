//! Payment provider client and the payment sub-state machine.
//!
//! The provider's browser SDK owns card collection and PCI scope. This
//! module owns everything around it: creating the payment intent
//! server-side, holding the per-session intent so it is never silently
//! recreated, and mapping the SDK's reported outcome onto the booking's
//! `payment_status`.
//!
//! SDK outcomes arrive as an explicit tagged value posted by the browser,
//! not a callback, so the retry logic stays linear and testable.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};

use marigold_core::{PaymentIntentId, PaymentStatus, ServiceId, WizardController};

use crate::config::PaymentsConfig;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An intent creation request is already running for this session.
    #[error("intent creation already in flight")]
    CreateInFlight,

    /// The session already holds a usable intent.
    #[error("intent already created")]
    AlreadyCreated,
}

/// Request body for intent creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIntentRequest {
    pub service_id: ServiceId,
    pub customer_email: String,
    pub customer_name: String,
    pub tip_percentage: u8,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Secret handed to the browser SDK to drive confirmation.
    pub client_secret: String,
    /// Charge amount in the currency's minor unit.
    pub amount: i64,
    pub payment_intent_id: PaymentIntentId,
}

/// Outcome the browser SDK reported after attempting confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SdkOutcome {
    /// The charge went through.
    Succeeded { id: PaymentIntentId },
    /// The provider is still working; the client should wait.
    Processing,
    /// Decline or similar; `message` is the provider's user-facing text.
    Failed { message: String },
}

/// Client for the payment provider's server-side API.
#[derive(Clone)]
pub struct PaymentsClient {
    inner: Arc<PaymentsClientInner>,
}

struct PaymentsClientInner {
    client: reqwest::Client,
    base_url: url::Url,
}

impl PaymentsClient {
    /// Create a new payments client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentsConfig) -> Result<Self, PaymentsError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| PaymentsError::Parse(format!("Invalid secret key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(PaymentsClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Create a payment intent for the selected service.
    ///
    /// No charge happens here; the intent is only confirmed later by the
    /// browser SDK. Safe to retry after a failure.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, request), fields(service_id = %request.service_id))]
    pub async fn create_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> Result<PaymentIntent, PaymentsError> {
        let url = self
            .inner
            .base_url
            .join("payment-intents")
            .map_err(|e| PaymentsError::Parse(format!("Invalid payments URL: {e}")))?;

        let response = self.inner.client.post(url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PaymentsError::Parse(e.to_string()))
    }
}

/// Per-session payment sub-state.
///
/// Lives inside the session-stored wizard aggregate. The intent is created
/// at most once per booking session: `begin_create` refuses while a
/// creation is running or an intent already exists, and only
/// `fail_create` re-opens the door. An SDK-level decline does NOT discard
/// the intent - retrying a declined card reuses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBridge {
    intent: Option<PaymentIntent>,
    last_error: Option<String>,
    create_in_flight: bool,
}

impl PaymentBridge {
    /// The created intent, if any.
    #[must_use]
    pub const fn intent(&self) -> Option<&PaymentIntent> {
        self.intent.as_ref()
    }

    /// The provider's message for the last failed confirmation attempt.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether an intent creation request is currently running.
    #[must_use]
    pub const fn create_in_flight(&self) -> bool {
        self.create_in_flight
    }

    /// Claim the right to create the intent.
    ///
    /// The caller must persist the session between this and the network
    /// call so duplicate submits observe the claim.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsError::AlreadyCreated`] when an intent exists and
    /// [`PaymentsError::CreateInFlight`] when a creation is running.
    pub fn begin_create(&mut self) -> Result<(), PaymentsError> {
        if self.intent.is_some() {
            return Err(PaymentsError::AlreadyCreated);
        }
        if self.create_in_flight {
            return Err(PaymentsError::CreateInFlight);
        }
        self.create_in_flight = true;
        Ok(())
    }

    /// Record a successfully created intent and release the claim.
    pub fn complete_create(&mut self, intent: PaymentIntent, wizard: &mut WizardController) {
        wizard.record_intent(intent.payment_intent_id.clone());
        self.intent = Some(intent);
        self.create_in_flight = false;
    }

    /// Release the claim after a failed creation so the client can retry.
    pub fn fail_create(&mut self) {
        self.create_in_flight = false;
    }

    /// Map an SDK-reported outcome onto the booking's payment status.
    ///
    /// Returns the resulting local status. `Completed` here is still only
    /// the local, provider-side half; the booking is not done until the
    /// finalizer confirms it.
    pub fn apply_outcome(&mut self, outcome: SdkOutcome, wizard: &mut WizardController) -> PaymentStatus {
        match outcome {
            SdkOutcome::Processing => {
                wizard.set_payment_status(PaymentStatus::Processing);
                PaymentStatus::Processing
            }
            SdkOutcome::Failed { message } => {
                warn!(error = %message, "Payment confirmation failed");
                self.last_error = Some(message);
                wizard.set_payment_status(PaymentStatus::Failed);
                PaymentStatus::Failed
            }
            SdkOutcome::Succeeded { id } => {
                // the SDK echoes the intent id; keep it for support reference
                wizard.record_intent(id);
                self.last_error = None;
                wizard.set_payment_status(PaymentStatus::Completed);
                PaymentStatus::Completed
            }
        }
    }

    /// Reset a failed attempt so the payment form re-enables. Keeps the
    /// intent; a new one is only needed if the provider expired it.
    pub fn reset_for_retry(&mut self, wizard: &mut WizardController) {
        self.last_error = None;
        wizard.clear_payment_status();
    }
}
