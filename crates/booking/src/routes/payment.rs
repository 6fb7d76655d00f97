//! Payment sub-flow handlers.
//!
//! The browser collects card details with the provider's own SDK; this
//! module only creates the intent server-side, receives the SDK's
//! reported outcome, and manages retries. The intent is created at most
//! once per booking session - duplicate requests get the existing intent
//! back rather than a second charge object.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marigold_core::{PaymentIntentId, PaymentMethod, PaymentStatus};

use crate::error::{AppError, Result};
use crate::routes::finalize::perform_finalize;
use crate::routes::wizard::{WizardSnapshot, load_wizard, save_wizard};
use crate::services::catalog::CatalogError;
use crate::services::{CreateIntentRequest, SdkOutcome};
use crate::state::AppState;

/// Request body for intent creation.
#[derive(Debug, Default, Deserialize)]
pub struct IntentRequestBody {
    /// Optional tip, as a whole percentage of the service price.
    #[serde(default)]
    pub tip_percentage: Option<u8>,
}

/// Response for a created (or re-fetched) intent.
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub client_secret: String,
    pub amount: i64,
    pub payment_intent_id: PaymentIntentId,
    /// Publishable key for the browser SDK.
    pub publishable_key: String,
}

/// Create the payment intent for this booking.
///
/// POST /api/booking/payment/intent
///
/// Idempotent per session: once an intent exists it is returned as-is.
/// The in-flight claim is persisted before the upstream call so a
/// duplicate submit cannot race a second intent into existence.
#[instrument(skip(state, session, body))]
pub async fn create_intent(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<IntentRequestBody>,
) -> Result<Json<IntentResponse>> {
    let mut wiz = load_wizard(&session).await?;

    if wiz.support_needed {
        return Err(AppError::SupportNeeded {
            payment_intent_id: wiz.wizard.data().payment_intent_id.clone(),
        });
    }

    let data = wiz.wizard.data();
    if data.payment_method != Some(PaymentMethod::Online) {
        return Err(AppError::WrongStep(
            "online payment is not selected".to_string(),
        ));
    }
    let Some(service_id) = data.service_id.clone() else {
        return Err(AppError::WrongStep("no service selected".to_string()));
    };

    let tip_percentage = body.tip_percentage.unwrap_or(0);
    if tip_percentage > 100 {
        return Err(AppError::BadRequest(
            "tip_percentage must be between 0 and 100".to_string(),
        ));
    }

    let publishable_key = state.config().payments.publishable_key.clone();

    // Idempotence: a usable intent is never silently recreated.
    if let Some(intent) = wiz.payment.intent() {
        return Ok(Json(IntentResponse {
            client_secret: intent.client_secret.clone(),
            amount: intent.amount,
            payment_intent_id: intent.payment_intent_id.clone(),
            publishable_key,
        }));
    }

    // Resolve the service to a known price before touching the provider.
    state
        .catalog()
        .find_service(&service_id)
        .await
        .map_err(|e| match e {
            CatalogError::UnknownService(id) => AppError::BadRequest(format!("unknown service: {id}")),
            other => AppError::Catalog(other),
        })?;

    let request = CreateIntentRequest {
        service_id,
        customer_email: data.client_email.clone(),
        customer_name: data.client_name.clone(),
        tip_percentage,
    };

    // Claim, persist the claim, then call out.
    wiz.payment.begin_create()?;
    save_wizard(&session, &wiz).await?;

    match state.payments().create_intent(&request).await {
        Ok(intent) => {
            let response = IntentResponse {
                client_secret: intent.client_secret.clone(),
                amount: intent.amount,
                payment_intent_id: intent.payment_intent_id.clone(),
                publishable_key,
            };
            wiz.payment.complete_create(intent, &mut wiz.wizard);
            save_wizard(&session, &wiz).await?;
            Ok(Json(response))
        }
        Err(e) => {
            // No charge happened; release the claim so the client can retry.
            wiz.payment.fail_create();
            save_wizard(&session, &wiz).await?;
            Err(e.into())
        }
    }
}

/// Record the outcome the browser SDK reported.
///
/// POST /api/booking/payment/outcome
///
/// A succeeded outcome immediately hands off to the finalizer; the
/// booking is only done once the confirmation endpoint also accepts it.
#[instrument(skip(state, session, outcome))]
pub async fn submit_outcome(
    State(state): State<AppState>,
    session: Session,
    Json(outcome): Json<SdkOutcome>,
) -> Result<Json<WizardSnapshot>> {
    let mut wiz = load_wizard(&session).await?;

    if wiz.support_needed {
        return Err(AppError::SupportNeeded {
            payment_intent_id: wiz.wizard.data().payment_intent_id.clone(),
        });
    }
    if wiz.wizard.data().payment_method != Some(PaymentMethod::Online) {
        return Err(AppError::WrongStep(
            "online payment is not selected".to_string(),
        ));
    }
    if wiz.payment.intent().is_none() {
        return Err(AppError::WrongStep(
            "no payment intent for this booking".to_string(),
        ));
    }

    let status = wiz.payment.apply_outcome(outcome, &mut wiz.wizard);
    save_wizard(&session, &wiz).await?;

    if status == PaymentStatus::Completed {
        perform_finalize(&state, &session, &mut wiz).await?;
    }

    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// Reset a failed payment attempt so the form re-enables.
///
/// POST /api/booking/payment/retry
#[instrument(skip(state, session))]
pub async fn retry(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<WizardSnapshot>> {
    let mut wiz = load_wizard(&session).await?;

    if wiz.support_needed {
        return Err(AppError::SupportNeeded {
            payment_intent_id: wiz.wizard.data().payment_intent_id.clone(),
        });
    }
    if wiz.wizard.data().payment_status != Some(PaymentStatus::Failed) {
        return Err(AppError::WrongStep(
            "there is no failed payment to retry".to_string(),
        ));
    }

    wiz.payment.reset_for_retry(&mut wiz.wizard);
    save_wizard(&session, &wiz).await?;

    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}
