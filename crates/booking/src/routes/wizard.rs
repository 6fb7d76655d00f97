//! Booking wizard lifecycle and navigation handlers.
//!
//! Every handler returns the full wizard snapshot so the step indicator
//! and the current step's form can render from one response. Navigation
//! that the gate refuses is NOT an error: the snapshot comes back with
//! `current_step` unchanged and `can_proceed: false`, mirroring a
//! disabled Next button.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marigold_core::{
    BookingData, BookingPatch, Email, PaymentStatus, Phone, StepId, TOTAL_STEPS, wizard::steps,
};

use crate::error::{AppError, Result};
use crate::models::{WizardSession, session_keys};
use crate::state::AppState;

// =============================================================================
// Snapshot views
// =============================================================================

/// One row of the step indicator.
#[derive(Debug, Serialize)]
pub struct StepView {
    pub number: u8,
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
    pub current: bool,
    pub completed: bool,
}

/// Payment sub-state as the client sees it.
#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub status: Option<PaymentStatus>,
    /// Provider message for the last failed attempt, for inline display.
    pub error: Option<String>,
    /// Present once an intent exists; drives the browser SDK.
    pub client_secret: Option<String>,
    pub amount: Option<i64>,
    pub publishable_key: String,
}

/// The full wizard state returned by every booking endpoint.
#[derive(Debug, Serialize)]
pub struct WizardSnapshot {
    pub current_step: u8,
    pub total_steps: u8,
    pub progress: u8,
    pub can_proceed: bool,
    pub terminal: bool,
    pub support_needed: bool,
    pub steps: Vec<StepView>,
    pub data: BookingData,
    pub payment: PaymentView,
}

impl WizardSnapshot {
    pub(crate) fn of(wiz: &WizardSession, publishable_key: &str) -> Self {
        let controller = &wiz.wizard;
        let step_views = steps::steps()
            .iter()
            .map(|def| StepView {
                number: def.id.number(),
                id: def.id,
                title: def.title,
                description: def.description,
                current: def.id == controller.current_step(),
                completed: controller.is_completed(def.id),
            })
            .collect();

        Self {
            current_step: controller.current_step().number(),
            total_steps: TOTAL_STEPS,
            progress: controller.progress_percentage(),
            can_proceed: controller.can_proceed(),
            terminal: controller.is_terminal(),
            support_needed: wiz.support_needed,
            steps: step_views,
            data: controller.data().clone(),
            payment: PaymentView {
                status: controller.data().payment_status,
                error: wiz.payment.last_error().map(String::from),
                client_secret: wiz.payment.intent().map(|i| i.client_secret.clone()),
                amount: wiz.payment.intent().map(|i| i.amount),
                publishable_key: publishable_key.to_string(),
            },
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the in-progress wizard from the session.
pub(crate) async fn load_wizard(session: &Session) -> Result<WizardSession> {
    session
        .get::<WizardSession>(session_keys::WIZARD)
        .await?
        .ok_or(AppError::NoActiveBooking)
}

/// Persist the wizard back into the session.
pub(crate) async fn save_wizard(session: &Session, wiz: &WizardSession) -> Result<()> {
    session
        .insert(session_keys::WIZARD, wiz)
        .await
        .map_err(Into::into)
}

// =============================================================================
// Handlers
// =============================================================================

/// Start a fresh booking session.
///
/// POST /api/booking
///
/// Loads the stylist roster first: a business with no stylists gets the
/// "any" auto-fill, and a catalog outage blocks the wizard from starting
/// at all (retryable). Any previous in-progress booking in this session
/// is discarded.
#[instrument(skip(state, session))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<WizardSnapshot>> {
    let stylists = state.catalog().stylists().await?;

    let wiz = WizardSession::new(!stylists.is_empty(), state.config().wizard);
    save_wizard(&session, &wiz).await?;

    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// The current wizard snapshot.
///
/// GET /api/booking
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<WizardSnapshot>> {
    let wiz = load_wizard(&session).await?;
    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// Merge a partial edit into the booking data.
///
/// PATCH /api/booking/data
///
/// Contact fields are format-checked here, at the boundary; the step gate
/// itself only ever checks presence.
#[instrument(skip(state, session, patch))]
pub async fn update_data(
    State(state): State<AppState>,
    session: Session,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<WizardSnapshot>> {
    let mut wiz = load_wizard(&session).await?;

    if wiz.wizard.is_terminal() {
        return Err(AppError::WrongStep(
            "the booking is already confirmed".to_string(),
        ));
    }

    if let Some(email) = patch.client_email.as_deref()
        && !email.trim().is_empty()
    {
        Email::parse(email).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;
    }
    if let Some(phone) = patch.client_phone.as_deref()
        && !phone.trim().is_empty()
    {
        Phone::parse(phone).map_err(|e| AppError::BadRequest(format!("invalid phone: {e}")))?;
    }

    wiz.wizard.update(&patch);
    save_wizard(&session, &wiz).await?;

    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// Advance one step, if the current step's gate passes.
///
/// POST /api/booking/next
#[instrument(skip(state, session))]
pub async fn next(State(state): State<AppState>, session: Session) -> Result<Json<WizardSnapshot>> {
    let mut wiz = load_wizard(&session).await?;
    if wiz.wizard.next() {
        save_wizard(&session, &wiz).await?;
    }
    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// Step backward.
///
/// POST /api/booking/previous
#[instrument(skip(state, session))]
pub async fn previous(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<WizardSnapshot>> {
    let mut wiz = load_wizard(&session).await?;
    if wiz.wizard.previous() {
        save_wizard(&session, &wiz).await?;
    }
    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// Jump to a specific step (step-indicator navigation).
///
/// POST /api/booking/jump
#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    pub step: u8,
}

#[instrument(skip(state, session))]
pub async fn jump(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<JumpRequest>,
) -> Result<Json<WizardSnapshot>> {
    let target = StepId::from_number(request.step)
        .ok_or_else(|| AppError::BadRequest(format!("no such step: {}", request.step)))?;

    let mut wiz = load_wizard(&session).await?;
    if wiz.wizard.jump_to(target) {
        save_wizard(&session, &wiz).await?;
    }
    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}
