//! Booking finalization.
//!
//! One code path serves both payment methods: cash bookings finalize
//! straight from the payment-method step (unpaid), online bookings only
//! after the provider confirmed the charge. The severity of a failure
//! differs sharply between the two - see `perform_finalize`.

use axum::{Json, extract::State};
use chrono::NaiveTime;
use tower_sessions::Session;
use tracing::instrument;

use marigold_core::{PaymentMethod, PaymentStatus};

use crate::error::{AppError, Result};
use crate::models::WizardSession;
use crate::routes::wizard::{WizardSnapshot, load_wizard, save_wizard};
use crate::services::ConfirmBookingRequest;
use crate::state::AppState;

/// Confirm the booking with the scheduling backend.
///
/// POST /api/booking/finalize
#[instrument(skip(state, session))]
pub async fn finalize(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<WizardSnapshot>> {
    let mut wiz = load_wizard(&session).await?;
    perform_finalize(&state, &session, &mut wiz).await?;
    Ok(Json(WizardSnapshot::of(
        &wiz,
        &state.config().payments.publishable_key,
    )))
}

/// Run the confirmation call and commit the terminal state.
///
/// Exactly one of these may run per booking at a time (`finalize_in_flight`
/// is persisted before the upstream call), and a booking that is already
/// confirmed returns success without a second call - duplicate submit
/// clicks cannot double-book.
///
/// Failure handling splits by method:
/// - cash: nothing has been paid, the error is plainly retryable
/// - online: the charge already succeeded, so the failure latches
///   `support_needed` and every retry path stays blocked. The intent id
///   survives in the booking data as the support reference.
pub(crate) async fn perform_finalize(
    state: &AppState,
    session: &Session,
    wiz: &mut WizardSession,
) -> Result<()> {
    if wiz.wizard.is_terminal() {
        return Ok(());
    }
    if wiz.support_needed {
        return Err(AppError::SupportNeeded {
            payment_intent_id: wiz.wizard.data().payment_intent_id.clone(),
        });
    }
    if wiz.finalize_in_flight {
        return Err(AppError::FinalizeInFlight);
    }

    let data = wiz.wizard.data().clone();
    let method = data
        .payment_method
        .ok_or_else(|| AppError::WrongStep("no payment method selected".to_string()))?;
    if method == PaymentMethod::Online && data.payment_status != Some(PaymentStatus::Completed) {
        return Err(AppError::WrongStep(
            "the online payment has not completed".to_string(),
        ));
    }

    let appointment_date = data
        .appointment_date
        .ok_or_else(|| AppError::WrongStep("appointment details are incomplete".to_string()))?;
    let time_slot = data
        .time_slot
        .clone()
        .ok_or_else(|| AppError::WrongStep("appointment details are incomplete".to_string()))?;
    let service_id = data
        .service_id
        .clone()
        .ok_or_else(|| AppError::WrongStep("no service selected".to_string()))?;

    let service = state.catalog().find_service(&service_id).await?;
    let (start_time, end_time) = slot_window(&time_slot, service.duration_minutes)?;

    let request = ConfirmBookingRequest {
        payment_intent_id: match method {
            PaymentMethod::Online => data.payment_intent_id.clone(),
            PaymentMethod::Cash => None,
        },
        customer_name: data.client_name.clone(),
        customer_email: data.client_email.clone(),
        customer_phone: data.client_phone.clone(),
        appointment_date,
        start_time,
        end_time,
        notes: data.special_requests.clone(),
    };

    wiz.finalize_in_flight = true;
    save_wizard(session, wiz).await?;

    let result = state.confirmations().confirm(&request).await;
    wiz.finalize_in_flight = false;

    match result {
        Ok(appointment) => {
            wiz.wizard
                .record_confirmation(appointment.id, appointment.confirmation_number);
            save_wizard(session, wiz).await?;
            Ok(())
        }
        Err(e) => match method {
            PaymentMethod::Cash => {
                save_wizard(session, wiz).await?;
                Err(AppError::Confirmation(e))
            }
            PaymentMethod::Online => {
                tracing::error!(
                    error = %e,
                    payment_intent_id = ?data.payment_intent_id,
                    "Confirmation failed after successful payment"
                );
                wiz.support_needed = true;
                save_wizard(session, wiz).await?;
                Err(AppError::SupportNeeded {
                    payment_intent_id: data.payment_intent_id,
                })
            }
        },
    }
}

/// Turn a start slot plus the service duration into a `(start, end)` pair.
fn slot_window(slot: &str, duration_minutes: u32) -> Result<(String, String)> {
    let start = NaiveTime::parse_from_str(slot.trim(), "%H:%M")
        .map_err(|_| AppError::BadRequest(format!("invalid time slot '{slot}'")))?;
    let end = start + chrono::Duration::minutes(i64::from(duration_minutes));
    Ok((
        start.format("%H:%M").to_string(),
        end.format("%H:%M").to_string(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_window() {
        let (start, end) = slot_window("10:00", 45).unwrap();
        assert_eq!(start, "10:00");
        assert_eq!(end, "10:45");

        let (start, end) = slot_window(" 9:30 ", 90).unwrap();
        assert_eq!(start, "09:30");
        assert_eq!(end, "11:00");
    }

    #[test]
    fn test_slot_window_rejects_garbage() {
        assert!(slot_window("soonish", 30).is_err());
        assert!(slot_window("25:99", 30).is_err());
    }
}
