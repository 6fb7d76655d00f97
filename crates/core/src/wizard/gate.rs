//! Pure per-step completion predicates.
//!
//! These functions are called on every snapshot read and after every
//! update, so they must stay side-effect free and cheap. Required-field
//! rules live here as code, one arm per step, rather than as lists of
//! field names - cross-field conditions (like the stylist rule) stay
//! visible at a glance.

use super::data::BookingData;
use super::steps::StepId;

fn present(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Whether `step`'s required fields are satisfied, i.e. the client may
/// advance past it.
///
/// Strings count as missing when empty or whitespace-only. The stylist
/// requirement on step 1 is unconditional here because the controller
/// auto-fills the `"any"` sentinel when the business has no stylists;
/// with a non-empty roster the client must actually choose.
#[must_use]
pub fn can_proceed(step: StepId, data: &BookingData) -> bool {
    match step {
        StepId::ServiceSelection => data.service_id.is_some() && data.stylist_id.is_some(),
        StepId::AppointmentDetails => {
            data.appointment_date.is_some()
                && data.time_slot.as_deref().is_some_and(present)
                && present(&data.client_name)
                && present(&data.client_email)
                && present(&data.client_phone)
        }
        // Purely optional preferences; always satisfiable.
        StepId::AdditionalDetails => true,
        StepId::PaymentMethod => data.payment_method.is_some(),
        // No gate-level requirements. The payment step is sub-gated by the
        // payment bridge (intent + provider outcome), and the confirmation
        // step is terminal.
        StepId::PaymentProcessing | StepId::Confirmation => true,
    }
}

/// Whether `step` shows as completed in the step indicator.
///
/// A step strictly behind the current one was visited and passed its gate
/// to get left behind, so it stays completed even if the client has moved
/// on. The current step is completed exactly when its gate passes.
#[must_use]
pub fn is_completed(step: StepId, current: StepId, data: &BookingData) -> bool {
    step < current || (step == current && can_proceed(step, data))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{PaymentMethod, ServiceId, StylistId};
    use crate::wizard::data::{BookingDataStore, BookingPatch};

    fn filled_details_patch() -> BookingPatch {
        BookingPatch {
            appointment_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            time_slot: Some("10:00".to_owned()),
            client_name: Some("Ada Lovelace".to_owned()),
            client_email: Some("ada@example.com".to_owned()),
            client_phone: Some("555-0101".to_owned()),
            ..BookingPatch::default()
        }
    }

    #[test]
    fn test_service_selection_requires_service_and_stylist() {
        let mut store = BookingDataStore::default();
        assert!(!can_proceed(StepId::ServiceSelection, store.get()));

        store.update(&BookingPatch {
            service_id: Some(ServiceId::new("svc1")),
            ..BookingPatch::default()
        });
        assert!(!can_proceed(StepId::ServiceSelection, store.get()));

        store.update(&BookingPatch {
            stylist_id: Some(StylistId::new("sty1")),
            ..BookingPatch::default()
        });
        assert!(can_proceed(StepId::ServiceSelection, store.get()));
    }

    #[test]
    fn test_service_missing_blocks_regardless_of_other_fields() {
        let mut store = BookingDataStore::default();
        let mut patch = filled_details_patch();
        patch.stylist_id = Some(StylistId::any());
        patch.payment_method = Some(PaymentMethod::Cash);
        store.update(&patch);

        assert!(!can_proceed(StepId::ServiceSelection, store.get()));
    }

    #[test]
    fn test_appointment_details_all_subsets() {
        // Exhaustively drop every subset of the five required fields; the
        // gate must pass only for the full set.
        for mask in 0u32..32 {
            let mut patch = filled_details_patch();
            if mask & 1 != 0 {
                patch.appointment_date = None;
            }
            if mask & 2 != 0 {
                patch.time_slot = None;
            }
            if mask & 4 != 0 {
                patch.client_name = None;
            }
            if mask & 8 != 0 {
                patch.client_email = None;
            }
            if mask & 16 != 0 {
                patch.client_phone = None;
            }

            let mut store = BookingDataStore::default();
            store.update(&patch);
            assert_eq!(
                can_proceed(StepId::AppointmentDetails, store.get()),
                mask == 0,
                "mask {mask:#07b} should {}",
                if mask == 0 { "pass" } else { "fail" }
            );
        }
    }

    #[test]
    fn test_whitespace_only_strings_count_as_missing() {
        let mut store = BookingDataStore::default();
        let mut patch = filled_details_patch();
        patch.client_name = Some("   ".to_owned());
        store.update(&patch);

        assert!(!can_proceed(StepId::AppointmentDetails, store.get()));
    }

    #[test]
    fn test_optional_steps_always_pass() {
        let store = BookingDataStore::default();
        assert!(can_proceed(StepId::AdditionalDetails, store.get()));
        assert!(can_proceed(StepId::PaymentProcessing, store.get()));
        assert!(can_proceed(StepId::Confirmation, store.get()));
    }

    #[test]
    fn test_payment_method_gate() {
        let mut store = BookingDataStore::default();
        assert!(!can_proceed(StepId::PaymentMethod, store.get()));
        store.update(&BookingPatch {
            payment_method: Some(PaymentMethod::Cash),
            ..BookingPatch::default()
        });
        assert!(can_proceed(StepId::PaymentMethod, store.get()));
    }

    #[test]
    fn test_passed_steps_stay_completed() {
        // Step 1 filled, client now on step 3: step 1 remains completed
        // even though nothing re-validated it.
        let mut store = BookingDataStore::default();
        store.update(&BookingPatch {
            service_id: Some(ServiceId::new("svc1")),
            stylist_id: Some(StylistId::new("sty1")),
            ..BookingPatch::default()
        });

        assert!(is_completed(
            StepId::ServiceSelection,
            StepId::AdditionalDetails,
            store.get()
        ));
        // current step completes only via its gate
        assert!(is_completed(
            StepId::AdditionalDetails,
            StepId::AdditionalDetails,
            store.get()
        ));
        // future steps are never completed
        assert!(!is_completed(
            StepId::PaymentMethod,
            StepId::AdditionalDetails,
            store.get()
        ));
    }
}
