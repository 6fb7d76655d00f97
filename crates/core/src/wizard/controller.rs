//! Wizard navigation.
//!
//! The controller owns the booking store and the current-step pointer and
//! is the only thing that moves the pointer. Navigation never mutates
//! booking data; data mutation never moves the pointer.

use serde::{Deserialize, Serialize};

use super::data::{BookingData, BookingDataStore, BookingPatch};
use super::gate;
use super::steps::{StepId, TOTAL_STEPS};
use crate::types::{AppointmentId, PaymentIntentId, PaymentMethod, PaymentStatus, StylistId};

/// Tunable wizard behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardOptions {
    /// When true, progress for a cash booking is computed over the five
    /// effective steps instead of all six, so a cash client standing on
    /// the payment-method step reads closer to done. Off by default to
    /// keep the historical step-indicator contract (a cash client sees
    /// 67% at step 4 and jumps straight to 100%).
    pub short_path_progress: bool,
}

/// State machine over the six wizard steps.
///
/// Forward navigation is gated: [`WizardController::next`] refuses to move
/// while the current step's required fields are incomplete, and the
/// refusal is a silent no-op rather than an error - the UI is expected to
/// disable the control, but the guard holds even if it doesn't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardController {
    store: BookingDataStore,
    current: StepId,
    stylists_available: bool,
    options: WizardOptions,
}

impl WizardController {
    /// Start a fresh booking session.
    ///
    /// `stylists_available` reflects the catalog at mount time. When the
    /// business has no stylists, the stylist field is auto-filled with the
    /// `"any"` sentinel so the first gate can't dead-end.
    #[must_use]
    pub fn new(stylists_available: bool) -> Self {
        Self::with_options(stylists_available, WizardOptions::default())
    }

    /// Start a fresh booking session with explicit options.
    #[must_use]
    pub fn with_options(stylists_available: bool, options: WizardOptions) -> Self {
        let mut store = BookingDataStore::default();
        if !stylists_available {
            store.get_mut().stylist_id = Some(StylistId::any());
        }
        Self {
            store,
            current: StepId::ServiceSelection,
            stylists_available,
            options,
        }
    }

    /// The current booking snapshot.
    #[must_use]
    pub const fn data(&self) -> &BookingData {
        self.store.get()
    }

    /// The step the client is on.
    #[must_use]
    pub const fn current_step(&self) -> StepId {
        self.current
    }

    /// Whether the catalog had stylists when the session started.
    #[must_use]
    pub const fn stylists_available(&self) -> bool {
        self.stylists_available
    }

    /// Merge a client edit into the booking data. Navigation is untouched;
    /// gating is re-derived from the returned snapshot.
    pub fn update(&mut self, patch: &BookingPatch) -> &BookingData {
        self.store.update(patch)
    }

    /// Whether the current step's gate passes.
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        gate::can_proceed(self.current, self.store.get())
    }

    /// Whether `step` shows as completed.
    #[must_use]
    pub fn is_completed(&self, step: StepId) -> bool {
        gate::is_completed(step, self.current, self.store.get())
    }

    /// Advance one effective step.
    ///
    /// Returns `false` - leaving all state untouched - when the gate
    /// fails or there is nothing after the current step. A cash booking
    /// advances from the payment-method step straight to confirmation;
    /// the online-payment step only exists on the online path.
    pub fn next(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        let Some(target) = self.effective_successor() else {
            return false;
        };
        self.current = target;
        true
    }

    /// Step backward. No re-validation on the way down; returns `false`
    /// only from the first step.
    pub fn previous(&mut self) -> bool {
        let Some(target) = self.effective_predecessor() else {
            return false;
        };
        self.current = target;
        true
    }

    /// Jump to an arbitrary step.
    ///
    /// Backward (or same-step) jumps are always allowed. A forward jump is
    /// allowed only when every step before the target is completed, which
    /// in practice collapses to "the gated successor" - the guard exists
    /// defensively for UIs that expose the step indicator as navigation.
    /// Rejected jumps are silent no-ops.
    pub fn jump_to(&mut self, target: StepId) -> bool {
        let allowed = target <= self.current
            || StepId::ALL
                .iter()
                .filter(|s| **s < target)
                .all(|s| self.is_completed(*s));
        if allowed {
            self.current = target;
        }
        allowed
    }

    /// Progress through the wizard, rounded to a whole percentage.
    ///
    /// By default this is simply `current / 6`, uncorrected for the cash
    /// short path; see [`WizardOptions::short_path_progress`].
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        let (position, total) = if self.on_short_path() && self.options.short_path_progress {
            let position = match self.current {
                // the payment step is skipped, so confirmation is 5 of 5
                StepId::Confirmation => 5,
                step => u32::from(step.number()),
            };
            (position, 5_u32)
        } else {
            (u32::from(self.current.number()), u32::from(TOTAL_STEPS))
        };
        // round-half-up integer division; result is always <= 100
        u8::try_from((position * 100 + total / 2) / total).unwrap_or(100)
    }

    /// Whether the booking reached its terminal confirmed state. Further
    /// navigation is meaningless once this returns true.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.data().is_confirmed()
    }

    // =========================================================================
    // Typed payment/terminal operations
    // =========================================================================
    //
    // The payment bridge and the finalizer report back through these; they
    // are not reachable from a client patch.

    /// Record the created payment intent.
    pub fn record_intent(&mut self, intent_id: PaymentIntentId) {
        self.store.get_mut().record_intent(intent_id);
    }

    /// Move the payment sub-state machine.
    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.store.get_mut().set_payment_status(status);
    }

    /// Reset a failed payment for retry (keeps the intent).
    pub fn clear_payment_status(&mut self) {
        self.store.get_mut().clear_payment_status();
    }

    /// Record the terminal confirmation and move to the confirmation step.
    pub fn record_confirmation(
        &mut self,
        appointment_id: AppointmentId,
        confirmation_number: Option<String>,
    ) {
        self.store
            .get_mut()
            .record_confirmation(appointment_id, confirmation_number);
        self.current = StepId::Confirmation;
    }

    fn on_short_path(&self) -> bool {
        self.data().payment_method == Some(PaymentMethod::Cash)
    }

    fn effective_successor(&self) -> Option<StepId> {
        if self.current == StepId::PaymentMethod && self.on_short_path() {
            Some(StepId::Confirmation)
        } else {
            self.current.successor()
        }
    }

    fn effective_predecessor(&self) -> Option<StepId> {
        if self.current == StepId::Confirmation && self.on_short_path() {
            Some(StepId::PaymentMethod)
        } else {
            self.current.predecessor()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{PaymentStatus, ServiceId};

    fn step1_patch() -> BookingPatch {
        BookingPatch {
            service_id: Some(ServiceId::new("svc1")),
            stylist_id: Some(StylistId::new("sty1")),
            ..BookingPatch::default()
        }
    }

    fn step2_patch() -> BookingPatch {
        BookingPatch {
            appointment_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            time_slot: Some("10:00".to_owned()),
            client_name: Some("Ada Lovelace".to_owned()),
            client_email: Some("ada@example.com".to_owned()),
            client_phone: Some("555-0101".to_owned()),
            ..BookingPatch::default()
        }
    }

    /// Walk a controller to the payment-method step with valid data.
    fn at_step4(method: PaymentMethod) -> WizardController {
        let mut wizard = WizardController::new(true);
        wizard.update(&step1_patch());
        assert!(wizard.next());
        wizard.update(&step2_patch());
        assert!(wizard.next());
        assert!(wizard.next()); // preferences are optional
        wizard.update(&BookingPatch {
            payment_method: Some(method),
            ..BookingPatch::default()
        });
        assert_eq!(wizard.current_step(), StepId::PaymentMethod);
        wizard
    }

    #[test]
    fn test_next_blocked_until_gate_passes() {
        let mut wizard = WizardController::new(true);
        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), StepId::ServiceSelection);

        wizard.update(&step1_patch());
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), StepId::AppointmentDetails);
    }

    #[test]
    fn test_blocked_next_never_mutates() {
        let mut wizard = WizardController::new(true);
        wizard.update(&step1_patch());
        assert!(wizard.next());

        let before = wizard.clone();
        assert!(!wizard.next()); // step 2 incomplete
        assert_eq!(wizard, before);
    }

    #[test]
    fn test_previous_then_next_roundtrip() {
        let mut wizard = WizardController::new(true);
        wizard.update(&step1_patch());
        assert!(wizard.next());

        assert!(wizard.previous());
        assert_eq!(wizard.current_step(), StepId::ServiceSelection);
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), StepId::AppointmentDetails);
    }

    #[test]
    fn test_previous_stops_at_first_step() {
        let mut wizard = WizardController::new(true);
        assert!(!wizard.previous());
        assert_eq!(wizard.current_step(), StepId::ServiceSelection);
    }

    #[test]
    fn test_empty_stylist_roster_autofills_any() {
        let mut wizard = WizardController::new(false);
        assert_eq!(wizard.data().stylist_id, Some(StylistId::any()));

        // selecting just a service is now enough for step 1
        wizard.update(&BookingPatch {
            service_id: Some(ServiceId::new("svc1")),
            ..BookingPatch::default()
        });
        assert!(wizard.can_proceed());
    }

    #[test]
    fn test_cash_skips_payment_step() {
        let mut wizard = at_step4(PaymentMethod::Cash);
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), StepId::Confirmation);
        // no payment intent was ever required
        assert!(wizard.data().payment_intent_id.is_none());

        // and back lands on payment method, not the payment step
        assert!(wizard.previous());
        assert_eq!(wizard.current_step(), StepId::PaymentMethod);
    }

    #[test]
    fn test_online_path_visits_payment_step() {
        let mut wizard = at_step4(PaymentMethod::Online);
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), StepId::PaymentProcessing);
    }

    #[test]
    fn test_jump_backward_always_allowed() {
        let mut wizard = at_step4(PaymentMethod::Online);
        assert!(wizard.jump_to(StepId::AppointmentDetails));
        assert_eq!(wizard.current_step(), StepId::AppointmentDetails);
    }

    #[test]
    fn test_jump_forward_requires_completed_prefix() {
        let mut wizard = WizardController::new(true);
        wizard.update(&step1_patch());

        // step 2 untouched: jumping two ahead must be silently rejected
        assert!(!wizard.jump_to(StepId::AdditionalDetails));
        assert_eq!(wizard.current_step(), StepId::ServiceSelection);

        // jumping to the gated successor is allowed
        assert!(wizard.jump_to(StepId::AppointmentDetails));
        assert_eq!(wizard.current_step(), StepId::AppointmentDetails);
    }

    #[test]
    fn test_progress_percentage_full_path() {
        let mut wizard = WizardController::new(true);
        assert_eq!(wizard.progress_percentage(), 17);
        wizard.update(&step1_patch());
        wizard.next();
        assert_eq!(wizard.progress_percentage(), 33);
    }

    #[test]
    fn test_progress_ignores_short_path_by_default() {
        let wizard = at_step4(PaymentMethod::Cash);
        // historical behavior: still reported over six steps
        assert_eq!(wizard.progress_percentage(), 67);
    }

    #[test]
    fn test_progress_short_path_option() {
        let mut wizard = WizardController::with_options(
            true,
            WizardOptions {
                short_path_progress: true,
            },
        );
        wizard.update(&step1_patch());
        wizard.next();
        wizard.update(&step2_patch());
        wizard.next();
        wizard.next();
        wizard.update(&BookingPatch {
            payment_method: Some(PaymentMethod::Cash),
            ..BookingPatch::default()
        });
        assert_eq!(wizard.progress_percentage(), 80); // 4 of 5
        assert!(wizard.next());
        assert_eq!(wizard.progress_percentage(), 100);
    }

    #[test]
    fn test_record_confirmation_is_terminal() {
        let mut wizard = at_step4(PaymentMethod::Cash);
        wizard.record_confirmation(AppointmentId::new(42), Some("MG-0042".to_owned()));

        assert!(wizard.is_terminal());
        assert_eq!(wizard.current_step(), StepId::Confirmation);
        assert_eq!(wizard.progress_percentage(), 100);
    }

    #[test]
    fn test_payment_status_ops() {
        let mut wizard = at_step4(PaymentMethod::Online);
        wizard.record_intent(PaymentIntentId::new("pi_1"));
        wizard.set_payment_status(PaymentStatus::Failed);
        wizard.clear_payment_status();

        assert!(wizard.data().payment_status.is_none());
        assert_eq!(
            wizard.data().payment_intent_id,
            Some(PaymentIntentId::new("pi_1"))
        );
    }

    #[test]
    fn test_serde_roundtrip_preserves_state() {
        let wizard = at_step4(PaymentMethod::Online);
        let json = serde_json::to_string(&wizard).unwrap();
        let restored: WizardController = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, wizard);
    }
}
