//! The booking aggregate and its merge-update store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    AppointmentId, PaymentIntentId, PaymentMethod, PaymentStatus, ServiceId, StylistId,
};

/// Everything collected over one booking session.
///
/// Created empty when the wizard starts, mutated only through
/// [`BookingDataStore::update`] and the typed payment/terminal setters,
/// and discarded when the session ends. Durable persistence happens
/// server-side behind the confirmation endpoint, never here.
///
/// Client identity fields use the empty string for "not entered yet";
/// the step gate treats empty strings as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingData {
    /// Selected service, or `None` until step 1 is filled in.
    pub service_id: Option<ServiceId>,
    /// Selected stylist. [`StylistId::any`] means "no preference" and is
    /// auto-assigned when the business has no stylists.
    pub stylist_id: Option<StylistId>,
    /// Requested appointment date.
    pub appointment_date: Option<NaiveDate>,
    /// Requested time slot, e.g. "10:00".
    pub time_slot: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    /// Free-form notes for the business.
    pub special_requests: Option<String>,
    pub how_heard_about_us: Option<String>,
    /// Send a confirmation email (defaults on).
    pub email_confirmation: bool,
    /// Send a confirmation text (defaults off).
    pub sms_confirmation: bool,
    pub payment_method: Option<PaymentMethod>,
    /// Intent id from the payment provider, kept even across failures so
    /// support can reference the charge.
    pub payment_intent_id: Option<PaymentIntentId>,
    /// `Completed` is only ever set after the provider confirmed the
    /// charge AND the confirmation endpoint accepted the booking.
    pub payment_status: Option<PaymentStatus>,
    /// Set on successful confirmation; the wizard is terminal once present.
    pub appointment_id: Option<AppointmentId>,
    pub confirmation_number: Option<String>,
}

impl Default for BookingData {
    fn default() -> Self {
        Self {
            service_id: None,
            stylist_id: None,
            appointment_date: None,
            time_slot: None,
            client_name: String::new(),
            client_email: String::new(),
            client_phone: String::new(),
            special_requests: None,
            how_heard_about_us: None,
            email_confirmation: true,
            sms_confirmation: false,
            payment_method: None,
            payment_intent_id: None,
            payment_status: None,
            appointment_id: None,
            confirmation_number: None,
        }
    }
}

impl BookingData {
    /// Record the payment intent created for this booking.
    pub fn record_intent(&mut self, intent_id: PaymentIntentId) {
        self.payment_intent_id = Some(intent_id);
    }

    /// Move the payment sub-state machine.
    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.payment_status = Some(status);
    }

    /// Reset a failed payment so the client can retry. The intent id is
    /// deliberately kept; retrying reuses the same intent.
    pub fn clear_payment_status(&mut self) {
        self.payment_status = None;
    }

    /// Record the terminal confirmation result.
    pub fn record_confirmation(
        &mut self,
        appointment_id: AppointmentId,
        confirmation_number: Option<String>,
    ) {
        self.appointment_id = Some(appointment_id);
        self.confirmation_number = confirmation_number;
    }

    /// Whether the booking has been confirmed server-side.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.appointment_id.is_some()
    }
}

/// A shallow merge-update for [`BookingData`].
///
/// Only the client-settable fields appear here; payment progress and
/// terminal fields move exclusively through the typed setters above, so a
/// request body can never forge a completed payment. `None` means "leave
/// unchanged" - there is no way to un-set a field through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingPatch {
    pub service_id: Option<ServiceId>,
    pub stylist_id: Option<StylistId>,
    pub appointment_date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub special_requests: Option<String>,
    pub how_heard_about_us: Option<String>,
    pub email_confirmation: Option<bool>,
    pub sms_confirmation: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

impl BookingPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.service_id.is_none()
            && self.stylist_id.is_none()
            && self.appointment_date.is_none()
            && self.time_slot.is_none()
            && self.client_name.is_none()
            && self.client_email.is_none()
            && self.client_phone.is_none()
            && self.special_requests.is_none()
            && self.how_heard_about_us.is_none()
            && self.email_confirmation.is_none()
            && self.sms_confirmation.is_none()
            && self.payment_method.is_none()
    }
}

/// Owns the single mutable [`BookingData`] for one booking session.
///
/// Exactly one logical writer exists (the client working through the
/// wizard), so updates are plain synchronous merges. No validation
/// happens here - completeness is the step gate's job, format checks are
/// the API boundary's. The controller re-derives gating from the fresh
/// snapshot after every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDataStore {
    current: BookingData,
}

impl BookingDataStore {
    /// The current snapshot.
    #[must_use]
    pub const fn get(&self) -> &BookingData {
        &self.current
    }

    /// Mutable access for the typed payment/terminal setters.
    pub const fn get_mut(&mut self) -> &mut BookingData {
        &mut self.current
    }

    /// Shallow-merge `patch` into the current snapshot and return it.
    pub fn update(&mut self, patch: &BookingPatch) -> &BookingData {
        let data = &mut self.current;
        if let Some(v) = &patch.service_id {
            data.service_id = Some(v.clone());
        }
        if let Some(v) = &patch.stylist_id {
            data.stylist_id = Some(v.clone());
        }
        if let Some(v) = patch.appointment_date {
            data.appointment_date = Some(v);
        }
        if let Some(v) = &patch.time_slot {
            data.time_slot = Some(v.clone());
        }
        if let Some(v) = &patch.client_name {
            data.client_name.clone_from(v);
        }
        if let Some(v) = &patch.client_email {
            data.client_email.clone_from(v);
        }
        if let Some(v) = &patch.client_phone {
            data.client_phone.clone_from(v);
        }
        if let Some(v) = &patch.special_requests {
            data.special_requests = Some(v.clone());
        }
        if let Some(v) = &patch.how_heard_about_us {
            data.how_heard_about_us = Some(v.clone());
        }
        if let Some(v) = patch.email_confirmation {
            data.email_confirmation = v;
        }
        if let Some(v) = patch.sms_confirmation {
            data.sms_confirmation = v;
        }
        if let Some(v) = patch.payment_method {
            data.payment_method = Some(v);
        }
        &self.current
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let data = BookingData::default();
        assert!(data.service_id.is_none());
        assert!(data.email_confirmation);
        assert!(!data.sms_confirmation);
        assert_eq!(data.client_name, "");
        assert!(!data.is_confirmed());
    }

    #[test]
    fn test_update_merges_only_present_fields() {
        let mut store = BookingDataStore::default();
        store.update(&BookingPatch {
            service_id: Some(ServiceId::new("svc1")),
            client_name: Some("Ada".to_owned()),
            ..BookingPatch::default()
        });

        let snapshot = store.get();
        assert_eq!(snapshot.service_id, Some(ServiceId::new("svc1")));
        assert_eq!(snapshot.client_name, "Ada");
        // untouched fields keep their defaults
        assert!(snapshot.stylist_id.is_none());
        assert!(snapshot.email_confirmation);
    }

    #[test]
    fn test_update_overwrites_previous_values() {
        let mut store = BookingDataStore::default();
        store.update(&BookingPatch {
            time_slot: Some("10:00".to_owned()),
            ..BookingPatch::default()
        });
        store.update(&BookingPatch {
            time_slot: Some("14:30".to_owned()),
            ..BookingPatch::default()
        });
        assert_eq!(store.get().time_slot.as_deref(), Some("14:30"));
    }

    #[test]
    fn test_patch_cannot_touch_payment_progress() {
        // Compile-time property really: the patch type has no payment
        // status or terminal fields. Merge an all-Some patch and check
        // the protected fields stayed put.
        let mut store = BookingDataStore::default();
        store.get_mut().record_intent(PaymentIntentId::new("pi_1"));
        store.get_mut().set_payment_status(PaymentStatus::Completed);

        store.update(&BookingPatch {
            service_id: Some(ServiceId::new("svc2")),
            stylist_id: Some(StylistId::any()),
            appointment_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            time_slot: Some("09:00".to_owned()),
            client_name: Some("Ada".to_owned()),
            client_email: Some("ada@example.com".to_owned()),
            client_phone: Some("555-0101".to_owned()),
            special_requests: Some("window seat".to_owned()),
            how_heard_about_us: Some("a friend".to_owned()),
            email_confirmation: Some(false),
            sms_confirmation: Some(true),
            payment_method: Some(PaymentMethod::Online),
        });

        let snapshot = store.get();
        assert_eq!(
            snapshot.payment_intent_id,
            Some(PaymentIntentId::new("pi_1"))
        );
        assert_eq!(snapshot.payment_status, Some(PaymentStatus::Completed));
        assert!(snapshot.appointment_id.is_none());
    }

    #[test]
    fn test_clear_payment_status_keeps_intent() {
        let mut data = BookingData::default();
        data.record_intent(PaymentIntentId::new("pi_1"));
        data.set_payment_status(PaymentStatus::Failed);
        data.clear_payment_status();

        assert!(data.payment_status.is_none());
        assert_eq!(data.payment_intent_id, Some(PaymentIntentId::new("pi_1")));
    }

    #[test]
    fn test_record_confirmation() {
        let mut data = BookingData::default();
        data.record_confirmation(AppointmentId::new(42), Some("MG-0042".to_owned()));
        assert!(data.is_confirmed());
        assert_eq!(data.appointment_id, Some(AppointmentId::new(42)));
        assert_eq!(data.confirmation_number.as_deref(), Some("MG-0042"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(BookingPatch::default().is_empty());
        let patch = BookingPatch {
            sms_confirmation: Some(true),
            ..BookingPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
