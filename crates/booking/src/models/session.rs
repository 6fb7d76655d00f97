//! Session-stored wizard state.
//!
//! One `WizardSession` per browser session, serialized into tower-sessions.
//! This is the explicit context object the wizard lives in - no global
//! storage - and it is gone when the session expires or is cleared.

use serde::{Deserialize, Serialize};

use marigold_core::{WizardController, WizardOptions};

use crate::services::PaymentBridge;

/// Everything one in-progress booking needs between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSession {
    /// The step state machine and booking data.
    pub wizard: WizardController,
    /// Payment sub-state: the created intent and the SDK's last error.
    pub payment: PaymentBridge,
    /// Guard so two finalize submits can't race into a double booking.
    pub finalize_in_flight: bool,
    /// Latched when the confirmation endpoint failed after a successful
    /// charge. Blocks every retry path; only support can untangle it.
    pub support_needed: bool,
}

impl WizardSession {
    /// Start a fresh booking session.
    #[must_use]
    pub fn new(stylists_available: bool, options: WizardOptions) -> Self {
        Self {
            wizard: WizardController::with_options(stylists_available, options),
            payment: PaymentBridge::default(),
            finalize_in_flight: false,
            support_needed: false,
        }
    }
}

/// Session keys for booking data.
pub mod session_keys {
    /// Key for the in-progress booking wizard.
    pub const WIZARD: &str = "booking_wizard";
}
