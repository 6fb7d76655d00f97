//! The fixed, ordered step registry.

use serde::{Deserialize, Serialize};

/// Upper bound on the step count. The effective visited path is shorter
/// when the client pays cash (the online-payment step is skipped).
pub const TOTAL_STEPS: u8 = 6;

/// Identifier for a wizard step, in visit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Step 1: pick a service and a stylist.
    ServiceSelection,
    /// Step 2: date, time slot, and contact details.
    AppointmentDetails,
    /// Step 3: optional preferences.
    AdditionalDetails,
    /// Step 4: cash or online.
    PaymentMethod,
    /// Step 5: the online payment form. Only rendered for online payment.
    PaymentProcessing,
    /// Step 6: terminal confirmation screen.
    Confirmation,
}

impl StepId {
    /// All steps in visit order.
    pub const ALL: [Self; TOTAL_STEPS as usize] = [
        Self::ServiceSelection,
        Self::AppointmentDetails,
        Self::AdditionalDetails,
        Self::PaymentMethod,
        Self::PaymentProcessing,
        Self::Confirmation,
    ];

    /// 1-based step number as shown in the step indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::ServiceSelection => 1,
            Self::AppointmentDetails => 2,
            Self::AdditionalDetails => 3,
            Self::PaymentMethod => 4,
            Self::PaymentProcessing => 5,
            Self::Confirmation => 6,
        }
    }

    /// Look a step up by its 1-based number.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::ServiceSelection),
            2 => Some(Self::AppointmentDetails),
            3 => Some(Self::AdditionalDetails),
            4 => Some(Self::PaymentMethod),
            5 => Some(Self::PaymentProcessing),
            6 => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// The step after this one in the full (non-short-path) ordering.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The step before this one.
    #[must_use]
    pub const fn predecessor(self) -> Option<Self> {
        match self.number() {
            0 | 1 => None,
            n => Self::from_number(n - 1),
        }
    }
}

/// Immutable definition of one wizard step.
///
/// The required-field rules are deliberately NOT data here; they are the
/// typed predicates in [`super::gate`], so cross-field conditions read as
/// code instead of configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
}

/// The step registry, defined once.
static STEPS: [StepDefinition; TOTAL_STEPS as usize] = [
    StepDefinition {
        id: StepId::ServiceSelection,
        title: "Service",
        description: "Choose a service and who you'd like to see",
    },
    StepDefinition {
        id: StepId::AppointmentDetails,
        title: "Appointment",
        description: "Pick a date and time, and tell us how to reach you",
    },
    StepDefinition {
        id: StepId::AdditionalDetails,
        title: "Preferences",
        description: "Anything else we should know (optional)",
    },
    StepDefinition {
        id: StepId::PaymentMethod,
        title: "Payment method",
        description: "Pay online now or in person at your appointment",
    },
    StepDefinition {
        id: StepId::PaymentProcessing,
        title: "Payment",
        description: "Complete your payment securely",
    },
    StepDefinition {
        id: StepId::Confirmation,
        title: "Confirmation",
        description: "You're booked",
    },
];

/// All step definitions in visit order.
#[must_use]
pub fn steps() -> &'static [StepDefinition] {
    &STEPS
}

/// The definition for one step.
#[must_use]
pub fn definition(id: StepId) -> &'static StepDefinition {
    STEPS
        .iter()
        .find(|d| d.id == id)
        .expect("registry covers every StepId")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_dense_and_ordered() {
        for (i, step) in StepId::ALL.iter().enumerate() {
            assert_eq!(step.number() as usize, i + 1);
            assert_eq!(StepId::from_number(step.number()), Some(*step));
        }
        assert!(StepId::from_number(0).is_none());
        assert!(StepId::from_number(7).is_none());
    }

    #[test]
    fn test_successor_predecessor_roundtrip() {
        assert_eq!(
            StepId::ServiceSelection.successor(),
            Some(StepId::AppointmentDetails)
        );
        assert!(StepId::Confirmation.successor().is_none());
        assert!(StepId::ServiceSelection.predecessor().is_none());
        for step in StepId::ALL {
            if let Some(next) = step.successor() {
                assert_eq!(next.predecessor(), Some(step));
            }
        }
    }

    #[test]
    fn test_ord_follows_visit_order() {
        assert!(StepId::ServiceSelection < StepId::Confirmation);
        assert!(StepId::PaymentMethod < StepId::PaymentProcessing);
    }

    #[test]
    fn test_registry_matches_ids() {
        assert_eq!(steps().len(), TOTAL_STEPS as usize);
        for step in StepId::ALL {
            assert_eq!(definition(step).id, step);
        }
    }
}
