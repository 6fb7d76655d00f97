//! Payment enums for the booking wizard.

use serde::{Deserialize, Serialize};

/// How the client chose to pay for the appointment.
///
/// Selecting [`PaymentMethod::Cash`] skips the online-payment step of the
/// wizard entirely; the booking is confirmed unpaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Online,
}

/// State of the online payment attempt.
///
/// Absent (`None` on the booking aggregate) means no attempt has been made
/// yet, or the last failed attempt was reset for retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// The payment processor is still working on the charge.
    Processing,
    /// The processor confirmed the charge succeeded.
    Completed,
    /// The processor reported a failure (decline, expiry, ...).
    Failed,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Online => write!(f, "online"),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
