//! Session-scoped models.

pub mod session;

pub use session::{WizardSession, session_keys};
