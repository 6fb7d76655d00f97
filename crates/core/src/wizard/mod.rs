//! The multi-step booking wizard state machine.
//!
//! A booking session walks a client through six ordered steps, from
//! service selection to a terminal confirmation screen. The pieces:
//!
//! - [`data`] - the `BookingData` aggregate and its merge-update store
//! - [`steps`] - the fixed, ordered step registry
//! - [`gate`] - pure per-step completion predicates
//! - [`controller`] - navigation (next/previous/jump) subject to the gate
//!
//! Everything here is synchronous and side-effect free; the payment
//! sub-flow and the confirmation call live in the `booking` crate and
//! feed their results back in through typed operations.

pub mod controller;
pub mod data;
pub mod gate;
pub mod steps;

pub use controller::{WizardController, WizardOptions};
pub use data::{BookingData, BookingDataStore, BookingPatch};
pub use steps::{StepDefinition, StepId, TOTAL_STEPS};
