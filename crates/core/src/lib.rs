//! Marigold Core - Booking domain library.
//!
//! This crate holds everything the booking wizard needs that is not I/O:
//! - [`types`] - Newtype IDs, contact types, and payment enums
//! - [`wizard`] - The multi-step booking wizard state machine
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no HTTP, no async,
//! no storage. The `booking` crate owns all network traffic and feeds the
//! state machine through its typed operations, which keeps every gate and
//! transition testable in isolation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod wizard;

pub use types::*;
pub use wizard::{
    BookingData, BookingDataStore, BookingPatch, StepDefinition, StepId, TOTAL_STEPS,
    WizardController, WizardOptions,
};
