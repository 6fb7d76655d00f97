//! Core types for Marigold.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod payment;

pub use contact::{Email, EmailError, Phone, PhoneError};
pub use id::*;
pub use payment::{PaymentMethod, PaymentStatus};
