//! Newtype IDs for type-safe entity references.
//!
//! Two macro families cover the two kinds of identifiers in the system:
//! `define_id!` wraps the numeric ids minted by the scheduling backend,
//! and `define_handle!` wraps the opaque string ids owned by the catalog
//! and payment upstreams. Mixing ids from different entity types is a
//! compile error either way.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe numeric ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use marigold_core::define_id;
/// define_id!(InvoiceId);
/// define_id!(ReceiptId);
///
/// let invoice_id = InvoiceId::new(1);
/// let receipt_id = ReceiptId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = receipt_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define a type-safe string ID wrapper.
///
/// External services hand us opaque string identifiers; these wrappers
/// keep a service id from ever being passed where a stylist id belongs.
#[macro_export]
macro_rules! define_handle {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Appointment ids are minted server-side by the confirmation endpoint.
define_id!(AppointmentId);

define_handle!(ServiceId);
define_handle!(StylistId);
define_handle!(PaymentIntentId);

impl StylistId {
    /// Sentinel stylist id meaning "no preference".
    ///
    /// Also auto-assigned when a business has no stylists at all, so the
    /// service-selection gate never dead-ends on an empty roster.
    pub const ANY: &'static str = "any";

    /// The "no preference" stylist.
    #[must_use]
    pub fn any() -> Self {
        Self(Self::ANY.to_owned())
    }

    /// Whether this is the "no preference" sentinel.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_id_roundtrip() {
        let id = AppointmentId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(AppointmentId::from(42), id);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn test_handle_serde_transparent() {
        let id = ServiceId::new("svc1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"svc1\"");

        let parsed: ServiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_stylist_any_sentinel() {
        assert!(StylistId::any().is_any());
        assert!(!StylistId::new("sty_9").is_any());
        assert_eq!(StylistId::any().as_str(), "any");
    }
}
