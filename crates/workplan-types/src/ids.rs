//! Type-safe identifier wrappers.
//!
//! Generated identifiers (timelines, events, correlation groups) wrap a
//! [`Uuid`] v7 so they sort roughly by creation time in the database.
//! Identifiers that come from upstream systems (prison numbers, prison
//! codes) are opaque strings because those systems do not guarantee a
//! uniform format.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around an upstream string code.
macro_rules! define_code {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(String);

        impl $name {
            /// Wrap an upstream code.
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            /// Borrow the code as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned code.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self(code.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self(code)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a timeline aggregate.
    TimelineId
}

define_id! {
    /// Unique identifier for a single timeline event.
    TimelineEventId
}

define_id! {
    /// Grouping key shared by every event produced by one business action.
    CorrelationId
}

define_code! {
    /// Identifier of the person a timeline belongs to, e.g. `A1234BC`.
    PrisonNumber
}

define_code! {
    /// Code of the prison an event happened in, e.g. `BXI`.
    PrisonId
}

impl PrisonNumber {
    /// Whether the number has the `A1234BC` shape: one letter, four digits,
    /// two letters.
    pub fn is_well_formed(&self) -> bool {
        let mut chars = self.0.chars();
        let leading = chars.by_ref().take(1).all(|c| c.is_ascii_uppercase());
        let digits = chars.by_ref().take(4).all(|c| c.is_ascii_digit());
        let trailing = chars.by_ref().take(2).all(|c| c.is_ascii_uppercase());
        self.0.len() == 7 && leading && digits && trailing && chars.next().is_none()
    }
}
