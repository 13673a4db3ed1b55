// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Entities, caller payloads and the contracts the application layer is
//! written against.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Aircraft aggregate, employees, repository and session seams

/// String-backed identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

/// Closed enumeration with a fixed wire spelling per variant.
///
/// `from_wire` is the only way a wire string becomes a domain value, so an
/// unknown spelling can never be coerced into a default variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Wire field this enumeration is decoded from.
            pub const FIELD: &'static str = $field;

            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_wire(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn from_wire(raw: &str) -> Option<Self> {
                match raw {
                    $($wire $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }
    };
}

pub mod validation;
pub mod employee;
pub mod aircraft;
pub mod statistics;
pub mod session;
pub mod repository;
pub mod client_config;

pub use aircraft::{
    Aircraft, AircraftCategory, AircraftCode, AircraftDraft, AircraftFields, AircraftPatch, Part,
    PartCode, PartDraft, PartOrigin, PartPatch, PartQuery, PartStatus, Stage, StageDraft, StageId,
    StagePatch, StageStatus, Test, TestDraft, TestId, TestKind, TestPatch, TestResult,
};
pub use employee::{
    Credentials, Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeRef, PermissionLevel,
    ResolvedMember,
};
pub use repository::{EntityKind, RepositoryError};
pub use session::{Operation, SessionContext, SessionGate};
pub use validation::ValidationError;
