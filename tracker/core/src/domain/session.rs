// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Session Gate Contract
//!
//! The session gate is an external collaborator that supplies the identity
//! and permission context. The coordinator only reads it to decide whether
//! an operation is permitted; it never mutates it.
//!
//! | Level | Permitted operations |
//! |-------|----------------------|
//! | `Admin` | everything |
//! | `Engineer` | everything except employee create/update/delete |
//! | `Operator` | update of stages, parts and tests |
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Session context, operation policy, gate trait

use std::fmt;
use thiserror::Error;

use super::employee::{Employee, PermissionLevel};
use super::repository::EntityKind;

#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub username: String,
    pub permission: PermissionLevel,
    /// Bearer token presented to the remote store.
    pub token: Option<String>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("username", &self.username)
            .field("permission", &self.permission)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create(EntityKind),
    Update(EntityKind),
    Delete(EntityKind),
    /// Adding or removing an employee from a stage.
    Associate,
}

impl Operation {
    pub fn is_permitted_for(&self, level: PermissionLevel) -> bool {
        match level {
            PermissionLevel::Admin => true,
            PermissionLevel::Engineer => !matches!(
                self,
                Operation::Create(EntityKind::Employee)
                    | Operation::Update(EntityKind::Employee)
                    | Operation::Delete(EntityKind::Employee)
            ),
            PermissionLevel::Operator => matches!(
                self,
                Operation::Update(EntityKind::Stage)
                    | Operation::Update(EntityKind::Part)
                    | Operation::Update(EntityKind::Test)
            ),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create(kind) => write!(f, "create {kind}"),
            Operation::Update(kind) => write!(f, "update {kind}"),
            Operation::Delete(kind) => write!(f, "delete {kind}"),
            Operation::Associate => f.write_str("change stage staffing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("no active session")]
    Unauthenticated,

    #[error("permission {permission} may not {operation}")]
    PermissionDenied {
        operation: Operation,
        permission: PermissionLevel,
    },
}

/// Identity and permission source consulted before every guarded operation.
pub trait SessionGate: Send + Sync {
    fn current(&self) -> Option<SessionContext>;

    fn authorize(&self, operation: Operation) -> Result<SessionContext, AccessError> {
        let session = self.current().ok_or(AccessError::Unauthenticated)?;
        if operation.is_permitted_for(session.permission) {
            Ok(session)
        } else {
            Err(AccessError::PermissionDenied {
                operation,
                permission: session.permission,
            })
        }
    }
}

/// Builds a session from the credentials of a known employee.
pub fn authenticate(
    employees: &[Employee],
    username: &str,
    secret: &str,
) -> Option<SessionContext> {
    employees
        .iter()
        .find(|e| e.credentials.username == username && e.credentials.secret == secret)
        .map(|e| SessionContext {
            username: e.credentials.username.clone(),
            permission: e.permission,
            token: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::{Credentials, EmployeeId};

    struct FixedGate(Option<SessionContext>);

    impl SessionGate for FixedGate {
        fn current(&self) -> Option<SessionContext> {
            self.0.clone()
        }
    }

    fn session(permission: PermissionLevel) -> SessionContext {
        SessionContext {
            username: "tester".to_string(),
            permission,
            token: Some("secret-token".to_string()),
        }
    }

    #[test]
    fn test_engineer_cannot_manage_employees() {
        let gate = FixedGate(Some(session(PermissionLevel::Engineer)));
        assert!(gate.authorize(Operation::Create(EntityKind::Aircraft)).is_ok());
        assert!(matches!(
            gate.authorize(Operation::Delete(EntityKind::Employee)),
            Err(AccessError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_operator_may_only_update_children() {
        let level = PermissionLevel::Operator;
        assert!(Operation::Update(EntityKind::Stage).is_permitted_for(level));
        assert!(Operation::Update(EntityKind::Test).is_permitted_for(level));
        assert!(!Operation::Create(EntityKind::Stage).is_permitted_for(level));
        assert!(!Operation::Update(EntityKind::Aircraft).is_permitted_for(level));
        assert!(!Operation::Associate.is_permitted_for(level));
    }

    #[test]
    fn test_missing_session_is_unauthenticated() {
        let gate = FixedGate(None);
        assert_eq!(
            gate.authorize(Operation::Associate),
            Err(AccessError::Unauthenticated)
        );
    }

    #[test]
    fn test_authenticate_matches_credentials() {
        let staff = vec![Employee {
            id: EmployeeId::from("1"),
            name: "Admin".to_string(),
            phone: String::new(),
            address: String::new(),
            credentials: Credentials::new("admin", "password"),
            permission: PermissionLevel::Admin,
        }];

        assert!(authenticate(&staff, "admin", "password").is_some());
        assert!(authenticate(&staff, "admin", "wrong").is_none());
    }

    #[test]
    fn test_session_debug_hides_token() {
        let rendered = format!("{:?}", session(PermissionLevel::Admin));
        assert!(!rendered.contains("secret-token"));
    }
}
