// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Employee
//!
//! Employees are owned by the employee repository. Stages only hold an
//! [`EmployeeRef`]: the id plus a display-name snapshot that may go stale.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Employee entity, association references, payloads

use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::{require_text, require_text_if_present, ValidationError};

string_id!(
    /// Globally unique employee identifier, assigned by the remote store.
    EmployeeId
);

wire_enum!(
    /// Access level used by the session gate.
    PermissionLevel, field = "permission" {
        Admin => "ADMIN" | "Administrador",
        Engineer => "ENGINEER" | "Engenheiro",
        Operator => "OPERATOR" | "Operador",
    }
);

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(skip_serializing, default)]
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub credentials: Credentials,
    pub permission: PermissionLevel,
}

impl Employee {
    pub fn from_draft(id: EmployeeId, draft: EmployeeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
            credentials: draft.credentials,
            permission: draft.permission,
        }
    }

    pub fn apply_patch(&mut self, patch: &EmployeePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(username) = &patch.username {
            self.credentials.username = username.clone();
        }
        if let Some(secret) = &patch.secret {
            self.credentials.secret = secret.clone();
        }
        if let Some(permission) = patch.permission {
            self.permission = permission;
        }
    }
}

/// Non-owning reference from a stage to an employee.
///
/// `id` is authoritative. `name` is a display hint captured when the stage
/// was last fetched. Legacy records may carry only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: Option<EmployeeId>,
    pub name: Option<String>,
}

impl EmployeeRef {
    pub fn of(employee: &Employee) -> Self {
        Self {
            id: Some(employee.id.clone()),
            name: Some(employee.name.clone()),
        }
    }

    pub fn by_id(id: EmployeeId) -> Self {
        Self { id: Some(id), name: None }
    }

    pub fn legacy(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Resolves the reference against the live employee list.
    ///
    /// A reference whose id no longer resolves is reported as orphaned and
    /// keeps its last known name.
    pub fn resolve(&self, employees: &[Employee]) -> ResolvedMember {
        let live = match (&self.id, &self.name) {
            (Some(id), _) => employees.iter().find(|e| &e.id == id),
            (None, Some(name)) => employees.iter().find(|e| &e.name == name),
            (None, None) => None,
        };

        match live {
            Some(employee) => ResolvedMember {
                id: Some(employee.id.clone()),
                name: employee.name.clone(),
                orphaned: false,
            },
            None => ResolvedMember {
                id: self.id.clone(),
                name: self
                    .name
                    .clone()
                    .or_else(|| self.id.as_ref().map(|id| id.to_string()))
                    .unwrap_or_else(|| "(unknown)".to_string()),
                orphaned: true,
            },
        }
    }
}

/// An [`EmployeeRef`] resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMember {
    pub id: Option<EmployeeId>,
    pub name: String,
    pub orphaned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub credentials: Credentials,
    pub permission: PermissionLevel,
}

impl EmployeeDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("username", &self.credentials.username)?;
        require_text("password", &self.credentials.secret)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub permission: Option<PermissionLevel>,
}

impl EmployeePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        require_text_if_present("name", self.name.as_deref())?;
        require_text_if_present("username", self.username.as_deref())?;
        require_text_if_present("password", self.secret.as_deref())
    }
}
