// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! One repository per entity kind, defined here and implemented in
//! `crate::infrastructure::repositories`. Every method either returns the
//! domain-shaped result or fails with a [`RepositoryError`].
//!
//! | Trait | Entity | Implementations |
//! |-------|--------|----------------|
//! | `AircraftRepository` | `Aircraft` aggregate | `HttpAircraftRepository`, `InMemoryRemoteStore` |
//! | `EmployeeRepository` | `Employee` | `HttpEmployeeRepository`, `InMemoryRemoteStore` |
//! | `StageRepository` | `Stage` + staffing | `HttpStageRepository`, `InMemoryRemoteStore` |
//! | `PartRepository` | `Part` | `HttpPartRepository`, `InMemoryRemoteStore` |
//! | `TestRepository` | `Test` | `HttpTestRepository`, `InMemoryRemoteStore` |
//!
//! Stage, part and test endpoints are sub-resources of an aircraft and are
//! exposed independently of the parent, which is why the coordinator
//! re-fetches the parent after every child mutation.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::domain::aircraft::{
    Aircraft, AircraftCode, AircraftDraft, AircraftPatch, Part, PartCode, PartDraft, PartPatch,
    Stage, StageDraft, StageId, StagePatch, Test, TestDraft, TestId, TestPatch,
};
use crate::domain::employee::{Employee, EmployeeDraft, EmployeeId, EmployeePatch};

/// Granularity at which loading and error state is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Aircraft,
    Employee,
    Stage,
    Part,
    Test,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Aircraft,
        EntityKind::Employee,
        EntityKind::Stage,
        EntityKind::Part,
        EntityKind::Test,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Aircraft => "aircraft",
            EntityKind::Employee => "employee",
            EntityKind::Stage => "stage",
            EntityKind::Part => "part",
            EntityKind::Test => "test",
        })
    }
}

#[async_trait]
pub trait AircraftRepository: Send + Sync {
    /// List every aircraft with its nested collections
    async fn list(&self) -> Result<Vec<Aircraft>, RepositoryError>;

    /// Fetch one aircraft aggregate
    async fn get(&self, code: &AircraftCode) -> Result<Aircraft, RepositoryError>;

    async fn create(&self, draft: &AircraftDraft) -> Result<Aircraft, RepositoryError>;

    async fn update(&self, code: &AircraftCode, patch: &AircraftPatch) -> Result<Aircraft, RepositoryError>;

    async fn delete(&self, code: &AircraftCode) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, RepositoryError>;

    async fn get(&self, id: &EmployeeId) -> Result<Employee, RepositoryError>;

    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, RepositoryError>;

    async fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<Employee, RepositoryError>;

    async fn delete(&self, id: &EmployeeId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait StageRepository: Send + Sync {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Stage>, RepositoryError>;

    async fn create(&self, aircraft: &AircraftCode, draft: &StageDraft) -> Result<Stage, RepositoryError>;

    async fn update(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        patch: &StagePatch,
    ) -> Result<Stage, RepositoryError>;

    async fn delete(&self, aircraft: &AircraftCode, stage: &StageId) -> Result<(), RepositoryError>;

    /// Associate an employee with a stage
    async fn attach_employee(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> Result<(), RepositoryError>;

    /// Remove an employee association from a stage
    async fn detach_employee(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait PartRepository: Send + Sync {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Part>, RepositoryError>;

    async fn create(&self, aircraft: &AircraftCode, draft: &PartDraft) -> Result<Part, RepositoryError>;

    async fn update(
        &self,
        aircraft: &AircraftCode,
        part: &PartCode,
        patch: &PartPatch,
    ) -> Result<Part, RepositoryError>;

    async fn delete(&self, aircraft: &AircraftCode, part: &PartCode) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Test>, RepositoryError>;

    async fn create(&self, aircraft: &AircraftCode, draft: &TestDraft) -> Result<Test, RepositoryError>;

    async fn update(
        &self,
        aircraft: &AircraftCode,
        test: &TestId,
        patch: &TestPatch,
    ) -> Result<Test, RepositoryError>;

    async fn delete(&self, aircraft: &AircraftCode, test: &TestId) -> Result<(), RepositoryError>;
}

/// The five repository handles the coordinator is composed from.
#[derive(Clone)]
pub struct Repositories {
    pub aircraft: Arc<dyn AircraftRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub stages: Arc<dyn StageRepository>,
    pub parts: Arc<dyn PartRepository>,
    pub tests: Arc<dyn TestRepository>,
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Transport failure, non-2xx status or malformed body.
    #[error("{message}")]
    Remote { status: Option<u16>, message: String },

    /// A decoded value outside the known domain.
    #[error("schema mismatch: field '{field}' has unexpected value '{value}'")]
    SchemaMismatch { field: &'static str, value: String },
}

impl RepositoryError {
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        RepositoryError::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn schema(field: &'static str, value: impl Into<String>) -> Self {
        RepositoryError::SchemaMismatch {
            field,
            value: value.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RepositoryError::Remote { status, .. } => *status,
            RepositoryError::SchemaMismatch { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::remote(None, format!("malformed response body: {}", err))
    }
}
