// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository contracts defined in
//! `crate::domain::repository`.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Reach the remote aggregate store
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! ## HTTP Repositories
//!
//! One per entity kind, sharing a [`RemoteStoreClient`](crate::infrastructure::remote_client::RemoteStoreClient):
//! - **HttpAircraftRepository** - `/aircraft`
//! - **HttpEmployeeRepository** - `/employees`
//! - **HttpStageRepository** - `/aircraft/{code}/stages` and stage staffing
//! - **HttpPartRepository** - `/aircraft/{code}/parts`
//! - **HttpTestRepository** - `/aircraft/{code}/tests`
//!
//! ## In-Memory Remote Store
//!
//! [`InMemoryRemoteStore`] implements all five contracts over one shared
//! state, with the same status semantics as the HTTP backend (404 for
//! missing entities, 409 for duplicate codes). Used for development and
//! tests; supports latency and failure injection.

pub mod http_aircraft;
pub mod http_employee;
pub mod http_part;
pub mod http_stage;

pub use http_aircraft::HttpAircraftRepository;
pub use http_employee::HttpEmployeeRepository;
pub use http_part::HttpPartRepository;
pub use http_stage::HttpStageRepository;
pub use http_test::HttpTestRepository;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::aircraft::{
    Aircraft, AircraftCategory, AircraftCode, AircraftDraft, AircraftPatch, Part, PartCode,
    PartDraft, PartOrigin, PartPatch, PartStatus, Stage, StageDraft, StageId, StagePatch,
    StageStatus, Test, TestDraft, TestId, TestKind, TestPatch, TestResult,
};
use crate::domain::employee::{
    Credentials, Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeRef, PermissionLevel,
};
use crate::domain::repository::{
    AircraftRepository, EmployeeRepository, PartRepository, Repositories, RepositoryError,
    StageRepository, TestRepository,
};

fn not_found(what: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::remote(Some(404), format!("{what} not found"))
}

fn conflict(what: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::remote(Some(409), format!("{what} already exists"))
}

#[derive(Default)]
struct StoreState {
    aircraft: Vec<Aircraft>,
    employees: Vec<Employee>,
    stage_seq: HashMap<AircraftCode, u64>,
    test_seq: HashMap<AircraftCode, u64>,
    failures: VecDeque<RepositoryError>,
    latency: Option<Duration>,
}

impl StoreState {
    fn aircraft_mut(&mut self, code: &AircraftCode) -> Result<&mut Aircraft, RepositoryError> {
        self.aircraft
            .iter_mut()
            .find(|a| &a.code == code)
            .ok_or_else(|| not_found(format!("aircraft '{code}'")))
    }

    fn next_stage_id(&mut self, code: &AircraftCode) -> Result<StageId, RepositoryError> {
        let highest = self
            .aircraft_mut(code)?
            .stages
            .iter()
            .filter_map(|s| s.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let seq = self.stage_seq.entry(code.clone()).or_insert(highest);
        *seq = (*seq).max(highest) + 1;
        Ok(StageId(seq.to_string()))
    }

    fn next_test_id(&mut self, code: &AircraftCode) -> Result<TestId, RepositoryError> {
        let highest = self
            .aircraft_mut(code)?
            .tests
            .iter()
            .filter_map(|t| t.id.as_str().strip_prefix('T')?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let seq = self.test_seq.entry(code.clone()).or_insert(highest);
        *seq = (*seq).max(highest) + 1;
        Ok(TestId(format!("T{:03}", seq)))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRemoteStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All five repository handles backed by this store.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            aircraft: Arc::new(self.clone()),
            employees: Arc::new(self.clone()),
            stages: Arc::new(self.clone()),
            parts: Arc::new(self.clone()),
            tests: Arc::new(self.clone()),
        }
    }

    pub fn seed_aircraft(&self, aircraft: Aircraft) {
        let mut state = self.state.write();
        state.aircraft.retain(|a| a.code != aircraft.code);
        state.aircraft.push(aircraft);
    }

    pub fn seed_employee(&self, employee: Employee) {
        let mut state = self.state.write();
        state.employees.retain(|e| e.id != employee.id);
        state.employees.push(employee);
    }

    /// The next call on any repository fails with `error`. Queued failures
    /// are consumed in order.
    pub fn fail_next(&self, error: RepositoryError) {
        self.state.write().failures.push_back(error);
    }

    /// Every call waits `latency` before touching the store.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.write().latency = latency;
    }

    /// Current server-side copy of an aircraft.
    pub fn stored_aircraft(&self, code: &AircraftCode) -> Option<Aircraft> {
        self.state.read().aircraft.iter().find(|a| &a.code == code).cloned()
    }

    async fn enter(&self) -> Result<(), RepositoryError> {
        let latency = self.state.read().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.state.write().failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// A small production floor for the `in_memory` backend.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let admin = Employee {
            id: EmployeeId::from("1"),
            name: "Administrador".to_string(),
            phone: "(12) 3000-0000".to_string(),
            address: "Av. Brigadeiro Faria Lima, 1".to_string(),
            credentials: Credentials::new("admin", "password"),
            permission: PermissionLevel::Admin,
        };
        let engineer = Employee {
            id: EmployeeId::from("2"),
            name: "Maria Souza".to_string(),
            phone: "(12) 98888-7777".to_string(),
            address: "Rua das Acácias, 45".to_string(),
            credentials: Credentials::new("marias", "123456"),
            permission: PermissionLevel::Engineer,
        };
        let operator = Employee {
            id: EmployeeId::from("3"),
            name: "João Silva".to_string(),
            phone: "(12) 97777-6666".to_string(),
            address: "Rua dos Ipês, 12".to_string(),
            credentials: Credentials::new("joaos", "123456"),
            permission: PermissionLevel::Operator,
        };

        let now = Utc::now();
        let commercial = Aircraft {
            code: AircraftCode::from("E195"),
            model: "E195-E2".to_string(),
            category: AircraftCategory::Commercial,
            capacity: 146,
            range_km: 4800,
            stages: vec![
                Stage {
                    id: StageId::from("1"),
                    name: "Fuselagem".to_string(),
                    deadline: NaiveDate::from_ymd_opt(2026, 11, 30),
                    status: StageStatus::InProgress,
                    started_at: NaiveDate::from_ymd_opt(2026, 9, 1),
                    finished_at: None,
                    employees: vec![EmployeeRef::of(&engineer), EmployeeRef::of(&operator)],
                },
                Stage {
                    id: StageId::from("2"),
                    name: "Pintura".to_string(),
                    deadline: NaiveDate::from_ymd_opt(2027, 1, 15),
                    status: StageStatus::Pending,
                    started_at: None,
                    finished_at: None,
                    employees: vec![EmployeeRef::of(&operator)],
                },
            ],
            parts: vec![
                Part {
                    code: PartCode::from("P-100"),
                    name: "Turbina PW1900G".to_string(),
                    origin: PartOrigin::Imported,
                    supplier: "Pratt & Whitney".to_string(),
                    status: PartStatus::InTransit,
                },
                Part {
                    code: PartCode::from("P-200"),
                    name: "Trem de pouso".to_string(),
                    origin: PartOrigin::Domestic,
                    supplier: "Eleb".to_string(),
                    status: PartStatus::Ready,
                },
            ],
            tests: vec![Test {
                id: TestId::from("T001"),
                kind: TestKind::Electrical,
                result: TestResult::Approved,
                performed_at: Some(now),
            }],
            created_at: Some(now),
            updated_at: Some(now),
        };
        let military = Aircraft {
            code: AircraftCode::from("KC390"),
            model: "C-390 Millennium".to_string(),
            category: AircraftCategory::Military,
            capacity: 80,
            range_km: 5820,
            stages: vec![Stage {
                id: StageId::from("1"),
                name: "Montagem das asas".to_string(),
                deadline: NaiveDate::from_ymd_opt(2026, 12, 20),
                status: StageStatus::Pending,
                started_at: None,
                finished_at: None,
                employees: vec![EmployeeRef::of(&engineer)],
            }],
            parts: Vec::new(),
            tests: vec![Test {
                id: TestId::from("T001"),
                kind: TestKind::Hydraulic,
                result: TestResult::NotPerformed,
                performed_at: None,
            }],
            created_at: Some(now),
            updated_at: Some(now),
        };

        for employee in [admin, engineer, operator] {
            store.seed_employee(employee);
        }
        store.seed_aircraft(commercial);
        store.seed_aircraft(military);
        store
    }
}

#[async_trait]
impl AircraftRepository for InMemoryRemoteStore {
    async fn list(&self) -> Result<Vec<Aircraft>, RepositoryError> {
        self.enter().await?;
        Ok(self.state.read().aircraft.clone())
    }

    async fn get(&self, code: &AircraftCode) -> Result<Aircraft, RepositoryError> {
        self.enter().await?;
        self.stored_aircraft(code)
            .ok_or_else(|| not_found(format!("aircraft '{code}'")))
    }

    async fn create(&self, draft: &AircraftDraft) -> Result<Aircraft, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        if state.aircraft.iter().any(|a| a.code == draft.code) {
            return Err(conflict(format!("aircraft '{}'", draft.code)));
        }
        let aircraft = Aircraft::from_draft(draft.clone(), Utc::now());
        state.aircraft.push(aircraft.clone());
        Ok(aircraft)
    }

    async fn update(&self, code: &AircraftCode, patch: &AircraftPatch) -> Result<Aircraft, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let aircraft = state.aircraft_mut(code)?;
        aircraft.apply_patch(patch, Utc::now());
        Ok(aircraft.clone())
    }

    async fn delete(&self, code: &AircraftCode) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let before = state.aircraft.len();
        state.aircraft.retain(|a| &a.code != code);
        if state.aircraft.len() == before {
            return Err(not_found(format!("aircraft '{code}'")));
        }
        state.stage_seq.remove(code);
        state.test_seq.remove(code);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRemoteStore {
    async fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        self.enter().await?;
        Ok(self.state.read().employees.clone())
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee, RepositoryError> {
        self.enter().await?;
        self.state
            .read()
            .employees
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| not_found(format!("employee '{id}'")))
    }

    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, RepositoryError> {
        self.enter().await?;
        let employee = Employee::from_draft(EmployeeId::new(Uuid::new_v4().to_string()), draft.clone());
        self.state.write().employees.push(employee.clone());
        Ok(employee)
    }

    async fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<Employee, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let employee = state
            .employees
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| not_found(format!("employee '{id}'")))?;
        employee.apply_patch(patch);
        Ok(employee.clone())
    }

    /// Stage references to the employee are kept.
    async fn delete(&self, id: &EmployeeId) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let before = state.employees.len();
        state.employees.retain(|e| &e.id != id);
        if state.employees.len() == before {
            return Err(not_found(format!("employee '{id}'")));
        }
        Ok(())
    }
}

#[async_trait]
impl StageRepository for InMemoryRemoteStore {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Stage>, RepositoryError> {
        self.enter().await?;
        Ok(self.state.write().aircraft_mut(aircraft)?.stages.clone())
    }

    async fn create(&self, aircraft: &AircraftCode, draft: &StageDraft) -> Result<Stage, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let id = state.next_stage_id(aircraft)?;
        let stage = Stage::from_draft(id, draft.clone());
        let parent = state.aircraft_mut(aircraft)?;
        parent.stages.push(stage.clone());
        parent.updated_at = Some(Utc::now());
        Ok(stage)
    }

    async fn update(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        patch: &StagePatch,
    ) -> Result<Stage, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let target = state
            .aircraft_mut(aircraft)?
            .stages
            .iter_mut()
            .find(|s| &s.id == stage)
            .ok_or_else(|| not_found(format!("stage '{aircraft}/{stage}'")))?;
        target.apply_patch(patch);
        Ok(target.clone())
    }

    async fn delete(&self, aircraft: &AircraftCode, stage: &StageId) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let parent = state.aircraft_mut(aircraft)?;
        let before = parent.stages.len();
        parent.stages.retain(|s| &s.id != stage);
        if parent.stages.len() == before {
            return Err(not_found(format!("stage '{aircraft}/{stage}'")));
        }
        Ok(())
    }

    /// Idempotent: attaching a current member changes nothing.
    async fn attach_employee(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let member = state
            .employees
            .iter()
            .find(|e| &e.id == employee)
            .map(EmployeeRef::of)
            .ok_or_else(|| not_found(format!("employee '{employee}'")))?;
        let target = state
            .aircraft_mut(aircraft)?
            .stages
            .iter_mut()
            .find(|s| &s.id == stage)
            .ok_or_else(|| not_found(format!("stage '{aircraft}/{stage}'")))?;
        if !target.has_employee(employee) {
            target.employees.push(member);
        }
        Ok(())
    }

    async fn detach_employee(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let target = state
            .aircraft_mut(aircraft)?
            .stages
            .iter_mut()
            .find(|s| &s.id == stage)
            .ok_or_else(|| not_found(format!("stage '{aircraft}/{stage}'")))?;
        if !target.has_employee(employee) {
            return Err(not_found(format!("employee '{employee}' on stage '{stage}'")));
        }
        target.employees.retain(|e| e.id.as_ref() != Some(employee));
        Ok(())
    }
}

#[async_trait]
impl PartRepository for InMemoryRemoteStore {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Part>, RepositoryError> {
        self.enter().await?;
        Ok(self.state.write().aircraft_mut(aircraft)?.parts.clone())
    }

    async fn create(&self, aircraft: &AircraftCode, draft: &PartDraft) -> Result<Part, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let parent = state.aircraft_mut(aircraft)?;
        if parent.part(&draft.code).is_some() {
            return Err(conflict(format!("part '{aircraft}/{}'", draft.code)));
        }
        let part = Part::from_draft(draft.clone());
        parent.parts.push(part.clone());
        parent.updated_at = Some(Utc::now());
        Ok(part)
    }

    async fn update(
        &self,
        aircraft: &AircraftCode,
        part: &PartCode,
        patch: &PartPatch,
    ) -> Result<Part, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let target = state
            .aircraft_mut(aircraft)?
            .parts
            .iter_mut()
            .find(|p| &p.code == part)
            .ok_or_else(|| not_found(format!("part '{aircraft}/{part}'")))?;
        target.apply_patch(patch);
        Ok(target.clone())
    }

    async fn delete(&self, aircraft: &AircraftCode, part: &PartCode) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let parent = state.aircraft_mut(aircraft)?;
        let before = parent.parts.len();
        parent.parts.retain(|p| &p.code != part);
        if parent.parts.len() == before {
            return Err(not_found(format!("part '{aircraft}/{part}'")));
        }
        Ok(())
    }
}

#[async_trait]
impl TestRepository for InMemoryRemoteStore {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Test>, RepositoryError> {
        self.enter().await?;
        Ok(self.state.write().aircraft_mut(aircraft)?.tests.clone())
    }

    async fn create(&self, aircraft: &AircraftCode, draft: &TestDraft) -> Result<Test, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let id = state.next_test_id(aircraft)?;
        let test = Test::from_draft(id, draft.clone());
        let parent = state.aircraft_mut(aircraft)?;
        parent.tests.push(test.clone());
        parent.updated_at = Some(Utc::now());
        Ok(test)
    }

    async fn update(
        &self,
        aircraft: &AircraftCode,
        test: &TestId,
        patch: &TestPatch,
    ) -> Result<Test, RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let target = state
            .aircraft_mut(aircraft)?
            .tests
            .iter_mut()
            .find(|t| &t.id == test)
            .ok_or_else(|| not_found(format!("test '{aircraft}/{test}'")))?;
        target.apply_patch(patch, Utc::now());
        Ok(target.clone())
    }

    async fn delete(&self, aircraft: &AircraftCode, test: &TestId) -> Result<(), RepositoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let parent = state.aircraft_mut(aircraft)?;
        let before = parent.tests.len();
        parent.tests.retain(|t| &t.id != test);
        if parent.tests.len() == before {
            return Err(not_found(format!("test '{aircraft}/{test}'")));
        }
        Ok(())
    }
}
