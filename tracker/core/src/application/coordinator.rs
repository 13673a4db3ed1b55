// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain Coordinator
//!
//! Mediates every mutation of the aircraft and employee aggregates against
//! the remote store and keeps the [`AggregateCache`] consistent with the
//! authoritative responses.
//!
//! # Operation lifecycle
//!
//! 1. Preconditions (session permission, payload validation, cached parent
//!    and target) are checked synchronously. Failing them returns an error
//!    without touching shared state.
//! 2. The kind's pending count is raised and the repository call is awaited.
//!    Readers keep seeing the previous state.
//! 3. The response is applied and the kind status settled inside one write
//!    critical section. On failure the cache is left as-is and a kind-scoped
//!    message such as `failed to update aircraft: <cause>` is stored.
//!
//! Stage, part and test mutations re-fetch the parent aircraft after the
//! sub-resource call and replace exactly the mutated collection.
//!
//! Dropping an operation future mid-flight releases the pending count
//! without recording an error. Concurrent mutations of the same key are not
//! serialized; the last response to land wins.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates repositories, session gate and cache

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use scopeguard::ScopeGuard;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::cache::{AggregateCache, CacheEventReceiver, KindStatus};
use crate::domain::aircraft::{
    Aircraft, AircraftCategory, AircraftCode, AircraftDraft, AircraftFields, AircraftPatch, Part,
    PartCode, PartDraft, PartPatch, PartQuery, Stage, StageDraft, StageId, StagePatch, Test,
    TestDraft, TestId, TestKind, TestPatch, TestResult,
};
use crate::domain::employee::{Employee, EmployeeDraft, EmployeeId, EmployeePatch, ResolvedMember};
use crate::domain::repository::{EntityKind, Repositories, RepositoryError};
use crate::domain::session::{AccessError, Operation, SessionContext, SessionGate};
use crate::domain::statistics::{AircraftStatistics, FleetSummary};
use crate::domain::validation::ValidationError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Remote(#[from] RepositoryError),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: EntityKind, key: String },

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("operation cancelled")]
    Cancelled,
}

impl CoordinatorError {
    fn not_found(entity: EntityKind, key: impl ToString) -> Self {
        CoordinatorError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

pub struct DomainCoordinator {
    repositories: Repositories,
    session: Arc<dyn SessionGate>,
    cache: Arc<RwLock<AggregateCache>>,
}

impl DomainCoordinator {
    pub fn new(repositories: Repositories, session: Arc<dyn SessionGate>) -> Self {
        Self::with_cache(
            repositories,
            session,
            Arc::new(RwLock::new(AggregateCache::new())),
        )
    }

    pub fn with_cache(
        repositories: Repositories,
        session: Arc<dyn SessionGate>,
        cache: Arc<RwLock<AggregateCache>>,
    ) -> Self {
        Self {
            repositories,
            session,
            cache,
        }
    }

    /// Runs one repository call under the kind's pending count and applies
    /// the response in the same critical section that settles the status.
    async fn tracked<T, R, Fut, A>(
        &self,
        kind: EntityKind,
        action: &'static str,
        cancel: Option<&CancellationToken>,
        call: Fut,
        apply: A,
    ) -> CoordinatorResult<R>
    where
        Fut: Future<Output = Result<T, RepositoryError>>,
        A: FnOnce(&mut AggregateCache, T) -> R,
    {
        self.cache.write().begin(kind);
        let pending = scopeguard::guard(Arc::clone(&self.cache), move |cache| {
            cache.write().abandon(kind);
        });

        let cancelled = async {
            match cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        let outcome = tokio::select! {
            _ = cancelled => None,
            result = call => Some(result),
        };

        let cache = ScopeGuard::into_inner(pending);
        let mut cache = cache.write();

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            debug!(kind = %kind, action, "Dropping response of cancelled operation");
            cache.abandon(kind);
            return Err(CoordinatorError::Cancelled);
        }

        match outcome {
            Some(Ok(value)) => {
                let applied = apply(&mut cache, value);
                cache.settle_ok(kind);
                Ok(applied)
            }
            Some(Err(err)) => {
                warn!(kind = %kind, action, error = %err, "Remote operation failed");
                cache.settle_err(kind, format!("failed to {action} {kind}: {err}"));
                Err(err.into())
            }
            None => {
                cache.abandon(kind);
                Err(CoordinatorError::Cancelled)
            }
        }
    }

    /// Runs a sub-resource call, then re-reads the parent aggregate.
    async fn with_parent<T>(
        &self,
        code: &AircraftCode,
        call: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<(T, Aircraft), RepositoryError> {
        let value = call.await?;
        let parent = self.repositories.aircraft.get(code).await?;
        Ok((value, parent))
    }

    fn require_session(&self) -> Result<SessionContext, AccessError> {
        self.session.current().ok_or(AccessError::Unauthenticated)
    }

    fn cached_aircraft(&self, code: &AircraftCode) -> CoordinatorResult<Aircraft> {
        self.cache
            .read()
            .aircraft_by_code(code)
            .cloned()
            .ok_or_else(|| CoordinatorError::not_found(EntityKind::Aircraft, code))
    }

    fn require_employee(&self, id: &EmployeeId) -> CoordinatorResult<()> {
        if self.cache.read().employee_by_id(id).is_some() {
            Ok(())
        } else {
            Err(CoordinatorError::not_found(EntityKind::Employee, id))
        }
    }

    // ========================================================================
    // Loads
    // ========================================================================

    /// Replaces the cached aircraft list with the remote listing.
    pub async fn load_aircraft(&self, cancel: &CancellationToken) -> CoordinatorResult<usize> {
        self.require_session()?;
        let repo = &self.repositories.aircraft;
        self.tracked(EntityKind::Aircraft, "load", Some(cancel), repo.list(), |cache, list| {
            cache.replace_aircraft_list(list);
            let count = cache.aircraft().len();
            info!(count, "Loaded aircraft");
            count
        })
        .await
    }

    pub async fn load_employees(&self, cancel: &CancellationToken) -> CoordinatorResult<usize> {
        self.require_session()?;
        let repo = &self.repositories.employees;
        self.tracked(EntityKind::Employee, "load", Some(cancel), repo.list(), |cache, list| {
            cache.replace_employee_list(list);
            let count = cache.employees().len();
            info!(count, "Loaded employees");
            count
        })
        .await
    }

    /// Loads both lists concurrently. Each kind settles independently.
    pub async fn load_all(&self, cancel: &CancellationToken) -> CoordinatorResult<()> {
        let (aircraft, employees) =
            futures::future::join(self.load_aircraft(cancel), self.load_employees(cancel)).await;
        aircraft?;
        employees?;
        Ok(())
    }

    /// Re-reads one aggregate and upserts it.
    pub async fn refresh_aircraft(&self, code: &AircraftCode) -> CoordinatorResult<Aircraft> {
        self.require_session()?;
        let repo = &self.repositories.aircraft;
        self.tracked(EntityKind::Aircraft, "refresh", None, repo.get(code), |cache, aircraft| {
            cache.upsert_aircraft(aircraft.clone());
            aircraft
        })
        .await
    }

    // ========================================================================
    // Aircraft
    // ========================================================================

    pub async fn create_aircraft(&self, draft: AircraftDraft) -> CoordinatorResult<Aircraft> {
        self.session.authorize(Operation::Create(EntityKind::Aircraft))?;
        draft.validate()?;
        if self.cache.read().aircraft_by_code(&draft.code).is_some() {
            return Err(ValidationError::DuplicateCode(draft.code.to_string()).into());
        }

        let repo = &self.repositories.aircraft;
        self.tracked(EntityKind::Aircraft, "create", None, repo.create(&draft), |cache, created| {
            info!(code = %created.code, model = %created.model, "Aircraft created");
            cache.upsert_aircraft(created.clone());
            created
        })
        .await
    }

    pub async fn update_aircraft(
        &self,
        code: &AircraftCode,
        patch: AircraftPatch,
    ) -> CoordinatorResult<Aircraft> {
        self.session.authorize(Operation::Update(EntityKind::Aircraft))?;
        patch.validate()?;
        self.cached_aircraft(code)?;

        let repo = &self.repositories.aircraft;
        self.tracked(EntityKind::Aircraft, "update", None, repo.update(code, &patch), |cache, updated| {
            info!(code = %updated.code, "Aircraft updated");
            cache.upsert_aircraft(updated.clone());
            updated
        })
        .await
    }

    /// Idempotent: a server 404 counts as success.
    pub async fn delete_aircraft(&self, code: &AircraftCode) -> CoordinatorResult<()> {
        self.session.authorize(Operation::Delete(EntityKind::Aircraft))?;

        let repo = &self.repositories.aircraft;
        let call = async {
            match repo.delete(code).await {
                Err(err) if err.is_not_found() => {
                    debug!(code = %code, "Aircraft already absent on the remote store");
                    Ok(())
                }
                other => other,
            }
        };
        self.tracked(EntityKind::Aircraft, "delete", None, call, |cache, ()| {
            if cache.remove_aircraft(code) {
                info!(code = %code, "Aircraft deleted");
            }
        })
        .await
    }

    // ========================================================================
    // Employees
    // ========================================================================

    pub async fn create_employee(&self, draft: EmployeeDraft) -> CoordinatorResult<Employee> {
        self.session.authorize(Operation::Create(EntityKind::Employee))?;
        draft.validate()?;

        let repo = &self.repositories.employees;
        self.tracked(EntityKind::Employee, "create", None, repo.create(&draft), |cache, created| {
            info!(id = %created.id, name = %created.name, "Employee created");
            cache.upsert_employee(created.clone());
            created
        })
        .await
    }

    pub async fn update_employee(
        &self,
        id: &EmployeeId,
        patch: EmployeePatch,
    ) -> CoordinatorResult<Employee> {
        self.session.authorize(Operation::Update(EntityKind::Employee))?;
        patch.validate()?;
        self.require_employee(id)?;

        let repo = &self.repositories.employees;
        self.tracked(EntityKind::Employee, "update", None, repo.update(id, &patch), |cache, updated| {
            info!(id = %updated.id, "Employee updated");
            cache.upsert_employee(updated.clone());
            updated
        })
        .await
    }

    /// Idempotent: a server 404 counts as success. Stage references to the
    /// employee are left in place and resolve as orphaned.
    pub async fn delete_employee(&self, id: &EmployeeId) -> CoordinatorResult<()> {
        self.session.authorize(Operation::Delete(EntityKind::Employee))?;

        let repo = &self.repositories.employees;
        let call = async {
            match repo.delete(id).await {
                Err(err) if err.is_not_found() => Ok(()),
                other => other,
            }
        };
        self.tracked(EntityKind::Employee, "delete", None, call, |cache, ()| {
            if cache.remove_employee(id) {
                info!(id = %id, "Employee deleted");
            }
        })
        .await
    }

    // ========================================================================
    // Stages
    // ========================================================================

    pub async fn create_stage(
        &self,
        code: &AircraftCode,
        draft: StageDraft,
    ) -> CoordinatorResult<Stage> {
        self.session.authorize(Operation::Create(EntityKind::Stage))?;
        draft.validate()?;
        self.cached_aircraft(code)?;

        let call = self.with_parent(code, self.repositories.stages.create(code, &draft));
        self.tracked(EntityKind::Stage, "create", None, call, |cache, (stage, parent)| {
            info!(code = %code, stage = %stage.id, "Stage created");
            cache.patch_aircraft(code, AircraftFields::stages(parent.stages));
            stage
        })
        .await
    }

    pub async fn update_stage(
        &self,
        code: &AircraftCode,
        stage: &StageId,
        patch: StagePatch,
    ) -> CoordinatorResult<Stage> {
        self.session.authorize(Operation::Update(EntityKind::Stage))?;
        patch.validate()?;
        self.require_stage(code, stage)?;

        let call = self.with_parent(code, self.repositories.stages.update(code, stage, &patch));
        self.tracked(EntityKind::Stage, "update", None, call, |cache, (updated, parent)| {
            info!(code = %code, stage = %updated.id, status = %updated.status, "Stage updated");
            cache.patch_aircraft(code, AircraftFields::stages(parent.stages));
            updated
        })
        .await
    }

    pub async fn delete_stage(&self, code: &AircraftCode, stage: &StageId) -> CoordinatorResult<()> {
        self.session.authorize(Operation::Delete(EntityKind::Stage))?;
        self.require_stage(code, stage)?;

        let call = self.with_parent(code, self.repositories.stages.delete(code, stage));
        self.tracked(EntityKind::Stage, "delete", None, call, |cache, ((), parent)| {
            info!(code = %code, stage = %stage, "Stage deleted");
            cache.patch_aircraft(code, AircraftFields::stages(parent.stages));
        })
        .await
    }

    fn require_stage(&self, code: &AircraftCode, stage: &StageId) -> CoordinatorResult<Stage> {
        self.cached_aircraft(code)?
            .stage(stage)
            .cloned()
            .ok_or_else(|| CoordinatorError::not_found(EntityKind::Stage, format!("{code}/{stage}")))
    }

    // ========================================================================
    // Stage staffing
    // ========================================================================

    /// Adds an employee to a stage. Membership that already exists on the
    /// server (409) counts as success.
    pub async fn add_employee_to_stage(
        &self,
        code: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> CoordinatorResult<Stage> {
        self.session.authorize(Operation::Associate)?;
        self.require_stage(code, stage)?;
        self.require_employee(employee)?;

        let repo = &self.repositories.stages;
        let attach = async {
            match repo.attach_employee(code, stage, employee).await {
                Err(err) if err.is_conflict() => {
                    debug!(code = %code, stage = %stage, employee = %employee, "Employee already on stage");
                    Ok(())
                }
                other => other,
            }
        };
        let call = self.with_parent(code, attach);
        self.tracked(EntityKind::Stage, "add employee to", None, call, |cache, ((), parent)| {
            info!(code = %code, stage = %stage, employee = %employee, "Employee added to stage");
            let staffed = parent.stage(stage).cloned();
            cache.patch_aircraft(code, AircraftFields::stages(parent.stages));
            staffed
        })
        .await?
        .ok_or_else(|| CoordinatorError::not_found(EntityKind::Stage, format!("{code}/{stage}")))
    }

    /// Removes an employee from a stage. The employee may be one that no
    /// longer exists but is still referenced by the stage. A membership the
    /// server does not know (404) counts as success.
    pub async fn remove_employee_from_stage(
        &self,
        code: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> CoordinatorResult<Stage> {
        self.session.authorize(Operation::Associate)?;
        let current = self.require_stage(code, stage)?;
        if !current.has_employee(employee) {
            self.require_employee(employee)?;
        }

        let repo = &self.repositories.stages;
        let detach = async {
            match repo.detach_employee(code, stage, employee).await {
                Err(err) if err.is_not_found() => {
                    debug!(code = %code, stage = %stage, employee = %employee, "Employee was not on stage");
                    Ok(())
                }
                other => other,
            }
        };
        let call = self.with_parent(code, detach);
        self.tracked(EntityKind::Stage, "remove employee from", None, call, |cache, ((), parent)| {
            info!(code = %code, stage = %stage, employee = %employee, "Employee removed from stage");
            let staffed = parent.stage(stage).cloned();
            cache.patch_aircraft(code, AircraftFields::stages(parent.stages));
            staffed
        })
        .await?
        .ok_or_else(|| CoordinatorError::not_found(EntityKind::Stage, format!("{code}/{stage}")))
    }

    // ========================================================================
    // Parts
    // ========================================================================

    pub async fn create_part(&self, code: &AircraftCode, draft: PartDraft) -> CoordinatorResult<Part> {
        self.session.authorize(Operation::Create(EntityKind::Part))?;
        draft.validate()?;
        if self.cached_aircraft(code)?.part(&draft.code).is_some() {
            return Err(ValidationError::DuplicateCode(draft.code.to_string()).into());
        }

        let call = self.with_parent(code, self.repositories.parts.create(code, &draft));
        self.tracked(EntityKind::Part, "create", None, call, |cache, (part, parent)| {
            info!(code = %code, part = %part.code, "Part created");
            cache.patch_aircraft(code, AircraftFields::parts(parent.parts));
            part
        })
        .await
    }

    pub async fn update_part(
        &self,
        code: &AircraftCode,
        part: &PartCode,
        patch: PartPatch,
    ) -> CoordinatorResult<Part> {
        self.session.authorize(Operation::Update(EntityKind::Part))?;
        patch.validate()?;
        self.require_part(code, part)?;

        let call = self.with_parent(code, self.repositories.parts.update(code, part, &patch));
        self.tracked(EntityKind::Part, "update", None, call, |cache, (updated, parent)| {
            info!(code = %code, part = %updated.code, status = %updated.status, "Part updated");
            cache.patch_aircraft(code, AircraftFields::parts(parent.parts));
            updated
        })
        .await
    }

    pub async fn delete_part(&self, code: &AircraftCode, part: &PartCode) -> CoordinatorResult<()> {
        self.session.authorize(Operation::Delete(EntityKind::Part))?;
        self.require_part(code, part)?;

        let call = self.with_parent(code, self.repositories.parts.delete(code, part));
        self.tracked(EntityKind::Part, "delete", None, call, |cache, ((), parent)| {
            info!(code = %code, part = %part, "Part deleted");
            cache.patch_aircraft(code, AircraftFields::parts(parent.parts));
        })
        .await
    }

    fn require_part(&self, code: &AircraftCode, part: &PartCode) -> CoordinatorResult<()> {
        match self.cached_aircraft(code)?.part(part) {
            Some(_) => Ok(()),
            None => Err(CoordinatorError::not_found(EntityKind::Part, format!("{code}/{part}"))),
        }
    }

    // ========================================================================
    // Tests
    // ========================================================================

    pub async fn create_test(&self, code: &AircraftCode, draft: TestDraft) -> CoordinatorResult<Test> {
        self.session.authorize(Operation::Create(EntityKind::Test))?;
        self.cached_aircraft(code)?;

        let call = self.with_parent(code, self.repositories.tests.create(code, &draft));
        self.tracked(EntityKind::Test, "create", None, call, |cache, (test, parent)| {
            info!(code = %code, test = %test.id, kind = %test.kind, "Test created");
            cache.patch_aircraft(code, AircraftFields::tests(parent.tests));
            test
        })
        .await
    }

    pub async fn update_test(
        &self,
        code: &AircraftCode,
        test: &TestId,
        patch: TestPatch,
    ) -> CoordinatorResult<Test> {
        self.session.authorize(Operation::Update(EntityKind::Test))?;
        patch.validate()?;
        self.require_test(code, test)?;

        let call = self.with_parent(code, self.repositories.tests.update(code, test, &patch));
        self.tracked(EntityKind::Test, "update", None, call, |cache, (updated, parent)| {
            info!(code = %code, test = %updated.id, result = %updated.result, "Test updated");
            cache.patch_aircraft(code, AircraftFields::tests(parent.tests));
            updated
        })
        .await
    }

    pub async fn delete_test(&self, code: &AircraftCode, test: &TestId) -> CoordinatorResult<()> {
        self.session.authorize(Operation::Delete(EntityKind::Test))?;
        self.require_test(code, test)?;

        let call = self.with_parent(code, self.repositories.tests.delete(code, test));
        self.tracked(EntityKind::Test, "delete", None, call, |cache, ((), parent)| {
            info!(code = %code, test = %test, "Test deleted");
            cache.patch_aircraft(code, AircraftFields::tests(parent.tests));
        })
        .await
    }

    fn require_test(&self, code: &AircraftCode, test: &TestId) -> CoordinatorResult<()> {
        match self.cached_aircraft(code)?.test(test) {
            Some(_) => Ok(()),
            None => Err(CoordinatorError::not_found(EntityKind::Test, format!("{code}/{test}"))),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn aircraft(&self) -> Vec<Aircraft> {
        self.cache.read().aircraft().to_vec()
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.cache.read().employees().to_vec()
    }

    pub fn aircraft_by_code(&self, code: &AircraftCode) -> Option<Aircraft> {
        self.cache.read().aircraft_by_code(code).cloned()
    }

    pub fn employee_by_id(&self, id: &EmployeeId) -> Option<Employee> {
        self.cache.read().employee_by_id(id).cloned()
    }

    pub fn list_by_category(&self, category: AircraftCategory) -> Vec<Aircraft> {
        self.cache
            .read()
            .aircraft()
            .iter()
            .filter(|a| a.category == category)
            .cloned()
            .collect()
    }

    pub fn total_aircraft(&self) -> usize {
        self.cache.read().aircraft().len()
    }

    pub fn fleet_summary(&self) -> FleetSummary {
        FleetSummary::of(self.cache.read().aircraft())
    }

    pub fn statistics(&self, code: &AircraftCode) -> Option<AircraftStatistics> {
        self.cache.read().aircraft_by_code(code).map(AircraftStatistics::of)
    }

    /// Distinct employees across all stages of an aircraft, resolved against
    /// the live employee list.
    pub fn team(&self, code: &AircraftCode) -> Option<Vec<ResolvedMember>> {
        let cache = self.cache.read();
        let aircraft = cache.aircraft_by_code(code)?;
        Some(
            aircraft
                .team()
                .iter()
                .map(|r| r.resolve(cache.employees()))
                .collect(),
        )
    }

    pub fn stage_members(&self, code: &AircraftCode, stage: &StageId) -> Option<Vec<ResolvedMember>> {
        let cache = self.cache.read();
        let stage = cache.aircraft_by_code(code)?.stage(stage)?;
        Some(
            stage
                .employees
                .iter()
                .map(|r| r.resolve(cache.employees()))
                .collect(),
        )
    }

    pub fn search_parts(&self, code: &AircraftCode, query: &PartQuery) -> Option<Vec<Part>> {
        let cache = self.cache.read();
        let aircraft = cache.aircraft_by_code(code)?;
        Some(aircraft.search_parts(query).into_iter().cloned().collect())
    }

    pub fn filter_tests(
        &self,
        code: &AircraftCode,
        kind: Option<TestKind>,
        result: Option<TestResult>,
    ) -> Option<Vec<Test>> {
        let cache = self.cache.read();
        let aircraft = cache.aircraft_by_code(code)?;
        Some(aircraft.filter_tests(kind, result).into_iter().cloned().collect())
    }

    pub fn kind_status(&self, kind: EntityKind) -> KindStatus {
        self.cache.read().kind_status(kind)
    }

    pub fn subscribe(&self) -> CacheEventReceiver {
        self.cache.read().subscribe()
    }

    /// Drops all cached state, e.g. after the session changes.
    pub fn reset(&self) {
        info!("Resetting aggregate cache");
        self.cache.write().reset();
    }
}
