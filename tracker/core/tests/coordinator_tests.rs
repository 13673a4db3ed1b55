// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Scenario tests for the domain coordinator over the in-memory remote store.
//!
//! Covers cache consistency after confirmed mutations, re-fetch-on-success
//! for stages/parts/tests, stage staffing idempotence, failure recording,
//! cancellation, and the synchronous precondition and permission checks.

use std::sync::Arc;
use std::time::Duration;

use aerotrack_core::application::{CacheEvent, CoordinatorError, DomainCoordinator, KindStatus};
use aerotrack_core::domain::session::AccessError;
use aerotrack_core::infrastructure::{InMemoryRemoteStore, InMemorySessionGate};
use aerotrack_core::{
    Aircraft, AircraftCategory, AircraftCode, AircraftDraft, AircraftPatch, Credentials,
    Employee, EmployeeDraft, EmployeeId, EmployeeRef, EntityKind, PartCode, PartPatch, PartQuery,
    PartStatus, PermissionLevel, RepositoryError, SessionContext, Stage, StageDraft, StageId,
    StagePatch, StageStatus, TestDraft, TestKind, TestResult, ValidationError,
};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

fn session(permission: PermissionLevel) -> SessionContext {
    SessionContext {
        username: "tester".to_string(),
        permission,
        token: Some("token".to_string()),
    }
}

fn coordinator_for(store: &InMemoryRemoteStore, permission: PermissionLevel) -> DomainCoordinator {
    let gate = Arc::new(InMemorySessionGate::signed_in(session(permission)));
    DomainCoordinator::new(store.repositories(), gate)
}

async fn loaded(store: &InMemoryRemoteStore, permission: PermissionLevel) -> DomainCoordinator {
    let coordinator = coordinator_for(store, permission);
    coordinator.load_all(&CancellationToken::new()).await.unwrap();
    coordinator
}

fn a320() -> AircraftDraft {
    AircraftDraft {
        code: AircraftCode::from("320"),
        model: "A320".to_string(),
        category: AircraftCategory::Commercial,
        capacity: 180,
        range_km: 6000,
    }
}

fn employee(id: &str, name: &str) -> Employee {
    Employee {
        id: EmployeeId::from(id),
        name: name.to_string(),
        phone: String::new(),
        address: String::new(),
        credentials: Credentials::new(name.to_lowercase(), "pw"),
        permission: PermissionLevel::Operator,
    }
}

fn stage_with(id: &str, members: Vec<EmployeeRef>) -> Stage {
    let mut stage = Stage::from_draft(StageId::from(id), StageDraft::named(format!("Stage {id}")));
    stage.employees = members;
    stage
}

#[tokio::test]
async fn test_create_stage_then_failed_update_scenario() {
    let store = InMemoryRemoteStore::new();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);
    let code = AircraftCode::from("320");

    let created = coordinator.create_aircraft(a320()).await.unwrap();
    assert_eq!(coordinator.total_aircraft(), 1);
    let cached = coordinator.aircraft_by_code(&code).unwrap();
    assert_eq!(cached, created);
    assert!(cached.stages.is_empty() && cached.parts.is_empty() && cached.tests.is_empty());

    coordinator
        .create_stage(&code, StageDraft::named("Fuselage"))
        .await
        .unwrap();
    let stages = coordinator.aircraft_by_code(&code).unwrap().stages;
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].status, StageStatus::Pending);

    store.fail_next(RepositoryError::remote(None, "network unreachable"));
    let patch = AircraftPatch {
        model: Some("A320neo".to_string()),
        ..AircraftPatch::default()
    };
    let err = coordinator.update_aircraft(&code, patch).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::Remote(_)));

    assert_eq!(coordinator.aircraft_by_code(&code).unwrap().model, "A320");
    let status = coordinator.kind_status(EntityKind::Aircraft);
    assert!(!status.loading);
    let message = status.error.unwrap();
    assert!(message.starts_with("failed to update aircraft:"));
    assert!(message.contains("network unreachable"));
}

#[tokio::test]
async fn test_successful_operation_clears_kind_error() {
    let store = InMemoryRemoteStore::new();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);

    store.fail_next(RepositoryError::remote(Some(500), "HTTP 500"));
    assert!(coordinator.create_aircraft(a320()).await.is_err());
    assert!(coordinator.kind_status(EntityKind::Aircraft).error.is_some());

    coordinator.create_aircraft(a320()).await.unwrap();
    assert_eq!(coordinator.kind_status(EntityKind::Aircraft), KindStatus::default());
}

#[tokio::test]
async fn test_cache_never_holds_duplicate_codes() {
    let store = InMemoryRemoteStore::new();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);
    let mut b737 = a320();
    b737.code = AircraftCode::from("737");
    b737.model = "B737".to_string();

    coordinator.create_aircraft(a320()).await.unwrap();
    coordinator.create_aircraft(b737.clone()).await.unwrap();
    coordinator
        .update_aircraft(
            &AircraftCode::from("320"),
            AircraftPatch {
                capacity: Some(190),
                ..AircraftPatch::default()
            },
        )
        .await
        .unwrap();
    coordinator.delete_aircraft(&AircraftCode::from("737")).await.unwrap();
    coordinator.create_aircraft(b737).await.unwrap();
    coordinator.load_aircraft(&CancellationToken::new()).await.unwrap();

    let mut codes: Vec<AircraftCode> = coordinator.aircraft().into_iter().map(|a| a.code).collect();
    let total = codes.len();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), total);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_duplicate_cached_code_is_rejected_before_any_call() {
    let store = InMemoryRemoteStore::new();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);
    coordinator.create_aircraft(a320()).await.unwrap();

    store.fail_next(RepositoryError::remote(None, "must not be consumed"));
    let err = coordinator.create_aircraft(a320()).await.unwrap_err();
    assert!(matches!(
        err,
        CoordinatorError::Validation(ValidationError::DuplicateCode(ref code)) if code == "320"
    ));
    assert_eq!(coordinator.kind_status(EntityKind::Aircraft), KindStatus::default());

    // the queued failure is still there
    assert!(coordinator.load_aircraft(&CancellationToken::new()).await.is_err());
}

#[tokio::test]
async fn test_deleting_unknown_aircraft_is_a_noop() {
    let store = InMemoryRemoteStore::new();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);

    coordinator.delete_aircraft(&AircraftCode::from("999")).await.unwrap();

    assert_eq!(coordinator.total_aircraft(), 0);
    assert_eq!(coordinator.kind_status(EntityKind::Aircraft), KindStatus::default());
}

#[tokio::test]
async fn test_add_employee_twice_keeps_single_membership() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Engineer).await;
    let code = AircraftCode::from("KC390");
    let stage = StageId::from("1");
    let admin = EmployeeId::from("1");

    coordinator.add_employee_to_stage(&code, &stage, &admin).await.unwrap();
    let staffed = coordinator.add_employee_to_stage(&code, &stage, &admin).await.unwrap();

    let occurrences = staffed
        .employees
        .iter()
        .filter(|e| e.id.as_ref() == Some(&admin))
        .count();
    assert_eq!(occurrences, 1);

    let cached = coordinator.aircraft_by_code(&code).unwrap();
    assert!(cached.stage(&stage).unwrap().has_employee(&admin));
}

#[tokio::test]
async fn test_removing_non_member_succeeds() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;
    let code = AircraftCode::from("KC390");
    let stage = StageId::from("1");

    let unchanged = coordinator
        .remove_employee_from_stage(&code, &stage, &EmployeeId::from("3"))
        .await
        .unwrap();

    assert_eq!(unchanged.employees.len(), 1);
    assert_eq!(coordinator.kind_status(EntityKind::Stage), KindStatus::default());
}

#[tokio::test]
async fn test_association_requires_known_employee() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;

    let err = coordinator
        .add_employee_to_stage(&AircraftCode::from("KC390"), &StageId::from("1"), &EmployeeId::from("77"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::NotFound { entity: EntityKind::Employee, .. }));
}

#[tokio::test]
async fn test_orphaned_member_can_be_removed_and_is_flagged() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;
    let code = AircraftCode::from("KC390");
    let stage = StageId::from("1");
    let engineer = EmployeeId::from("2");

    coordinator.delete_employee(&engineer).await.unwrap();
    assert!(coordinator.employee_by_id(&engineer).is_none());

    let members = coordinator.stage_members(&code, &stage).unwrap();
    assert_eq!(members.len(), 1);
    assert!(members[0].orphaned);
    assert_eq!(members[0].name, "Maria Souza");

    let stage_after = coordinator
        .remove_employee_from_stage(&code, &stage, &engineer)
        .await
        .unwrap();
    assert!(stage_after.employees.is_empty());
}

#[tokio::test]
async fn test_team_deduplicates_in_order_of_first_appearance() {
    let store = InMemoryRemoteStore::new();
    let alice = employee("10", "Alice");
    let bruno = employee("11", "Bruno");
    store.seed_employee(alice.clone());
    store.seed_employee(bruno.clone());

    let mut aircraft = Aircraft::from_draft(a320(), Utc::now());
    aircraft.stages = vec![
        stage_with("1", vec![EmployeeRef::of(&alice)]),
        stage_with("2", vec![EmployeeRef::of(&alice)]),
        stage_with("3", vec![EmployeeRef::of(&bruno)]),
    ];
    store.seed_aircraft(aircraft);

    let coordinator = loaded(&store, PermissionLevel::Operator).await;
    let team = coordinator.team(&AircraftCode::from("320")).unwrap();

    let names: Vec<&str> = team.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bruno"]);
    assert!(team.iter().all(|m| !m.orphaned));
    assert_eq!(coordinator.statistics(&AircraftCode::from("320")).unwrap().team_size, 2);
}

#[tokio::test]
async fn test_rejected_part_update_leaves_parts_unchanged() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Operator).await;
    let code = AircraftCode::from("E195");
    let before = coordinator.aircraft_by_code(&code).unwrap().parts;

    store.fail_next(RepositoryError::schema("status", "UNKNOWN_STATUS"));
    let err = coordinator
        .update_part(
            &code,
            &PartCode::from("P-100"),
            PartPatch {
                status: Some(PartStatus::Ready),
                ..PartPatch::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoordinatorError::Remote(RepositoryError::SchemaMismatch { field: "status", .. })
    ));
    assert_eq!(coordinator.aircraft_by_code(&code).unwrap().parts, before);
    assert!(coordinator.kind_status(EntityKind::Part).error.is_some());
    assert!(coordinator.kind_status(EntityKind::Aircraft).error.is_none());
}

#[tokio::test]
async fn test_child_mutation_patches_only_its_collection() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Engineer).await;
    let code = AircraftCode::from("E195");
    let before = coordinator.aircraft_by_code(&code).unwrap();

    let test = coordinator
        .create_test(
            &code,
            TestDraft {
                kind: TestKind::Aerodynamic,
                result: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(test.result, TestResult::NotPerformed);

    let after = coordinator.aircraft_by_code(&code).unwrap();
    assert_eq!(after.tests.len(), before.tests.len() + 1);
    assert_eq!(after.stages, before.stages);
    assert_eq!(after.parts, before.parts);
    assert_eq!(after.model, before.model);
}

#[tokio::test]
async fn test_stage_update_and_delete_round_trip() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Engineer).await;
    let code = AircraftCode::from("E195");
    let stage = StageId::from("2");

    let updated = coordinator
        .update_stage(
            &code,
            &stage,
            StagePatch {
                status: Some(StageStatus::InProgress),
                ..StagePatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, StageStatus::InProgress);

    coordinator.delete_stage(&code, &stage).await.unwrap();
    let cached = coordinator.aircraft_by_code(&code).unwrap();
    assert!(cached.stage(&stage).is_none());
    assert_eq!(cached.stages.len(), 1);
}

#[tokio::test]
async fn test_preconditions_fail_without_touching_status() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;

    let err = coordinator
        .create_stage(&AircraftCode::from("nope"), StageDraft::named("Fuselagem"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::NotFound { entity: EntityKind::Aircraft, .. }));

    let err = coordinator
        .update_stage(&AircraftCode::from("E195"), &StageId::from("99"), StagePatch {
            name: Some("Asas".to_string()),
            ..StagePatch::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::NotFound { entity: EntityKind::Stage, .. }));

    let err = coordinator
        .update_aircraft(&AircraftCode::from("E195"), AircraftPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::Validation(ValidationError::EmptyPatch)));

    for kind in EntityKind::ALL {
        assert_eq!(coordinator.kind_status(kind), KindStatus::default());
    }
}

#[tokio::test]
async fn test_permission_denied_before_any_call() {
    let store = InMemoryRemoteStore::with_demo_data();
    let operator = loaded(&store, PermissionLevel::Operator).await;

    let err = operator.create_aircraft(a320()).await.unwrap_err();
    assert!(matches!(
        err,
        CoordinatorError::Access(AccessError::PermissionDenied {
            permission: PermissionLevel::Operator,
            ..
        })
    ));
    assert!(store.stored_aircraft(&AircraftCode::from("320")).is_none());

    let engineer = coordinator_for(&store, PermissionLevel::Engineer);
    let err = engineer
        .create_employee(EmployeeDraft {
            name: "Novo".to_string(),
            phone: String::new(),
            address: String::new(),
            credentials: Credentials::new("novo", "pw"),
            permission: PermissionLevel::Operator,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::Access(AccessError::PermissionDenied { .. })));
}

#[tokio::test]
async fn test_loads_require_a_session() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = DomainCoordinator::new(store.repositories(), Arc::new(InMemorySessionGate::new()));

    let err = coordinator.load_aircraft(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::Access(AccessError::Unauthenticated)));
    assert_eq!(coordinator.total_aircraft(), 0);
}

#[tokio::test]
async fn test_cancelled_load_leaves_cache_untouched() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);
    let token = CancellationToken::new();
    token.cancel();

    let err = coordinator.load_aircraft(&token).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::Cancelled));
    assert_eq!(coordinator.total_aircraft(), 0);
    assert_eq!(coordinator.kind_status(EntityKind::Aircraft), KindStatus::default());
}

#[tokio::test]
async fn test_cancelling_in_flight_load() {
    let store = InMemoryRemoteStore::with_demo_data();
    store.set_latency(Some(Duration::from_millis(500)));
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = coordinator.load_employees(&token).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::Cancelled));
    assert!(coordinator.employees().is_empty());
    assert_eq!(coordinator.kind_status(EntityKind::Employee), KindStatus::default());
}

#[tokio::test]
async fn test_dropped_operation_releases_loading_flag() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;
    store.set_latency(Some(Duration::from_secs(5)));

    let patch = AircraftPatch {
        model: Some("E195-E3".to_string()),
        ..AircraftPatch::default()
    };
    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        coordinator.update_aircraft(&AircraftCode::from("E195"), patch),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(coordinator.kind_status(EntityKind::Aircraft), KindStatus::default());
    assert_eq!(coordinator.aircraft_by_code(&AircraftCode::from("E195")).unwrap().model, "E195-E2");
}

#[tokio::test]
async fn test_employee_delete_404_removes_cached_entry() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;
    let id = EmployeeId::from("3");

    // removed behind the coordinator's back
    aerotrack_core::domain::repository::EmployeeRepository::delete(&store, &id)
        .await
        .unwrap();

    coordinator.delete_employee(&id).await.unwrap();
    assert!(coordinator.employee_by_id(&id).is_none());
    assert!(coordinator.kind_status(EntityKind::Employee).error.is_none());
}

#[tokio::test]
async fn test_read_helpers_over_demo_floor() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Operator).await;
    let code = AircraftCode::from("E195");

    let summary = coordinator.fleet_summary();
    assert_eq!((summary.total, summary.commercial, summary.military), (2, 1, 1));
    assert_eq!(coordinator.list_by_category(AircraftCategory::Military).len(), 1);

    let found = coordinator
        .search_parts(
            &code,
            &PartQuery {
                text: "pratt".to_string(),
                status: None,
            },
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, PartCode::from("P-100"));

    let approved = coordinator
        .filter_tests(&code, None, Some(TestResult::Approved))
        .unwrap();
    assert_eq!(approved.len(), 1);

    let stats = coordinator.statistics(&code).unwrap();
    assert_eq!(stats.stages.in_progress, 1);
    assert_eq!(stats.parts.ready, 1);
    assert!(coordinator.team(&AircraftCode::from("missing")).is_none());
}

#[tokio::test]
async fn test_subscribers_see_applied_mutations() {
    let store = InMemoryRemoteStore::new();
    let coordinator = coordinator_for(&store, PermissionLevel::Admin);
    let mut events = coordinator.subscribe();

    coordinator.create_aircraft(a320()).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.contains(&CacheEvent::AircraftUpserted(AircraftCode::from("320"))));
    assert!(matches!(
        seen.last(),
        Some(CacheEvent::KindStatusChanged { kind: EntityKind::Aircraft, .. })
    ));
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let store = InMemoryRemoteStore::with_demo_data();
    let coordinator = loaded(&store, PermissionLevel::Admin).await;

    coordinator.reset();
    assert!(coordinator.aircraft().is_empty());
    assert!(coordinator.employees().is_empty());
}
