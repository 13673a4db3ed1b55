// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Aircraft Aggregate
//!
//! An [`Aircraft`] owns its stages, parts and tests by composition: their
//! lifetime is bound to the aircraft and their identifiers are only unique
//! within it. Stages reference employees by association (see
//! [`super::employee::EmployeeRef`]).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Aggregate root, child entities, caller payloads, team aggregation

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::employee::{EmployeeId, EmployeeRef};
use super::validation::{require_text, require_text_if_present, ValidationError};

string_id!(
    /// Globally unique, immutable aircraft code.
    AircraftCode
);
string_id!(
    /// Stage identifier, unique within its aircraft only.
    StageId
);
string_id!(
    /// Part code, unique within its aircraft only.
    PartCode
);
string_id!(
    /// Test identifier, unique within its aircraft only.
    TestId
);

wire_enum!(
    AircraftCategory, field = "category" {
        Commercial => "COMMERCIAL",
        Military => "MILITARY",
    }
);

wire_enum!(
    StageStatus, field = "status" {
        Pending => "PENDING",
        InProgress => "IN_PROGRESS",
        Done => "DONE",
    }
);

wire_enum!(
    PartOrigin, field = "origin" {
        Domestic => "DOMESTIC",
        Imported => "IMPORTED",
    }
);

wire_enum!(
    PartStatus, field = "status" {
        InProduction => "IN_PRODUCTION",
        InTransit => "IN_TRANSIT",
        Ready => "READY",
    }
);

wire_enum!(
    TestKind, field = "kind" {
        Electrical => "ELECTRICAL",
        Hydraulic => "HYDRAULIC",
        Aerodynamic => "AERODYNAMIC",
    }
);

wire_enum!(
    TestResult, field = "result" {
        NotPerformed => "NOT_PERFORMED",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    pub code: AircraftCode,
    pub model: String,
    pub category: AircraftCategory,
    pub capacity: u32,
    pub range_km: u32,
    pub stages: Vec<Stage>,
    pub parts: Vec<Part>,
    pub tests: Vec<Test>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Aircraft {
    /// Builds a fresh aggregate with empty collections.
    pub fn from_draft(draft: AircraftDraft, now: DateTime<Utc>) -> Self {
        Self {
            code: draft.code,
            model: draft.model,
            category: draft.category,
            capacity: draft.capacity,
            range_km: draft.range_km,
            stages: Vec::new(),
            parts: Vec::new(),
            tests: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| &s.id == id)
    }

    pub fn part(&self, code: &PartCode) -> Option<&Part> {
        self.parts.iter().find(|p| &p.code == code)
    }

    pub fn test(&self, id: &TestId) -> Option<&Test> {
        self.tests.iter().find(|t| &t.id == id)
    }

    pub fn apply_patch(&mut self, patch: &AircraftPatch, now: DateTime<Utc>) {
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(range_km) = patch.range_km {
            self.range_km = range_km;
        }
        self.updated_at = Some(now);
    }

    /// Shallow merge: every field present in `fields` replaces the current
    /// value wholesale; absent fields are left untouched.
    pub fn merge(&mut self, fields: AircraftFields) {
        let AircraftFields {
            model,
            category,
            capacity,
            range_km,
            stages,
            parts,
            tests,
            updated_at,
        } = fields;

        if let Some(model) = model {
            self.model = model;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(capacity) = capacity {
            self.capacity = capacity;
        }
        if let Some(range_km) = range_km {
            self.range_km = range_km;
        }
        if let Some(stages) = stages {
            self.stages = stages;
        }
        if let Some(parts) = parts {
            self.parts = parts;
        }
        if let Some(tests) = tests {
            self.tests = tests;
        }
        if let Some(updated_at) = updated_at {
            self.updated_at = Some(updated_at);
        }
    }

    /// Distinct employees referenced across all stages, in order of first
    /// appearance.
    ///
    /// References carrying an id are keyed by that id alone. Legacy
    /// references that only carry a name are keyed by name among the other
    /// legacy references.
    pub fn team(&self) -> Vec<EmployeeRef> {
        let mut seen_ids: HashSet<&EmployeeId> = HashSet::new();
        let mut seen_legacy: HashSet<&str> = HashSet::new();

        let mut team = Vec::new();

        for reference in self.stages.iter().flat_map(|s| s.employees.iter()) {
            let is_new = match (&reference.id, reference.name.as_deref()) {
                (Some(id), _) => seen_ids.insert(id),
                (None, Some(name)) => seen_legacy.insert(name),
                (None, None) => false,
            };
            if is_new {
                team.push(reference.clone());
            }
        }

        team
    }

    /// Parts matching a free-text query and an optional status filter.
    pub fn search_parts(&self, query: &PartQuery) -> Vec<&Part> {
        let needle = query.text.trim().to_lowercase();
        self.parts
            .iter()
            .filter(|p| query.status.map_or(true, |s| p.status == s))
            .filter(|p| needle.is_empty() || p.matches_text(&needle))
            .collect()
    }

    pub fn filter_tests(&self, kind: Option<TestKind>, result: Option<TestResult>) -> Vec<&Test> {
        self.tests
            .iter()
            .filter(|t| kind.map_or(true, |k| t.kind == k))
            .filter(|t| result.map_or(true, |r| t.result == r))
            .collect()
    }
}

/// Partial aircraft used for local-only patches of the cached entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AircraftFields {
    pub model: Option<String>,
    pub category: Option<AircraftCategory>,
    pub capacity: Option<u32>,
    pub range_km: Option<u32>,
    pub stages: Option<Vec<Stage>>,
    pub parts: Option<Vec<Part>>,
    pub tests: Option<Vec<Test>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AircraftFields {
    pub fn stages(stages: Vec<Stage>) -> Self {
        Self {
            stages: Some(stages),
            ..Self::default()
        }
    }

    pub fn parts(parts: Vec<Part>) -> Self {
        Self {
            parts: Some(parts),
            ..Self::default()
        }
    }

    pub fn tests(tests: Vec<Test>) -> Self {
        Self {
            tests: Some(tests),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub status: StageStatus,
    pub started_at: Option<NaiveDate>,
    pub finished_at: Option<NaiveDate>,
    pub employees: Vec<EmployeeRef>,
}

impl Stage {
    pub fn from_draft(id: StageId, draft: StageDraft) -> Self {
        Self {
            id,
            name: draft.name,
            deadline: draft.deadline,
            status: draft.status.unwrap_or(StageStatus::Pending),
            started_at: None,
            finished_at: None,
            employees: Vec::new(),
        }
    }

    pub fn has_employee(&self, id: &EmployeeId) -> bool {
        self.employees.iter().any(|e| e.id.as_ref() == Some(id))
    }

    pub fn apply_patch(&mut self, patch: &StagePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub code: PartCode,
    pub name: String,
    pub origin: PartOrigin,
    pub supplier: String,
    pub status: PartStatus,
}

impl Part {
    pub fn from_draft(draft: PartDraft) -> Self {
        Self {
            code: draft.code,
            name: draft.name,
            origin: draft.origin,
            supplier: draft.supplier,
            status: draft.status,
        }
    }

    pub fn apply_patch(&mut self, patch: &PartPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(origin) = patch.origin {
            self.origin = origin;
        }
        if let Some(supplier) = &patch.supplier {
            self.supplier = supplier.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn matches_text(&self, needle: &str) -> bool {
        [
            self.code.as_str(),
            self.name.as_str(),
            self.supplier.as_str(),
            self.origin.as_wire(),
            self.status.as_wire(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub id: TestId,
    pub kind: TestKind,
    pub result: TestResult,
    pub performed_at: Option<DateTime<Utc>>,
}

impl Test {
    pub fn from_draft(id: TestId, draft: TestDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            result: draft.result.unwrap_or(TestResult::NotPerformed),
            performed_at: None,
        }
    }

    pub fn apply_patch(&mut self, patch: &TestPatch, now: DateTime<Utc>) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(result) = patch.result {
            if result != TestResult::NotPerformed && self.result != result {
                self.performed_at = Some(now);
            }
            self.result = result;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartQuery {
    pub text: String,
    pub status: Option<PartStatus>,
}

// ============================================================================
// Caller payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftDraft {
    pub code: AircraftCode,
    pub model: String,
    pub category: AircraftCategory,
    pub capacity: u32,
    pub range_km: u32,
}

impl AircraftDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("code", self.code.as_str())?;
        require_text("model", &self.model)
    }
}

/// Aircraft update payload. The code is immutable and therefore absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AircraftPatch {
    pub model: Option<String>,
    pub category: Option<AircraftCategory>,
    pub capacity: Option<u32>,
    pub range_km: Option<u32>,
}

impl AircraftPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        require_text_if_present("model", self.model.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDraft {
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub status: Option<StageStatus>,
}

impl StageDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deadline: None,
            status: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagePatch {
    pub name: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<StageStatus>,
}

impl StagePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        require_text_if_present("name", self.name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDraft {
    pub code: PartCode,
    pub name: String,
    pub origin: PartOrigin,
    pub supplier: String,
    pub status: PartStatus,
}

impl PartDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("code", self.code.as_str())?;
        require_text("name", &self.name)?;
        require_text("supplier", &self.supplier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartPatch {
    pub name: Option<String>,
    pub origin: Option<PartOrigin>,
    pub supplier: Option<String>,
    pub status: Option<PartStatus>,
}

impl PartPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        require_text_if_present("name", self.name.as_deref())?;
        require_text_if_present("supplier", self.supplier.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDraft {
    pub kind: TestKind,
    pub result: Option<TestResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPatch {
    pub kind: Option<TestKind>,
    pub result: Option<TestResult>,
}

impl TestPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if *self == Self::default() {
            return Err(ValidationError::EmptyPatch);
        }
        Ok(())
    }
}
