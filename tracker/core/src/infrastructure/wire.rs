// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Wire Mapping
//!
//! Translates between the remote store's JSON records and the domain shapes.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Anti-corruption layer for the remote aggregate store
//!
//! Decoding is strict: enumerations, counts and dates outside their domain
//! fail with [`RepositoryError::SchemaMismatch`] instead of being defaulted.
//! Server-assigned numeric ids become string ids; ids that are canonical
//! unsigned integers are written back as numbers. Timestamps are decoded but
//! never re-sent.
//!
//! Two listing layouts are accepted and normalized to the nested aggregate:
//! a list of nested aircraft records, or a flat dataset where aircraft carry
//! `stageIds`/`partIds`/`testIds` into side tables. Side-table rows may name
//! their owning aircraft (`aircraftCode`); a flat dataset may also mix in
//! nested aircraft records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::domain::aircraft::{
    Aircraft, AircraftCategory, AircraftCode, AircraftDraft, AircraftPatch, Part, PartCode,
    PartDraft, PartOrigin, PartPatch, PartStatus, Stage, StageDraft, StageId, StagePatch,
    StageStatus, Test, TestDraft, TestId, TestKind, TestPatch, TestResult,
};
use crate::domain::employee::{
    Credentials, Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeRef, PermissionLevel,
};
use crate::domain::repository::RepositoryError;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier as sent by the server: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    /// Numeric form when `id` is a canonical unsigned integer.
    pub fn encode(id: &str) -> Self {
        match id.parse::<u64>() {
            Ok(n) if n.to_string() == id => WireId::Number(n),
            _ => WireId::Text(id.to_string()),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

/// Aircraft and part codes are caller-chosen text; a numeric code on the
/// wire is accepted but always written back as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct WireCode(pub String);

impl From<WireId> for WireCode {
    fn from(id: WireId) -> Self {
        WireCode(id.into_string())
    }
}

impl From<WireCode> for String {
    fn from(code: WireCode) -> Self {
        code.0
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAircraft {
    pub code: WireCode,
    pub model: String,
    pub category: String,
    pub capacity: i64,
    pub range: i64,
    #[serde(default)]
    pub stages: Vec<WireStage>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
    #[serde(default)]
    pub tests: Vec<WireTest>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStage {
    pub id: WireId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<WireEmployeeRef>>,
    #[serde(default, skip_serializing)]
    pub employee_ids: Option<Vec<WireId>>,
    /// Owning aircraft, carried by flat dataset rows.
    #[serde(default, skip_serializing, alias = "aeronaveCodigo")]
    pub aircraft_code: Option<WireCode>,
}

/// Employee as embedded in a stage. Full employee records are accepted; only
/// the id and display name are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEmployeeRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(alias = "id")]
    pub code: WireCode,
    pub name: String,
    pub origin: String,
    pub supplier: String,
    pub status: String,
    /// Owning aircraft, carried by flat dataset rows.
    #[serde(default, skip_serializing, alias = "aeronaveCodigo")]
    pub aircraft_code: Option<WireCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTest {
    pub id: WireId,
    pub kind: String,
    pub result: String,
    #[serde(default, skip_serializing)]
    pub performed_at: Option<DateTime<Utc>>,
    /// Owning aircraft, carried by flat dataset rows.
    #[serde(default, skip_serializing, alias = "aeronaveCodigo")]
    pub aircraft_code: Option<WireCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEmployee {
    pub id: WireId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub permission: String,
}

/// `GET /aircraft` payload in either layout.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireAircraftListing {
    Nested(Vec<WireAircraft>),
    Flat(WireFlatDataset),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFlatDataset {
    pub aircraft: Vec<WireFlatAircraft>,
    #[serde(default)]
    pub stages: Vec<WireStage>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
    #[serde(default)]
    pub tests: Vec<WireTest>,
    #[serde(default)]
    pub employees: Vec<WireEmployee>,
}

/// Aircraft row of a flat dataset. A row carrying any of `stages`, `parts`
/// or `tests` is a nested record; anything else references side tables.
#[derive(Debug)]
pub enum WireFlatAircraft {
    Nested(WireAircraft),
    ByRef(WireAircraftByRef),
}

impl<'de> Deserialize<'de> for WireFlatAircraft {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let nested = ["stages", "parts", "tests"]
            .iter()
            .any(|key| value.get(key).is_some());
        if nested {
            serde_json::from_value(value)
                .map(WireFlatAircraft::Nested)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(WireFlatAircraft::ByRef)
                .map_err(de::Error::custom)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAircraftByRef {
    pub code: WireCode,
    pub model: String,
    pub category: String,
    pub capacity: i64,
    pub range: i64,
    #[serde(default)]
    pub stage_ids: Vec<WireId>,
    #[serde(default)]
    pub part_ids: Vec<WireId>,
    #[serde(default)]
    pub test_ids: Vec<WireId>,
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_enum<T>(
    field: &'static str,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, RepositoryError> {
    parse(raw).ok_or_else(|| RepositoryError::schema(field, raw))
}

fn decode_count(field: &'static str, value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| RepositoryError::schema(field, value.to_string()))
}

fn decode_date(field: &'static str, raw: Option<String>) -> Result<Option<NaiveDate>, RepositoryError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };
    if let Ok(date) = NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| RepositoryError::schema(field, raw))
}

impl WireAircraft {
    pub fn into_domain(self) -> Result<Aircraft, RepositoryError> {
        self.into_domain_with_names(&HashMap::new())
    }

    fn into_domain_with_names(self, names: &HashMap<String, String>) -> Result<Aircraft, RepositoryError> {
        Ok(Aircraft {
            code: AircraftCode(self.code.0),
            model: self.model,
            category: decode_enum(AircraftCategory::FIELD, &self.category, AircraftCategory::from_wire)?,
            capacity: decode_count("capacity", self.capacity)?,
            range_km: decode_count("range", self.range)?,
            stages: self
                .stages
                .into_iter()
                .map(|s| s.into_domain_with_names(names))
                .collect::<Result<_, _>>()?,
            parts: self.parts.into_iter().map(WirePart::into_domain).collect::<Result<_, _>>()?,
            tests: self.tests.into_iter().map(WireTest::into_domain).collect::<Result<_, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl WireStage {
    pub fn into_domain(self) -> Result<Stage, RepositoryError> {
        self.into_domain_with_names(&HashMap::new())
    }

    /// `names` supplies display names for stages that only carry
    /// `employeeIds`.
    fn into_domain_with_names(self, names: &HashMap<String, String>) -> Result<Stage, RepositoryError> {
        let references: Vec<EmployeeRef> = match (self.employees, self.employee_ids) {
            (Some(embedded), _) => embedded
                .into_iter()
                .map(|e| EmployeeRef {
                    id: e.id.map(|id| EmployeeId(id.into_string())),
                    name: e.name,
                })
                .collect(),
            (None, Some(ids)) => ids
                .into_iter()
                .map(|id| {
                    let id = id.into_string();
                    EmployeeRef {
                        name: names.get(&id).cloned(),
                        id: Some(EmployeeId(id)),
                    }
                })
                .collect(),
            (None, None) => Vec::new(),
        };

        Ok(Stage {
            id: StageId(self.id.into_string()),
            name: self.name,
            deadline: decode_date("deadline", self.deadline)?,
            status: decode_enum(StageStatus::FIELD, &self.status, StageStatus::from_wire)?,
            started_at: decode_date("startedAt", self.started_at)?,
            finished_at: decode_date("finishedAt", self.finished_at)?,
            employees: dedup_references(references),
        })
    }
}

/// A stage holds each employee at most once; the first occurrence wins.
fn dedup_references(references: Vec<EmployeeRef>) -> Vec<EmployeeRef> {
    let mut ids = HashSet::new();
    let mut legacy_names = HashSet::new();
    references
        .into_iter()
        .filter(|r| match (&r.id, &r.name) {
            (Some(id), _) => ids.insert(id.clone()),
            (None, Some(name)) => legacy_names.insert(name.clone()),
            (None, None) => false,
        })
        .collect()
}

impl WirePart {
    pub fn into_domain(self) -> Result<Part, RepositoryError> {
        Ok(Part {
            code: PartCode(self.code.0),
            name: self.name,
            origin: decode_enum(PartOrigin::FIELD, &self.origin, PartOrigin::from_wire)?,
            supplier: self.supplier,
            status: decode_enum(PartStatus::FIELD, &self.status, PartStatus::from_wire)?,
        })
    }
}

impl WireTest {
    pub fn into_domain(self) -> Result<Test, RepositoryError> {
        Ok(Test {
            id: TestId(self.id.into_string()),
            kind: decode_enum(TestKind::FIELD, &self.kind, TestKind::from_wire)?,
            result: decode_enum(TestResult::FIELD, &self.result, TestResult::from_wire)?,
            performed_at: self.performed_at,
        })
    }
}

impl WireEmployee {
    pub fn into_domain(self) -> Result<Employee, RepositoryError> {
        Ok(Employee {
            id: EmployeeId(self.id.into_string()),
            name: self.name,
            phone: self.phone,
            address: self.address,
            credentials: Credentials::new(self.username, self.password),
            permission: decode_enum(PermissionLevel::FIELD, &self.permission, PermissionLevel::from_wire)?,
        })
    }
}

impl WireAircraftListing {
    pub fn into_domain(self) -> Result<Vec<Aircraft>, RepositoryError> {
        match self {
            WireAircraftListing::Nested(records) => {
                records.into_iter().map(WireAircraft::into_domain).collect()
            }
            WireAircraftListing::Flat(dataset) => dataset.into_domain(),
        }
    }
}

impl WireFlatDataset {
    pub fn into_domain(self) -> Result<Vec<Aircraft>, RepositoryError> {
        let names: HashMap<String, String> = self
            .employees
            .into_iter()
            .map(|e| (e.id.into_string(), e.name))
            .collect();

        let stages = SideTable::new(self.stages, |s| (owner_of(&s.aircraft_code), s.id.clone().into_string()));
        let parts = SideTable::new(self.parts, |p| (owner_of(&p.aircraft_code), p.code.0.clone()));
        let tests = SideTable::new(self.tests, |t| (owner_of(&t.aircraft_code), t.id.clone().into_string()));

        self.aircraft
            .into_iter()
            .map(|record| {
                let record = match record {
                    WireFlatAircraft::Nested(nested) => return nested.into_domain_with_names(&names),
                    WireFlatAircraft::ByRef(record) => record,
                };
                let code = record.code.0;
                let stage_records = stages.referenced(record.stage_ids, &code, "stage");
                let part_records = parts.referenced(record.part_ids, &code, "part");
                let test_records = tests.referenced(record.test_ids, &code, "test");

                Ok(Aircraft {
                    category: decode_enum(AircraftCategory::FIELD, &record.category, AircraftCategory::from_wire)?,
                    capacity: decode_count("capacity", record.capacity)?,
                    range_km: decode_count("range", record.range)?,
                    model: record.model,
                    stages: stage_records
                        .into_iter()
                        .map(|s| s.into_domain_with_names(&names))
                        .collect::<Result<_, _>>()?,
                    parts: part_records.into_iter().map(WirePart::into_domain).collect::<Result<_, _>>()?,
                    tests: test_records.into_iter().map(WireTest::into_domain).collect::<Result<_, _>>()?,
                    code: AircraftCode(code),
                    created_at: None,
                    updated_at: None,
                })
            })
            .collect()
    }
}

fn owner_of(code: &Option<WireCode>) -> Option<String> {
    code.as_ref().map(|c| c.0.clone())
}

/// Flat dataset side table. Child ids are only unique within their
/// aircraft, so rows naming an owner are keyed by `(owner, id)`; rows
/// without one are reachable from any aircraft by bare id. The first row
/// wins on duplicate keys.
struct SideTable<T> {
    owned: HashMap<(String, String), T>,
    unowned: HashMap<String, T>,
}

impl<T: Clone> SideTable<T> {
    fn new(rows: Vec<T>, key: impl Fn(&T) -> (Option<String>, String)) -> Self {
        let mut owned = HashMap::new();
        let mut unowned = HashMap::new();
        for row in rows {
            match key(&row) {
                (Some(owner), id) => {
                    owned.entry((owner, id)).or_insert(row);
                }
                (None, id) => {
                    unowned.entry(id).or_insert(row);
                }
            }
        }
        Self { owned, unowned }
    }

    fn get(&self, aircraft: &str, id: &str) -> Option<&T> {
        self.owned
            .get(&(aircraft.to_string(), id.to_string()))
            .or_else(|| self.unowned.get(id))
    }

    /// Rows referenced by one aircraft, in reference order. Dangling
    /// references are dropped.
    fn referenced(&self, ids: Vec<WireId>, aircraft: &str, entity: &'static str) -> Vec<T> {
        ids.into_iter()
            .filter_map(|id| {
                let id = id.into_string();
                let row = self.get(aircraft, &id).cloned();
                if row.is_none() {
                    warn!(aircraft = %aircraft, entity, id = %id, "Dropping dangling reference in flat dataset");
                }
                row
            })
            .collect()
    }
}

// ============================================================================
// Encoding
// ============================================================================

impl From<&Aircraft> for WireAircraft {
    fn from(aircraft: &Aircraft) -> Self {
        Self {
            code: WireCode(aircraft.code.0.clone()),
            model: aircraft.model.clone(),
            category: aircraft.category.as_wire().to_string(),
            capacity: i64::from(aircraft.capacity),
            range: i64::from(aircraft.range_km),
            stages: aircraft.stages.iter().map(WireStage::from).collect(),
            parts: aircraft.parts.iter().map(WirePart::from).collect(),
            tests: aircraft.tests.iter().map(WireTest::from).collect(),
            created_at: aircraft.created_at,
            updated_at: aircraft.updated_at,
        }
    }
}

impl From<&Stage> for WireStage {
    fn from(stage: &Stage) -> Self {
        Self {
            id: WireId::encode(stage.id.as_str()),
            name: stage.name.clone(),
            deadline: stage.deadline.map(|d| d.format(DATE_FORMAT).to_string()),
            status: stage.status.as_wire().to_string(),
            started_at: stage.started_at.map(|d| d.format(DATE_FORMAT).to_string()),
            finished_at: stage.finished_at.map(|d| d.format(DATE_FORMAT).to_string()),
            employees: Some(
                stage
                    .employees
                    .iter()
                    .map(|e| WireEmployeeRef {
                        id: e.id.as_ref().map(|id| WireId::encode(id.as_str())),
                        name: e.name.clone(),
                    })
                    .collect(),
            ),
            employee_ids: None,
            aircraft_code: None,
        }
    }
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        Self {
            code: WireCode(part.code.0.clone()),
            name: part.name.clone(),
            origin: part.origin.as_wire().to_string(),
            supplier: part.supplier.clone(),
            status: part.status.as_wire().to_string(),
            aircraft_code: None,
        }
    }
}

impl From<&Test> for WireTest {
    fn from(test: &Test) -> Self {
        Self {
            id: WireId::encode(test.id.as_str()),
            kind: test.kind.as_wire().to_string(),
            result: test.result.as_wire().to_string(),
            performed_at: test.performed_at,
            aircraft_code: None,
        }
    }
}

impl From<&Employee> for WireEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: WireId::encode(employee.id.as_str()),
            name: employee.name.clone(),
            phone: employee.phone.clone(),
            address: employee.address.clone(),
            username: employee.credentials.username.clone(),
            password: employee.credentials.secret.clone(),
            permission: employee.permission.as_wire().to_string(),
        }
    }
}

/// Request body for aircraft create/update. Absent fields are omitted.
#[derive(Debug, Default, Serialize)]
pub struct AircraftBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
}

impl<'a> From<&'a AircraftDraft> for AircraftBody<'a> {
    fn from(draft: &'a AircraftDraft) -> Self {
        Self {
            code: Some(draft.code.as_str()),
            model: Some(&draft.model),
            category: Some(draft.category.as_wire()),
            capacity: Some(draft.capacity),
            range: Some(draft.range_km),
        }
    }
}

impl<'a> From<&'a AircraftPatch> for AircraftBody<'a> {
    fn from(patch: &'a AircraftPatch) -> Self {
        Self {
            code: None,
            model: patch.model.as_deref(),
            category: patch.category.map(|c| c.as_wire()),
            capacity: patch.capacity,
            range: patch.range_km,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct StageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

impl<'a> From<&'a StageDraft> for StageBody<'a> {
    fn from(draft: &'a StageDraft) -> Self {
        Self {
            name: Some(&draft.name),
            deadline: draft.deadline.map(|d| d.format(DATE_FORMAT).to_string()),
            status: Some(draft.status.unwrap_or(StageStatus::Pending).as_wire()),
        }
    }
}

impl<'a> From<&'a StagePatch> for StageBody<'a> {
    fn from(patch: &'a StagePatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            deadline: patch.deadline.map(|d| d.format(DATE_FORMAT).to_string()),
            status: patch.status.map(|s| s.as_wire()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PartBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

impl<'a> From<&'a PartDraft> for PartBody<'a> {
    fn from(draft: &'a PartDraft) -> Self {
        Self {
            code: Some(draft.code.as_str()),
            name: Some(&draft.name),
            origin: Some(draft.origin.as_wire()),
            supplier: Some(&draft.supplier),
            status: Some(draft.status.as_wire()),
        }
    }
}

impl<'a> From<&'a PartPatch> for PartBody<'a> {
    fn from(patch: &'a PartPatch) -> Self {
        Self {
            code: None,
            name: patch.name.as_deref(),
            origin: patch.origin.map(|o| o.as_wire()),
            supplier: patch.supplier.as_deref(),
            status: patch.status.map(|s| s.as_wire()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'static str>,
}

impl From<&TestDraft> for TestBody {
    fn from(draft: &TestDraft) -> Self {
        Self {
            kind: Some(draft.kind.as_wire()),
            result: Some(draft.result.unwrap_or(TestResult::NotPerformed).as_wire()),
        }
    }
}

impl From<&TestPatch> for TestBody {
    fn from(patch: &TestPatch) -> Self {
        Self {
            kind: patch.kind.map(|k| k.as_wire()),
            result: patch.result.map(|r| r.as_wire()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct EmployeeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<&'static str>,
}

impl<'a> From<&'a EmployeeDraft> for EmployeeBody<'a> {
    fn from(draft: &'a EmployeeDraft) -> Self {
        Self {
            name: Some(&draft.name),
            phone: Some(&draft.phone),
            address: Some(&draft.address),
            username: Some(&draft.credentials.username),
            password: Some(&draft.credentials.secret),
            permission: Some(draft.permission.as_wire()),
        }
    }
}

impl<'a> From<&'a EmployeePatch> for EmployeeBody<'a> {
    fn from(patch: &'a EmployeePatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            phone: patch.phone.as_deref(),
            address: patch.address.as_deref(),
            username: patch.username.as_deref(),
            password: patch.secret.as_deref(),
            permission: patch.permission.map(|p| p.as_wire()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachEmployeeBody {
    pub employee_id: WireId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aircraft_record() -> serde_json::Value {
        json!({
            "code": "320",
            "model": "A320",
            "category": "COMMERCIAL",
            "capacity": 180,
            "range": 6000,
            "stages": [{
                "id": 1,
                "name": "Fuselage",
                "deadline": "2026-12-01",
                "status": "IN_PROGRESS",
                "employees": [{"id": 7, "name": "Maria Souza"}]
            }],
            "parts": [{
                "code": "P-1",
                "name": "Asa",
                "origin": "DOMESTIC",
                "supplier": "Embraer",
                "status": "READY"
            }],
            "tests": [{"id": 2, "kind": "HYDRAULIC", "result": "APPROVED"}]
        })
    }

    #[test]
    fn test_decode_nested_aircraft() {
        let record: WireAircraft = serde_json::from_value(aircraft_record()).unwrap();
        let aircraft = record.into_domain().unwrap();

        assert_eq!(aircraft.code, AircraftCode::from("320"));
        assert_eq!(aircraft.range_km, 6000);
        assert_eq!(aircraft.stages[0].id, StageId::from("1"));
        assert_eq!(aircraft.stages[0].status, StageStatus::InProgress);
        assert_eq!(aircraft.stages[0].deadline, NaiveDate::from_ymd_opt(2026, 12, 1));
        assert!(aircraft.stages[0].has_employee(&EmployeeId::from("7")));
        assert_eq!(aircraft.parts[0].origin, PartOrigin::Domestic);
        assert_eq!(aircraft.tests[0].result, TestResult::Approved);
    }

    #[test]
    fn test_reencoding_reproduces_wire_shape() {
        let original = aircraft_record();
        let record: WireAircraft = serde_json::from_value(original.clone()).unwrap();
        let aircraft = record.into_domain().unwrap();

        let reencoded = serde_json::to_value(WireAircraft::from(&aircraft)).unwrap();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn test_timestamps_are_decoded_but_not_resent() {
        let mut record = aircraft_record();
        record["createdAt"] = json!("2026-01-05T10:00:00Z");
        let aircraft = serde_json::from_value::<WireAircraft>(record)
            .unwrap()
            .into_domain()
            .unwrap();
        assert!(aircraft.created_at.is_some());

        let reencoded = serde_json::to_value(WireAircraft::from(&aircraft)).unwrap();
        assert!(reencoded.get("createdAt").is_none());
    }

    #[test]
    fn test_unknown_part_status_is_schema_mismatch() {
        let mut record = aircraft_record();
        record["parts"][0]["status"] = json!("UNKNOWN_STATUS");
        let err = serde_json::from_value::<WireAircraft>(record)
            .unwrap()
            .into_domain()
            .unwrap_err();

        assert_eq!(err, RepositoryError::schema("status", "UNKNOWN_STATUS"));
    }

    #[test]
    fn test_negative_capacity_is_schema_mismatch() {
        let mut record = aircraft_record();
        record["capacity"] = json!(-1);
        let err = serde_json::from_value::<WireAircraft>(record)
            .unwrap()
            .into_domain()
            .unwrap_err();
        assert!(matches!(err, RepositoryError::SchemaMismatch { field: "capacity", .. }));
    }

    #[test]
    fn test_employee_field_renames() {
        let record: WireEmployee = serde_json::from_value(json!({
            "id": 12,
            "name": "João Silva",
            "phone": "(11) 98888-7777",
            "address": "Rua A, 123",
            "username": "joaos",
            "password": "123456",
            "permission": "Engenheiro"
        }))
        .unwrap();
        let employee = record.into_domain().unwrap();

        assert_eq!(employee.id, EmployeeId::from("12"));
        assert_eq!(employee.credentials.username, "joaos");
        assert_eq!(employee.credentials.secret, "123456");
        assert_eq!(employee.permission, PermissionLevel::Engineer);

        let reencoded = serde_json::to_value(WireEmployee::from(&employee)).unwrap();
        assert_eq!(reencoded["id"], json!(12));
        assert_eq!(reencoded["permission"], json!("ENGINEER"));
    }

    #[test]
    fn test_stage_employee_references_are_deduplicated() {
        let stage: WireStage = serde_json::from_value(json!({
            "id": "4",
            "name": "Pintura",
            "status": "PENDING",
            "employees": [{"id": 1, "name": "A"}, {"id": "1", "name": "A"}, {"name": "Legacy"}]
        }))
        .unwrap();
        let stage = stage.into_domain().unwrap();
        assert_eq!(stage.employees.len(), 2);
    }

    #[test]
    fn test_flat_dataset_normalizes_to_nested_shape() {
        let listing: WireAircraftListing = serde_json::from_value(json!({
            "aircraft": [{
                "code": "747",
                "model": "Boeing 747",
                "category": "COMMERCIAL",
                "capacity": 416,
                "range": 13450,
                "stageIds": ["e1", "missing"],
                "partIds": ["p1"],
                "testIds": []
            }],
            "stages": [{"id": "e1", "name": "Asa", "status": "DONE", "employeeIds": ["f1", "gone"]}],
            "parts": [{"id": "p1", "name": "Turbina", "origin": "IMPORTED", "supplier": "GE", "status": "IN_TRANSIT"}],
            "employees": [{"id": "f1", "name": "Maria", "username": "marias", "permission": "OPERATOR"}]
        }))
        .unwrap();

        let fleet = listing.into_domain().unwrap();
        assert_eq!(fleet.len(), 1);
        let aircraft = &fleet[0];
        assert_eq!(aircraft.stages.len(), 1);
        assert_eq!(aircraft.parts[0].code, PartCode::from("p1"));

        let staff = &aircraft.stages[0].employees;
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].name.as_deref(), Some("Maria"));
        assert_eq!(staff[1].id, Some(EmployeeId::from("gone")));
        assert_eq!(staff[1].name, None);
    }

    #[test]
    fn test_flat_dataset_keeps_shared_child_ids_with_their_owner() {
        let listing: WireAircraftListing = serde_json::from_value(json!({
            "aircraft": [
                {"code": "A", "model": "A320", "category": "COMMERCIAL", "capacity": 180, "range": 6000, "stageIds": ["1"]},
                {"code": "B", "model": "KC-390", "category": "MILITARY", "capacity": 80, "range": 5820, "stageIds": ["1"]}
            ],
            "stages": [
                {"id": 1, "aircraftCode": "A", "name": "A-fuselage", "status": "PENDING"},
                {"id": 1, "aeronaveCodigo": "B", "name": "B-wings", "status": "DONE"}
            ]
        }))
        .unwrap();

        let fleet = listing.into_domain().unwrap();
        let names = |i: usize| -> Vec<String> { fleet[i].stages.iter().map(|s| s.name.clone()).collect() };
        assert_eq!(names(0), vec!["A-fuselage".to_string()]);
        assert_eq!(names(1), vec!["B-wings".to_string()]);
    }

    #[test]
    fn test_unowned_flat_row_is_shared_by_every_referencing_aircraft() {
        let listing: WireAircraftListing = serde_json::from_value(json!({
            "aircraft": [
                {"code": "A", "model": "A320", "category": "COMMERCIAL", "capacity": 180, "range": 6000, "testIds": ["t1"]},
                {"code": "B", "model": "A321", "category": "COMMERCIAL", "capacity": 220, "range": 5900, "testIds": ["t1"]}
            ],
            "tests": [{"id": "t1", "kind": "AERODYNAMIC", "result": "APPROVED"}]
        }))
        .unwrap();

        let fleet = listing.into_domain().unwrap();
        assert_eq!(fleet[0].tests.len(), 1);
        assert_eq!(fleet[1].tests.len(), 1);
    }

    #[test]
    fn test_mixed_flat_dataset_decodes_nested_records() {
        let listing: WireAircraftListing = serde_json::from_value(json!({
            "aircraft": [
                aircraft_record(),
                {"code": "747", "model": "Boeing 747", "category": "COMMERCIAL", "capacity": 416, "range": 13450, "partIds": ["p1"]}
            ],
            "parts": [{"id": "p1", "name": "Turbina", "origin": "IMPORTED", "supplier": "GE", "status": "IN_TRANSIT"}]
        }))
        .unwrap();

        let fleet = listing.into_domain().unwrap();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].stages.len(), 1);
        assert_eq!(fleet[0].parts[0].code, PartCode::from("P-1"));
        assert_eq!(fleet[0].tests.len(), 1);
        assert_eq!(fleet[1].parts[0].code, PartCode::from("p1"));
    }

    #[test]
    fn test_patch_body_omits_absent_fields() {
        let patch = AircraftPatch {
            model: Some("A320neo".to_string()),
            ..AircraftPatch::default()
        };
        let body = serde_json::to_value(AircraftBody::from(&patch)).unwrap();
        assert_eq!(body, json!({"model": "A320neo"}));
    }

    #[test]
    fn test_wire_id_encoding() {
        assert_eq!(WireId::encode("42"), WireId::Number(42));
        assert_eq!(WireId::encode("007"), WireId::Text("007".to_string()));
        assert_eq!(WireId::encode("T001"), WireId::Text("T001".to_string()));
    }
}
