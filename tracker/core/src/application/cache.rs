// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Aggregate Cache
//!
//! Last known-good copy of the aircraft and employee lists plus per-kind
//! loading/error state. Every write is a synchronous replace-by-key update;
//! the coordinator keeps the cache behind one `parking_lot::RwLock` and never
//! holds that lock across an await point.
//!
//! Change notifications go out on a tokio broadcast channel. Publishing never
//! blocks; a receiver that falls behind loses the oldest events.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Single source of truth for UI reads

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::aircraft::{Aircraft, AircraftCode, AircraftFields};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::repository::EntityKind;

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Loading and error state of one entity kind, as seen by readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct KindState {
    in_flight: u32,
    error: Option<String>,
}

impl KindState {
    fn status(&self) -> KindStatus {
        KindStatus {
            loading: self.in_flight > 0,
            error: self.error.clone(),
        }
    }
}

/// Change notification published after every applied write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    AircraftListReplaced { count: usize },
    EmployeeListReplaced { count: usize },
    AircraftUpserted(AircraftCode),
    AircraftRemoved(AircraftCode),
    AircraftPatched(AircraftCode),
    EmployeeUpserted(EmployeeId),
    EmployeeRemoved(EmployeeId),
    KindStatusChanged { kind: EntityKind, status: KindStatus },
    Reset,
}

pub struct AggregateCache {
    aircraft: Vec<Aircraft>,
    employees: Vec<Employee>,
    kinds: HashMap<EntityKind, KindState>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for AggregateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Capacity bounds how many events a slow receiver may fall behind
    /// before it starts losing them.
    pub fn with_event_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            aircraft: Vec::new(),
            employees: Vec::new(),
            kinds: HashMap::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> CacheEventReceiver {
        CacheEventReceiver {
            receiver: self.events.subscribe(),
        }
    }

    fn publish(&self, event: CacheEvent) {
        debug!("Publishing cache event: {:?}", event);
        if self.events.send(event).is_err() {
            debug!("No subscribers listening to cache events");
        }
    }

    // ------------------------------------------------------------------
    // Aircraft
    // ------------------------------------------------------------------

    /// Swaps the whole aircraft list. A code appearing twice keeps its
    /// first position and the later record.
    pub fn replace_aircraft_list(&mut self, list: Vec<Aircraft>) {
        self.aircraft = dedup_by_key(list, |a| a.code.clone());
        self.publish(CacheEvent::AircraftListReplaced {
            count: self.aircraft.len(),
        });
    }

    pub fn upsert_aircraft(&mut self, aircraft: Aircraft) {
        let code = aircraft.code.clone();
        match self.aircraft.iter_mut().find(|a| a.code == code) {
            Some(slot) => *slot = aircraft,
            None => self.aircraft.push(aircraft),
        }
        self.publish(CacheEvent::AircraftUpserted(code));
    }

    /// Returns whether an entry was removed.
    pub fn remove_aircraft(&mut self, code: &AircraftCode) -> bool {
        let before = self.aircraft.len();
        self.aircraft.retain(|a| &a.code != code);
        let removed = self.aircraft.len() != before;
        if removed {
            self.publish(CacheEvent::AircraftRemoved(code.clone()));
        }
        removed
    }

    /// Local-only shallow merge. No-op when the code is not cached.
    pub fn patch_aircraft(&mut self, code: &AircraftCode, fields: AircraftFields) -> bool {
        match self.aircraft.iter_mut().find(|a| &a.code == code) {
            Some(aircraft) => {
                aircraft.merge(fields);
                self.publish(CacheEvent::AircraftPatched(code.clone()));
                true
            }
            None => {
                warn!(code = %code, "Ignoring patch for aircraft that is not cached");
                false
            }
        }
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn aircraft_by_code(&self, code: &AircraftCode) -> Option<&Aircraft> {
        self.aircraft.iter().find(|a| &a.code == code)
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    pub fn replace_employee_list(&mut self, list: Vec<Employee>) {
        self.employees = dedup_by_key(list, |e| e.id.clone());
        self.publish(CacheEvent::EmployeeListReplaced {
            count: self.employees.len(),
        });
    }

    pub fn upsert_employee(&mut self, employee: Employee) {
        let id = employee.id.clone();
        match self.employees.iter_mut().find(|e| e.id == id) {
            Some(slot) => *slot = employee,
            None => self.employees.push(employee),
        }
        self.publish(CacheEvent::EmployeeUpserted(id));
    }

    pub fn remove_employee(&mut self, id: &EmployeeId) -> bool {
        let before = self.employees.len();
        self.employees.retain(|e| &e.id != id);
        let removed = self.employees.len() != before;
        if removed {
            self.publish(CacheEvent::EmployeeRemoved(id.clone()));
        }
        removed
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee_by_id(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    // ------------------------------------------------------------------
    // Kind status
    // ------------------------------------------------------------------

    pub fn kind_status(&self, kind: EntityKind) -> KindStatus {
        self.kinds
            .get(&kind)
            .map(KindState::status)
            .unwrap_or_default()
    }

    /// Marks one more operation of `kind` as in flight.
    pub fn begin(&mut self, kind: EntityKind) {
        self.kinds.entry(kind).or_default().in_flight += 1;
        self.publish_status(kind);
    }

    /// Settles one operation successfully and clears the stored error.
    pub fn settle_ok(&mut self, kind: EntityKind) {
        let state = self.kinds.entry(kind).or_default();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.error = None;
        self.publish_status(kind);
    }

    pub fn settle_err(&mut self, kind: EntityKind, message: impl Into<String>) {
        let state = self.kinds.entry(kind).or_default();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.error = Some(message.into());
        self.publish_status(kind);
    }

    /// Releases one in-flight operation without touching the error.
    pub fn abandon(&mut self, kind: EntityKind) {
        let state = self.kinds.entry(kind).or_default();
        state.in_flight = state.in_flight.saturating_sub(1);
        self.publish_status(kind);
    }

    fn publish_status(&self, kind: EntityKind) {
        self.publish(CacheEvent::KindStatusChanged {
            kind,
            status: self.kind_status(kind),
        });
    }

    /// Clears both lists and every kind status.
    pub fn reset(&mut self) {
        self.aircraft.clear();
        self.employees.clear();
        self.kinds.clear();
        self.publish(CacheEvent::Reset);
    }
}

fn dedup_by_key<T, K, F>(list: Vec<T>, key: F) -> Vec<T>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::with_capacity(list.len());
    for item in list {
        match positions.get(&key(&item)) {
            Some(&index) => unique[index] = item,
            None => {
                positions.insert(key(&item), unique.len());
                unique.push(item);
            }
        }
    }
    unique
}

/// Receiver for cache change notifications
pub struct CacheEventReceiver {
    receiver: broadcast::Receiver<CacheEvent>,
}

impl CacheEventReceiver {
    /// Wait for the next event
    pub async fn recv(&mut self) -> Result<CacheEvent, CacheEventError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => CacheEventError::Closed,
            broadcast::error::RecvError::Lagged(n) => {
                warn!("Cache event receiver lagged by {} events", n);
                CacheEventError::Lagged(n)
            }
        })
    }

    /// Try to receive an event without waiting
    pub fn try_recv(&mut self) -> Result<CacheEvent, CacheEventError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => CacheEventError::Empty,
            broadcast::error::TryRecvError::Closed => CacheEventError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Cache event receiver lagged by {} events", n);
                CacheEventError::Lagged(n)
            }
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CacheEventError {
    #[error("Cache event channel closed")]
    Closed,

    #[error("Receiver lagged by {0} events")]
    Lagged(u64),

    #[error("No events available")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aircraft::{AircraftCategory, AircraftDraft, Stage, StageDraft, StageId};
    use chrono::Utc;

    fn aircraft(code: &str, model: &str) -> Aircraft {
        Aircraft::from_draft(
            AircraftDraft {
                code: AircraftCode::from(code),
                model: model.to_string(),
                category: AircraftCategory::Commercial,
                capacity: 180,
                range_km: 6000,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_replace_collapses_duplicate_codes() {
        let mut cache = AggregateCache::new();
        cache.replace_aircraft_list(vec![
            aircraft("320", "A320"),
            aircraft("737", "B737"),
            aircraft("320", "A320neo"),
        ]);

        assert_eq!(cache.aircraft().len(), 2);
        assert_eq!(cache.aircraft()[0].model, "A320neo");
        assert_eq!(cache.aircraft()[1].code, AircraftCode::from("737"));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut cache = AggregateCache::new();
        cache.upsert_aircraft(aircraft("320", "A320"));
        cache.upsert_aircraft(aircraft("737", "B737"));
        cache.upsert_aircraft(aircraft("320", "A321"));

        assert_eq!(cache.aircraft().len(), 2);
        assert_eq!(cache.aircraft()[0].model, "A321");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cache = AggregateCache::new();
        cache.upsert_aircraft(aircraft("320", "A320"));

        assert!(cache.remove_aircraft(&AircraftCode::from("320")));
        assert!(!cache.remove_aircraft(&AircraftCode::from("320")));
        assert!(cache.aircraft().is_empty());
    }

    #[test]
    fn test_patch_replaces_only_given_collection() {
        let mut cache = AggregateCache::new();
        cache.upsert_aircraft(aircraft("320", "A320"));
        let code = AircraftCode::from("320");

        let stages = vec![Stage::from_draft(StageId::from("1"), StageDraft::named("Fuselage"))];
        assert!(cache.patch_aircraft(&code, AircraftFields::stages(stages)));

        let patched = cache.aircraft_by_code(&code).unwrap();
        assert_eq!(patched.stages.len(), 1);
        assert_eq!(patched.model, "A320");
        assert!(!cache.patch_aircraft(&AircraftCode::from("999"), AircraftFields::default()));
    }

    #[test]
    fn test_loading_tracks_overlapping_operations() {
        let mut cache = AggregateCache::new();
        cache.begin(EntityKind::Aircraft);
        cache.begin(EntityKind::Aircraft);
        cache.settle_err(EntityKind::Aircraft, "failed to update aircraft: boom");

        let status = cache.kind_status(EntityKind::Aircraft);
        assert!(status.loading);
        assert_eq!(status.error.as_deref(), Some("failed to update aircraft: boom"));

        cache.settle_ok(EntityKind::Aircraft);
        assert_eq!(cache.kind_status(EntityKind::Aircraft), KindStatus::default());
        assert_eq!(cache.kind_status(EntityKind::Employee), KindStatus::default());
    }

    #[test]
    fn test_abandon_keeps_error() {
        let mut cache = AggregateCache::new();
        cache.begin(EntityKind::Part);
        cache.settle_err(EntityKind::Part, "failed");
        cache.begin(EntityKind::Part);
        cache.abandon(EntityKind::Part);

        let status = cache.kind_status(EntityKind::Part);
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("failed"));
    }

    #[test]
    fn test_events_are_published() {
        let mut cache = AggregateCache::new();
        let mut events = cache.subscribe();

        cache.upsert_aircraft(aircraft("320", "A320"));
        cache.reset();

        assert_eq!(
            events.try_recv().unwrap(),
            CacheEvent::AircraftUpserted(AircraftCode::from("320"))
        );
        assert_eq!(events.try_recv().unwrap(), CacheEvent::Reset);
        assert_eq!(events.try_recv().unwrap_err(), CacheEventError::Empty);
        assert!(cache.aircraft().is_empty());
    }

    #[test]
    fn test_slow_receiver_lags() {
        let mut cache = AggregateCache::with_event_capacity(2);
        let mut events = cache.subscribe();
        for code in ["1", "2", "3", "4"] {
            cache.upsert_aircraft(aircraft(code, "X"));
        }
        assert!(matches!(events.try_recv(), Err(CacheEventError::Lagged(_))));
    }
}
