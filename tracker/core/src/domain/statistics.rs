// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Per-aircraft and fleet-wide counters shown on the dashboards.

use serde::Serialize;

use super::aircraft::{Aircraft, AircraftCategory, PartStatus, StageStatus, TestResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartCounts {
    pub total: usize,
    pub in_production: usize,
    pub in_transit: usize,
    pub ready: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestCounts {
    pub total: usize,
    pub not_performed: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AircraftStatistics {
    pub stages: StageCounts,
    pub parts: PartCounts,
    pub tests: TestCounts,
    pub team_size: usize,
}

impl AircraftStatistics {
    pub fn of(aircraft: &Aircraft) -> Self {
        let mut stats = Self {
            team_size: aircraft.team().len(),
            ..Self::default()
        };

        for stage in &aircraft.stages {
            stats.stages.total += 1;
            match stage.status {
                StageStatus::Pending => stats.stages.pending += 1,
                StageStatus::InProgress => stats.stages.in_progress += 1,
                StageStatus::Done => stats.stages.done += 1,
            }
        }

        for part in &aircraft.parts {
            stats.parts.total += 1;
            match part.status {
                PartStatus::InProduction => stats.parts.in_production += 1,
                PartStatus::InTransit => stats.parts.in_transit += 1,
                PartStatus::Ready => stats.parts.ready += 1,
            }
        }

        for test in &aircraft.tests {
            stats.tests.total += 1;
            match test.result {
                TestResult::NotPerformed => stats.tests.not_performed += 1,
                TestResult::Approved => stats.tests.approved += 1,
                TestResult::Rejected => stats.tests.rejected += 1,
            }
        }

        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub commercial: usize,
    pub military: usize,
}

impl FleetSummary {
    pub fn of(fleet: &[Aircraft]) -> Self {
        fleet.iter().fold(Self::default(), |mut acc, aircraft| {
            acc.total += 1;
            match aircraft.category {
                AircraftCategory::Commercial => acc.commercial += 1,
                AircraftCategory::Military => acc.military += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aircraft::{AircraftCode, AircraftDraft, Stage, StageDraft, StageId};
    use chrono::Utc;

    #[test]
    fn test_stage_counts_by_status() {
        let mut aircraft = Aircraft::from_draft(
            AircraftDraft {
                code: AircraftCode::from("007"),
                model: "F-39 Gripen".to_string(),
                category: AircraftCategory::Military,
                capacity: 1,
                range_km: 4000,
            },
            Utc::now(),
        );
        for (id, status) in [("1", StageStatus::Pending), ("2", StageStatus::Done), ("3", StageStatus::Done)] {
            let mut stage = Stage::from_draft(StageId::from(id), StageDraft::named("Montagem"));
            stage.status = status;
            aircraft.stages.push(stage);
        }

        let stats = AircraftStatistics::of(&aircraft);
        assert_eq!(stats.stages.total, 3);
        assert_eq!(stats.stages.pending, 1);
        assert_eq!(stats.stages.done, 2);
        assert_eq!(stats.parts, PartCounts::default());

        let fleet = FleetSummary::of(std::slice::from_ref(&aircraft));
        assert_eq!(fleet.military, 1);
        assert_eq!(fleet.commercial, 0);
    }
}
