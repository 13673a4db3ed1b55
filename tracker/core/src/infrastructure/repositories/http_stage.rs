// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Stages are a sub-resource of an aircraft; staffing is a further
//! sub-resource of a stage (`/aircraft/{code}/stages/{id}/employees`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::aircraft::{AircraftCode, Stage, StageDraft, StageId, StagePatch};
use crate::domain::employee::EmployeeId;
use crate::domain::repository::{RepositoryError, StageRepository};
use crate::infrastructure::remote_client::RemoteStoreClient;
use crate::infrastructure::wire::{AttachEmployeeBody, StageBody, WireId, WireStage};

pub struct HttpStageRepository {
    client: Arc<RemoteStoreClient>,
}

impl HttpStageRepository {
    pub fn new(client: Arc<RemoteStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StageRepository for HttpStageRepository {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Stage>, RepositoryError> {
        let records: Vec<WireStage> = self
            .client
            .get(&["aircraft", aircraft.as_str(), "stages"])
            .await?;
        records.into_iter().map(WireStage::into_domain).collect()
    }

    async fn create(&self, aircraft: &AircraftCode, draft: &StageDraft) -> Result<Stage, RepositoryError> {
        let record: WireStage = self
            .client
            .post(&["aircraft", aircraft.as_str(), "stages"], &StageBody::from(draft))
            .await?;
        record.into_domain()
    }

    async fn update(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        patch: &StagePatch,
    ) -> Result<Stage, RepositoryError> {
        let record: WireStage = self
            .client
            .put(
                &["aircraft", aircraft.as_str(), "stages", stage.as_str()],
                &StageBody::from(patch),
            )
            .await?;
        record.into_domain()
    }

    async fn delete(&self, aircraft: &AircraftCode, stage: &StageId) -> Result<(), RepositoryError> {
        self.client
            .delete(&["aircraft", aircraft.as_str(), "stages", stage.as_str()])
            .await
    }

    async fn attach_employee(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        let body = AttachEmployeeBody {
            employee_id: WireId::encode(employee.as_str()),
        };
        self.client
            .post_unit(
                &["aircraft", aircraft.as_str(), "stages", stage.as_str(), "employees"],
                &body,
            )
            .await
    }

    async fn detach_employee(
        &self,
        aircraft: &AircraftCode,
        stage: &StageId,
        employee: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        self.client
            .delete(&[
                "aircraft",
                aircraft.as_str(),
                "stages",
                stage.as_str(),
                "employees",
                employee.as_str(),
            ])
            .await
    }
}
