// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::aircraft::{AircraftCode, Part, PartCode, PartDraft, PartPatch};
use crate::domain::repository::{PartRepository, RepositoryError};
use crate::infrastructure::remote_client::RemoteStoreClient;
use crate::infrastructure::wire::{PartBody, WirePart};

pub struct HttpPartRepository {
    client: Arc<RemoteStoreClient>,
}

impl HttpPartRepository {
    pub fn new(client: Arc<RemoteStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PartRepository for HttpPartRepository {
    async fn list(&self, aircraft: &AircraftCode) -> Result<Vec<Part>, RepositoryError> {
        let records: Vec<WirePart> = self
            .client
            .get(&["aircraft", aircraft.as_str(), "parts"])
            .await?;
        records.into_iter().map(WirePart::into_domain).collect()
    }

    async fn create(&self, aircraft: &AircraftCode, draft: &PartDraft) -> Result<Part, RepositoryError> {
        let record: WirePart = self
            .client
            .post(&["aircraft", aircraft.as_str(), "parts"], &PartBody::from(draft))
            .await?;
        record.into_domain()
    }

    async fn update(
        &self,
        aircraft: &AircraftCode,
        part: &PartCode,
        patch: &PartPatch,
    ) -> Result<Part, RepositoryError> {
        let record: WirePart = self
            .client
            .put(
                &["aircraft", aircraft.as_str(), "parts", part.as_str()],
                &PartBody::from(patch),
            )
            .await?;
        record.into_domain()
    }

    async fn delete(&self, aircraft: &AircraftCode, part: &PartCode) -> Result<(), RepositoryError> {
        self.client
            .delete(&["aircraft", aircraft.as_str(), "parts", part.as_str()])
            .await
    }
}
