// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::aircraft::{Aircraft, AircraftCode, AircraftDraft, AircraftPatch};
use crate::domain::repository::{AircraftRepository, RepositoryError};
use crate::infrastructure::remote_client::RemoteStoreClient;
use crate::infrastructure::wire::{AircraftBody, WireAircraft, WireAircraftListing};

const COLLECTION: &str = "aircraft";

pub struct HttpAircraftRepository {
    client: Arc<RemoteStoreClient>,
}

impl HttpAircraftRepository {
    pub fn new(client: Arc<RemoteStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AircraftRepository for HttpAircraftRepository {
    async fn list(&self) -> Result<Vec<Aircraft>, RepositoryError> {
        let listing: WireAircraftListing = self.client.get(&[COLLECTION]).await?;
        listing.into_domain()
    }

    async fn get(&self, code: &AircraftCode) -> Result<Aircraft, RepositoryError> {
        let record: WireAircraft = self.client.get(&[COLLECTION, code.as_str()]).await?;
        record.into_domain()
    }

    async fn create(&self, draft: &AircraftDraft) -> Result<Aircraft, RepositoryError> {
        let record: WireAircraft = self
            .client
            .post(&[COLLECTION], &AircraftBody::from(draft))
            .await?;
        record.into_domain()
    }

    async fn update(&self, code: &AircraftCode, patch: &AircraftPatch) -> Result<Aircraft, RepositoryError> {
        let record: WireAircraft = self
            .client
            .put(&[COLLECTION, code.as_str()], &AircraftBody::from(patch))
            .await?;
        record.into_domain()
    }

    async fn delete(&self, code: &AircraftCode) -> Result<(), RepositoryError> {
        self.client.delete(&[COLLECTION, code.as_str()]).await
    }
}
