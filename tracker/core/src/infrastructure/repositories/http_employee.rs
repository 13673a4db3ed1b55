// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::employee::{Employee, EmployeeDraft, EmployeeId, EmployeePatch};
use crate::domain::repository::{EmployeeRepository, RepositoryError};
use crate::infrastructure::remote_client::RemoteStoreClient;
use crate::infrastructure::wire::{EmployeeBody, WireEmployee};

const COLLECTION: &str = "employees";

pub struct HttpEmployeeRepository {
    client: Arc<RemoteStoreClient>,
}

impl HttpEmployeeRepository {
    pub fn new(client: Arc<RemoteStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmployeeRepository for HttpEmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        let records: Vec<WireEmployee> = self.client.get(&[COLLECTION]).await?;
        records.into_iter().map(WireEmployee::into_domain).collect()
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee, RepositoryError> {
        let record: WireEmployee = self.client.get(&[COLLECTION, id.as_str()]).await?;
        record.into_domain()
    }

    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, RepositoryError> {
        let record: WireEmployee = self
            .client
            .post(&[COLLECTION], &EmployeeBody::from(draft))
            .await?;
        record.into_domain()
    }

    async fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<Employee, RepositoryError> {
        let record: WireEmployee = self
            .client
            .put(&[COLLECTION, id.as_str()], &EmployeeBody::from(patch))
            .await?;
        record.into_domain()
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), RepositoryError> {
        self.client.delete(&[COLLECTION, id.as_str()]).await
    }
}
