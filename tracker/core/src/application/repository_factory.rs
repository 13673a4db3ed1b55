// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates the five repository handles for the configured remote backend,
//! keeping the domain layer free of infrastructure types.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Backend selection for the coordinator's repositories

use std::sync::Arc;

use crate::domain::client_config::{RemoteBackend, RemoteConfig};
use crate::domain::repository::{Repositories, RepositoryError};
use crate::domain::session::SessionGate;
use crate::infrastructure::remote_client::RemoteStoreClient;
use crate::infrastructure::repositories::{
    HttpAircraftRepository, HttpEmployeeRepository, HttpPartRepository, HttpStageRepository,
    HttpTestRepository, InMemoryRemoteStore,
};

/// Builds HTTP repositories sharing one client.
pub fn create_http_repositories(
    config: &RemoteConfig,
    session: Arc<dyn SessionGate>,
) -> Result<Repositories, RepositoryError> {
    let client = Arc::new(RemoteStoreClient::new(config, session)?);
    Ok(Repositories {
        aircraft: Arc::new(HttpAircraftRepository::new(Arc::clone(&client))),
        employees: Arc::new(HttpEmployeeRepository::new(Arc::clone(&client))),
        stages: Arc::new(HttpStageRepository::new(Arc::clone(&client))),
        parts: Arc::new(HttpPartRepository::new(Arc::clone(&client))),
        tests: Arc::new(HttpTestRepository::new(client)),
    })
}

/// Creates the repositories for the configured backend. The in-memory
/// backend starts from the demo production floor.
pub fn create_repositories(
    config: &RemoteConfig,
    session: Arc<dyn SessionGate>,
) -> Result<Repositories, RepositoryError> {
    match config.backend {
        RemoteBackend::Http => create_http_repositories(config, session),
        RemoteBackend::InMemory => Ok(InMemoryRemoteStore::with_demo_data().repositories()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aircraft::AircraftCode;
    use crate::infrastructure::session_gate::InMemorySessionGate;

    #[tokio::test]
    async fn test_in_memory_backend_is_seeded() {
        let config = RemoteConfig {
            backend: RemoteBackend::InMemory,
            ..RemoteConfig::default()
        };
        let repos = create_repositories(&config, Arc::new(InMemorySessionGate::new())).unwrap();

        assert!(!repos.aircraft.list().await.unwrap().is_empty());
        assert!(repos.aircraft.get(&AircraftCode::from("E195")).await.is_ok());
    }

    #[test]
    fn test_http_backend_rejects_unparseable_url() {
        let config = RemoteConfig {
            base_url: "not a url".to_string(),
            ..RemoteConfig::default()
        };
        assert!(create_repositories(&config, Arc::new(InMemorySessionGate::new())).is_err());
    }
}
