// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Coordinator wiring shared by the data commands.
//!
//! Loads and validates the client configuration, signs the configured
//! session in, builds the repositories for the configured backend and loads
//! both aggregate lists. Ctrl-C cancels the initial load.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use aerotrack_core::application::repository_factory::create_repositories;
use aerotrack_core::application::DomainCoordinator;
use aerotrack_core::domain::client_config::ClientConfig;
use aerotrack_core::infrastructure::InMemorySessionGate;

pub fn load_config(config_path: Option<PathBuf>) -> Result<ClientConfig> {
    let config = ClientConfig::load_or_default(config_path).context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

pub fn build_coordinator(config: &ClientConfig) -> Result<DomainCoordinator> {
    let session = config.session_context().context(
        "No session configured. Add a `session` section (username, permission, token) to the configuration file",
    )?;
    let gate = Arc::new(InMemorySessionGate::signed_in(session));
    let repositories =
        create_repositories(&config.remote, gate.clone()).context("Failed to create repositories")?;
    Ok(DomainCoordinator::new(repositories, gate))
}

/// Builds a coordinator and loads aircraft and employees into its cache.
pub async fn connect(config_path: Option<PathBuf>) -> Result<DomainCoordinator> {
    let config = load_config(config_path)?;
    let coordinator = build_coordinator(&config)?;
    debug!(base_url = %config.remote.base_url, backend = ?config.remote.backend, "Coordinator ready");

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let loaded = coordinator.load_all(&cancel).await;
    ctrl_c.abort();
    loaded.context("Failed to load data from the remote store")?;

    Ok(coordinator)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_MEMORY_CONFIG: &str = r#"
remote:
  backend: in_memory
session:
  username: admin
  permission: Admin
"#;

    #[test]
    fn test_build_requires_session() {
        let config = ClientConfig::default();
        let err = build_coordinator(&config).err().unwrap();
        assert!(err.to_string().contains("No session configured"));
    }

    #[tokio::test]
    async fn test_connect_loads_in_memory_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aerotrack-config.yaml");
        std::fs::write(&path, IN_MEMORY_CONFIG).unwrap();

        let coordinator = connect(Some(path)).await.unwrap();
        assert_eq!(coordinator.total_aircraft(), 2);
        assert_eq!(coordinator.employees().len(), 3);
    }
}
