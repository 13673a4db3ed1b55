// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

// Client Configuration Types
//
// Defines how the core reaches the remote aggregate store:
// - Backend selection (HTTP or in-memory for development)
// - Base URL and transport timeout
// - Optional session used by the CLI composition root

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::employee::PermissionLevel;
use super::session::SessionContext;

/// Top-level client configuration (aerotrack-config.yaml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Remote store settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Session presented to the remote store (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteBackend {
    #[default]
    Http,
    InMemory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub backend: RemoteBackend,

    /// Base URL of the remote store API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout for every request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::default(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub username: String,
    pub permission: PermissionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<&SessionConfig> for SessionContext {
    fn from(config: &SessionConfig) -> Self {
        SessionContext {
            username: config.username.clone(),
            permission: config.permission,
            token: config.token.clone(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

impl ClientConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate paths in precedence order
    /// 1. AEROTRACK_CONFIG_PATH environment variable
    /// 2. ./aerotrack-config.yaml (working directory)
    /// 3. ~/.aerotrack/config.yaml (user home)
    /// 4. /etc/aerotrack/config.yaml (system, Unix)
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("AEROTRACK_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("./aerotrack-config.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".aerotrack").join("config.yaml"));
        }
        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/aerotrack/config.yaml"));
        paths
    }

    /// Discover configuration file using precedence order
    pub fn discover_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::warn!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("AEROTRACK_BASE_URL") {
            tracing::info!("Environment override: AEROTRACK_BASE_URL={}", url);
            self.remote.base_url = url;
        }
        if let Ok(token) = std::env::var("AEROTRACK_TOKEN") {
            match self.session.as_mut() {
                Some(session) => session.token = Some(token),
                None => tracing::warn!("AEROTRACK_TOKEN is set but no session is configured. Ignoring."),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.remote.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("remote.base_url cannot be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!(
                "Invalid remote.base_url: '{}'. Must start with http:// or https://",
                base_url
            );
        }
        if self.remote.timeout_seconds == 0 {
            anyhow::bail!("remote.timeout_seconds must be greater than zero");
        }
        if let Some(session) = &self.session {
            if session.username.trim().is_empty() {
                anyhow::bail!("session.username cannot be empty");
            }
        }
        Ok(())
    }

    pub fn session_context(&self) -> Option<SessionContext> {
        self.session.as_ref().map(SessionContext::from)
    }
}
