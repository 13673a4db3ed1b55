// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use aerotrack_core::domain::client_config::{ClientConfig, SessionConfig};
use aerotrack_core::PermissionLevel;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./aerotrack-config.yaml)
        #[arg(short, long, default_value = "./aerotrack-config.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output } => generate(output).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ClientConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for (index, path) in ClientConfig::search_paths().iter().enumerate() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} ({})", index + 1, path.display(), marker);
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Remote Store:".bold());
    println!("  Backend: {:?}", config.remote.backend);
    println!("  Base URL: {}", config.remote.base_url);
    println!("  Timeout: {}s", config.remote.timeout_seconds);
    println!();

    println!("{}", "Session:".bold());
    match &config.session {
        Some(session) => {
            println!("  Username: {}", session.username);
            println!("  Permission: {}", session.permission);
            println!(
                "  Token: {}",
                if session.token.is_some() { "(set)" } else { "(not set)" }
            );
        }
        None => println!("  {}", "(none)".dimmed()),
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ClientConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    if config.session.is_none() {
        println!(
            "{}",
            "! No session configured; data commands will be rejected".yellow()
        );
    }
    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf) -> Result<()> {
    sample_config()
        .to_yaml_file(&output)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn sample_config() -> ClientConfig {
    ClientConfig {
        session: Some(SessionConfig {
            username: "admin".to_string(),
            permission: PermissionLevel::Admin,
            token: None,
        }),
        ..ClientConfig::default()
    }
}
