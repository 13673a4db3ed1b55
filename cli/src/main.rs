// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # AeroTrack CLI
//!
//! The `aerotrack` binary is a thin composition root over `aerotrack-core`:
//! it loads the client configuration, wires the repositories, session gate
//! and domain coordinator, and runs one command.
//!
//! ## Commands
//!
//! - `aerotrack aircraft list|show` - Fleet overview and per-aircraft detail
//! - `aerotrack employees list|show` - Staff directory
//! - `aerotrack stage assign|unassign` - Stage staffing
//! - `aerotrack config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use aerotrack_cli::commands::{self, AircraftCommand, ConfigCommand, EmployeeCommand, StageCommand};

/// AeroTrack - Aircraft production tracker
#[derive(Parser)]
#[command(name = "aerotrack")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "AEROTRACK_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "AEROTRACK_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aircraft under manufacture
    #[command(name = "aircraft")]
    Aircraft {
        #[command(subcommand)]
        command: AircraftCommand,
    },

    /// Employee directory
    #[command(name = "employees")]
    Employees {
        #[command(subcommand)]
        command: EmployeeCommand,
    },

    /// Stage staffing
    #[command(name = "stage")]
    Stage {
        #[command(subcommand)]
        command: StageCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Aircraft { command }) => {
            commands::aircraft::handle_command(command, cli.config).await
        }
        Some(Commands::Employees { command }) => {
            commands::employees::handle_command(command, cli.config).await
        }
        Some(Commands::Stage { command }) => {
            commands::stage::handle_command(command, cli.config).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
