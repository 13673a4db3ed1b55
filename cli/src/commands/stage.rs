// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Stage staffing commands
//!
//! Commands: assign, unassign

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use aerotrack_core::application::DomainCoordinator;
use aerotrack_core::{AircraftCode, EmployeeId, Stage, StageId};

use crate::commands::aircraft::member_label;
use crate::context;

#[derive(Args)]
pub struct StageMember {
    /// Aircraft code
    pub code: String,

    /// Stage id within the aircraft
    pub stage: String,

    /// Employee id
    pub employee: String,
}

#[derive(Subcommand)]
pub enum StageCommand {
    /// Add an employee to a stage
    Assign(StageMember),

    /// Remove an employee from a stage
    Unassign(StageMember),
}

pub async fn handle_command(command: StageCommand, config_path: Option<PathBuf>) -> Result<()> {
    let coordinator = context::connect(config_path).await?;
    match command {
        StageCommand::Assign(member) => {
            let (code, stage, employee) = member.ids();
            let staffed = coordinator
                .add_employee_to_stage(&code, &stage, &employee)
                .await
                .with_context(|| format!("Failed to assign {} to stage {} of {}", employee, stage, code))?;
            println!("{}", format!("✓ Employee {} assigned", employee).green());
            print_members(&coordinator, &code, &staffed);
        }
        StageCommand::Unassign(member) => {
            let (code, stage, employee) = member.ids();
            let staffed = coordinator
                .remove_employee_from_stage(&code, &stage, &employee)
                .await
                .with_context(|| format!("Failed to remove {} from stage {} of {}", employee, stage, code))?;
            println!("{}", format!("✓ Employee {} removed", employee).green());
            print_members(&coordinator, &code, &staffed);
        }
    }
    Ok(())
}

impl StageMember {
    fn ids(self) -> (AircraftCode, StageId, EmployeeId) {
        (
            AircraftCode::from(self.code),
            StageId::from(self.stage),
            EmployeeId::from(self.employee),
        )
    }
}

fn print_members(coordinator: &DomainCoordinator, code: &AircraftCode, stage: &Stage) {
    println!();
    println!("{} {} [{}]", "Stage".bold(), stage.name, stage.status);
    let members = coordinator.stage_members(code, &stage.id).unwrap_or_default();
    if members.is_empty() {
        println!("  {}", "(no employees)".dimmed());
    }
    for member in &members {
        println!("  - {}", member_label(member));
    }
}
