// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Employee directory commands
//!
//! Commands: list, show

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use aerotrack_core::application::DomainCoordinator;
use aerotrack_core::{EmployeeId, StageId};

use crate::context;

#[derive(Subcommand)]
pub enum EmployeeCommand {
    /// List registered employees
    List,

    /// Show one employee and the stages they are assigned to
    Show {
        /// Employee id
        id: String,
    },
}

pub async fn handle_command(command: EmployeeCommand, config_path: Option<PathBuf>) -> Result<()> {
    let coordinator = context::connect(config_path).await?;
    match command {
        EmployeeCommand::List => list(&coordinator),
        EmployeeCommand::Show { id } => show(&coordinator, &EmployeeId::from(id)),
    }
}

fn list(coordinator: &DomainCoordinator) -> Result<()> {
    let employees = coordinator.employees();
    if employees.is_empty() {
        println!("{}", "No employees registered".dimmed());
        return Ok(());
    }

    println!("{}", "Employees:".bold());
    for employee in &employees {
        println!(
            "  {:<38} {:<24} {:<14} {}",
            employee.id.as_str().bold(),
            employee.name,
            employee.credentials.username,
            employee.permission
        );
    }
    println!();
    println!("Total: {}", employees.len());
    Ok(())
}

fn show(coordinator: &DomainCoordinator, id: &EmployeeId) -> Result<()> {
    let employee = coordinator
        .employee_by_id(id)
        .with_context(|| format!("Employee '{}' not found", id))?;

    println!("{} {}", employee.id.as_str().bold(), employee.name);
    println!("  Username: {}", employee.credentials.username);
    println!("  Permission: {}", employee.permission);
    println!("  Phone: {}", employee.phone);
    println!("  Address: {}", employee.address);
    println!();

    let assignments = assignments(coordinator, id);
    println!("{} ({})", "Assignments:".bold(), assignments.len());
    for (code, stage, name) in &assignments {
        println!("  {} stage {} {}", code, stage, name);
    }
    Ok(())
}

/// Every (aircraft code, stage id, stage name) the employee is staffed on.
fn assignments(coordinator: &DomainCoordinator, id: &EmployeeId) -> Vec<(String, StageId, String)> {
    coordinator
        .aircraft()
        .into_iter()
        .flat_map(|aircraft| {
            let code = aircraft.code.to_string();
            aircraft
                .stages
                .into_iter()
                .filter(|stage| stage.has_employee(id))
                .map(move |stage| (code.clone(), stage.id, stage.name))
        })
        .collect()
}
