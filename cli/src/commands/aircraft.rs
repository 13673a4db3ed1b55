// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Aircraft commands
//!
//! Commands: list, show

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};

use aerotrack_core::application::DomainCoordinator;
use aerotrack_core::{AircraftCategory, AircraftCode, PartStatus, ResolvedMember, StageStatus, TestResult};

use crate::context;

#[derive(Subcommand)]
pub enum AircraftCommand {
    /// List aircraft
    List {
        /// Only show aircraft of this category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },

    /// Show one aircraft with its stages, parts, tests, statistics and team
    Show {
        /// Aircraft code
        code: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Commercial,
    Military,
}

impl From<CategoryArg> for AircraftCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Commercial => AircraftCategory::Commercial,
            CategoryArg::Military => AircraftCategory::Military,
        }
    }
}

pub async fn handle_command(command: AircraftCommand, config_path: Option<PathBuf>) -> Result<()> {
    let coordinator = context::connect(config_path).await?;
    match command {
        AircraftCommand::List { category } => list(&coordinator, category),
        AircraftCommand::Show { code } => show(&coordinator, &AircraftCode::from(code)),
    }
}

fn list(coordinator: &DomainCoordinator, category: Option<CategoryArg>) -> Result<()> {
    let fleet = match category {
        Some(category) => coordinator.list_by_category(category.into()),
        None => coordinator.aircraft(),
    };

    if fleet.is_empty() {
        println!("{}", "No aircraft found".dimmed());
        return Ok(());
    }

    println!("{}", "Aircraft:".bold());
    for aircraft in &fleet {
        println!(
            "  {:<10} {:<20} {:<11} capacity {:>4}  range {:>6} km  stages {}",
            aircraft.code.as_str().bold(),
            aircraft.model,
            aircraft.category,
            aircraft.capacity,
            aircraft.range_km,
            aircraft.stages.len()
        );
    }

    let summary = coordinator.fleet_summary();
    println!();
    println!(
        "Total: {} ({} commercial, {} military)",
        summary.total, summary.commercial, summary.military
    );
    Ok(())
}

fn show(coordinator: &DomainCoordinator, code: &AircraftCode) -> Result<()> {
    let aircraft = coordinator
        .aircraft_by_code(code)
        .with_context(|| format!("Aircraft '{}' not found", code))?;
    let stats = coordinator
        .statistics(code)
        .with_context(|| format!("Aircraft '{}' not found", code))?;
    let team = coordinator.team(code).unwrap_or_default();

    println!("{} {}", aircraft.code.as_str().bold(), aircraft.model);
    println!("  Category: {}", aircraft.category);
    println!("  Capacity: {}", aircraft.capacity);
    println!("  Range: {} km", aircraft.range_km);
    println!();

    println!("{}", "Stages:".bold());
    for stage in &aircraft.stages {
        let deadline = stage
            .deadline
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {} {} (deadline {})",
            stage.id,
            stage_status(stage.status),
            stage.name,
            deadline
        );
        let members = coordinator.stage_members(code, &stage.id).unwrap_or_default();
        for member in &members {
            println!("      - {}", member_label(member));
        }
    }
    println!();

    println!("{}", "Parts:".bold());
    for part in &aircraft.parts {
        println!(
            "  {} {} ({}, {}) {}",
            part.code.as_str().bold(),
            part.name,
            part.origin,
            part.supplier,
            part_status(part.status)
        );
    }
    println!();

    println!("{}", "Tests:".bold());
    for test in &aircraft.tests {
        println!("  {} {} {}", test.id, test.kind, test_result(test.result));
    }
    println!();

    println!("{}", "Statistics:".bold());
    println!(
        "  Stages: {} total, {} pending, {} in progress, {} done",
        stats.stages.total, stats.stages.pending, stats.stages.in_progress, stats.stages.done
    );
    println!(
        "  Parts: {} total, {} in production, {} in transit, {} ready",
        stats.parts.total, stats.parts.in_production, stats.parts.in_transit, stats.parts.ready
    );
    println!(
        "  Tests: {} total, {} not performed, {} approved, {} rejected",
        stats.tests.total, stats.tests.not_performed, stats.tests.approved, stats.tests.rejected
    );
    println!();

    println!("{} ({})", "Team:".bold(), team.len());
    for member in &team {
        println!("  - {}", member_label(member));
    }

    Ok(())
}

fn stage_status(status: StageStatus) -> ColoredString {
    match status {
        StageStatus::Pending => status.as_wire().yellow(),
        StageStatus::InProgress => status.as_wire().cyan(),
        StageStatus::Done => status.as_wire().green(),
    }
}

fn part_status(status: PartStatus) -> ColoredString {
    match status {
        PartStatus::InProduction => status.as_wire().yellow(),
        PartStatus::InTransit => status.as_wire().cyan(),
        PartStatus::Ready => status.as_wire().green(),
    }
}

fn test_result(result: TestResult) -> ColoredString {
    match result {
        TestResult::NotPerformed => result.as_wire().dimmed(),
        TestResult::Approved => result.as_wire().green(),
        TestResult::Rejected => result.as_wire().red(),
    }
}

/// Display line for a stage member; orphaned references are marked.
pub fn member_label(member: &ResolvedMember) -> String {
    let id = member
        .id
        .as_ref()
        .map(|id| format!(" #{}", id))
        .unwrap_or_default();
    if member.orphaned {
        format!("{}{} (no longer registered)", member.name, id)
    } else {
        format!("{}{}", member.name, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerotrack_core::EmployeeId;

    #[test]
    fn test_category_arg_maps_to_domain() {
        assert_eq!(AircraftCategory::from(CategoryArg::Military), AircraftCategory::Military);
        assert_eq!(
            CategoryArg::from_str("commercial", true).unwrap(),
            CategoryArg::Commercial
        );
    }

    #[test]
    fn test_member_label_marks_orphans() {
        let live = ResolvedMember {
            id: Some(EmployeeId::from("2")),
            name: "Maria Souza".to_string(),
            orphaned: false,
        };
        let orphan = ResolvedMember {
            orphaned: true,
            ..live.clone()
        };

        assert_eq!(member_label(&live), "Maria Souza #2");
        assert_eq!(member_label(&orphan), "Maria Souza #2 (no longer registered)");
    }
}
