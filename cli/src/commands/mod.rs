// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! CLI command implementations

pub mod aircraft;
pub mod config;
pub mod employees;
pub mod stage;

pub use aircraft::AircraftCommand;
pub use config::ConfigCommand;
pub use employees::EmployeeCommand;
pub use stage::StageCommand;
