// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # AeroTrack Core
//!
//! Domain state and synchronization layer for aircraft under manufacture.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Owns the in-memory aircraft/employee aggregates and mediates
//!   every mutation against the remote authoritative store
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`domain`] | Entities, payloads, repository and session contracts, config |
//! | [`application`] | `AggregateCache`, `DomainCoordinator`, repository factory |
//! | [`infrastructure`] | HTTP and in-memory repositories, wire mapping |

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
