// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod cache;
pub mod coordinator;
pub mod repository_factory;

pub use cache::{AggregateCache, CacheEvent, CacheEventReceiver, KindStatus};
pub use coordinator::{CoordinatorError, CoordinatorResult, DomainCoordinator};
