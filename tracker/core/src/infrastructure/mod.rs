// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod wire;
pub mod remote_client;
pub mod repositories;
pub mod session_gate;

pub use remote_client::RemoteStoreClient;
pub use repositories::InMemoryRemoteStore;
pub use session_gate::InMemorySessionGate;
