// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! In-memory session gate.
//!
//! Holds at most one active session. The coordinator only reads it; the
//! surrounding application signs in and out.

use parking_lot::RwLock;
use tracing::info;

use crate::domain::employee::Employee;
use crate::domain::session::{authenticate, SessionContext, SessionGate};

#[derive(Default)]
pub struct InMemorySessionGate {
    current: RwLock<Option<SessionContext>>,
}

impl InMemorySessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(context: SessionContext) -> Self {
        Self {
            current: RwLock::new(Some(context)),
        }
    }

    pub fn sign_in(&self, context: SessionContext) {
        info!(username = %context.username, permission = %context.permission, "Session started");
        *self.current.write() = Some(context);
    }

    /// Signs in with the credentials of a known employee. Returns whether
    /// the credentials matched.
    pub fn sign_in_with_credentials(&self, employees: &[Employee], username: &str, secret: &str) -> bool {
        match authenticate(employees, username, secret) {
            Some(context) => {
                self.sign_in(context);
                true
            }
            None => false,
        }
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.current.write().take() {
            info!(username = %previous.username, "Session ended");
        }
    }
}

impl SessionGate for InMemorySessionGate {
    fn current(&self) -> Option<SessionContext> {
        self.current.read().clone()
    }
}
