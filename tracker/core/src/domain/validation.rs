// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Caller payload validation, checked before any network call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field '{field}' is missing or blank")]
    MissingField { field: &'static str },

    #[error("patch does not change any field")]
    EmptyPatch,

    #[error("aircraft code '{0}' is already registered")]
    DuplicateCode(String),
}

/// Fails when a required text field is blank after trimming.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

/// Same as [`require_text`] but only for fields the caller chose to send.
pub(crate) fn require_text_if_present(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}
