// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain failures raised at the store and command boundary.
///
/// The lifecycle, recurrence and alert functions in `core` are total and
/// never produce one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("Invalid amount '{0}': must be greater than zero")]
    InvalidAmount(String),

    #[error("Invalid email '{0}'")]
    InvalidEmail(String),

    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} '{key}' is ambiguous ({matches} matches)")]
    Ambiguous {
        kind: &'static str,
        key: String,
        matches: usize,
    },

    #[error("Transaction '{0}' is already paid")]
    AlreadyPaid(String),

    #[error("'{0}' is not allowed to perform this action")]
    Forbidden(String),

    #[error("Corrupt record {table}#{id}: {reason}")]
    Corrupt {
        table: &'static str,
        id: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        Error::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}
