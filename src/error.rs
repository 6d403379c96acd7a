// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Handled failures of top-level actions.
//!
//! A `CoreError` is never fatal: the failed action is recorded in the session history, reported
//! to the operator, and the invocation exits non-zero. Persistence failures live in
//! [`crate::store::StoreError`] instead and abort the invocation.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("not found: {what}")]
    NotFound { what: String },
    #[error("ambiguous selection: {what} (candidates: {})", .candidates.join(", "))]
    Ambiguous {
        what: String,
        candidates: Vec<String>,
    },
    #[error("index {index} is out of range for {len} datapoints")]
    OutOfRange { index: i64, len: usize },
    #[error("cannot parse {literal:?}: expected a number, a timestamp (YYYY-MM-DD HH:MM:SS) or \"now\"")]
    Unparseable { literal: String },
    #[error("the data store has uncommitted changes outside the data directory")]
    DirtyStore,
    #[error("{step} failed: {detail}")]
    SyncFailed { step: SyncStep, detail: String },
    #[error("add aborted by operator")]
    Aborted,
    #[error("no graph selected")]
    NoSelection,
}

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn ambiguous(what: impl Into<String>, candidates: Vec<String>) -> Self {
        Self::Ambiguous {
            what: what.into(),
            candidates,
        }
    }

    pub fn unparseable(literal: impl Into<String>) -> Self {
        Self::Unparseable {
            literal: literal.into(),
        }
    }

    pub fn sync_failed(step: SyncStep, detail: impl Into<String>) -> Self {
        Self::SyncFailed {
            step,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Unparseable { .. } => ErrorKind::Unparseable,
            Self::DirtyStore => ErrorKind::DirtyStore,
            Self::SyncFailed { .. } => ErrorKind::SyncFailed,
            Self::Aborted => ErrorKind::Aborted,
            Self::NoSelection => ErrorKind::NoSelection,
        }
    }
}

/// Stable, machine-readable error kind, recorded in action history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Ambiguous,
    OutOfRange,
    Unparseable,
    DirtyStore,
    SyncFailed,
    Aborted,
    NoSelection,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Ambiguous => "AMBIGUOUS",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unparseable => "UNPARSEABLE",
            Self::DirtyStore => "DIRTY_STORE",
            Self::SyncFailed => "SYNC_FAILED",
            Self::Aborted => "ABORTED",
            Self::NoSelection => "NO_SELECTION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Status,
    Fetch,
    Commit,
    Push,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Status => "status check",
            Self::Fetch => "fetch",
            Self::Commit => "commit",
            Self::Push => "push",
        })
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
