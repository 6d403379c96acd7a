// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synchronization of the data directory with its remote copy.
//!
//! Every call receives the data directory explicitly; nothing here changes the process working
//! directory.

mod git;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::CoreResult;

pub use git::{GitSync, COMMIT_MESSAGE};

/// Result of a push, which commits pending changes first.
#[derive(Debug, Clone, PartialEq)]
pub struct PushOutcome {
    pub committed_first: bool,
    /// `Ok(true)` when commits were pushed, `Ok(false)` when nothing was ahead of the remote.
    pub pushed: CoreResult<bool>,
}

pub trait SyncBackend {
    /// `true` when nothing outside the data directory has uncommitted changes.
    fn check_clean(&mut self, dir: &Path) -> CoreResult<bool>;

    /// `true` when the data directory itself has uncommitted changes.
    fn has_local_changes(&mut self, dir: &Path) -> CoreResult<bool>;

    /// Pulls remote changes; `Ok(true)` when anything changed locally.
    fn fetch(&mut self, dir: &Path, force: bool) -> CoreResult<bool>;

    /// Commits the data directory; `Ok(false)` when there was nothing to commit.
    fn commit(&mut self, dir: &Path) -> CoreResult<bool>;

    /// Pushes local commits; `Ok(false)` when the branch is not ahead of its upstream.
    fn push_commits(&mut self, dir: &Path) -> CoreResult<bool>;

    fn push(&mut self, dir: &Path) -> PushOutcome {
        let committed_first = match self.commit(dir) {
            Ok(committed) => committed,
            Err(err) => {
                return PushOutcome {
                    committed_first: false,
                    pushed: Err(err),
                }
            }
        };
        PushOutcome {
            committed_first,
            pushed: self.push_commits(dir),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Fetch when the data directory is clean and the refresh interval has elapsed.
    #[default]
    Auto,
    /// Fetch unconditionally.
    Force,
    Disable,
}

impl UpdateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Force => "force",
            Self::Disable => "disable",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown update mode {0:?} (expected auto|a, force|f or disable|d)")]
pub struct ParseUpdateModeError(String);

impl FromStr for UpdateMode {
    type Err = ParseUpdateModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "auto" => Ok(Self::Auto),
            "f" | "force" => Ok(Self::Force),
            "d" | "disable" => Ok(Self::Disable),
            other => Err(ParseUpdateModeError(other.to_owned())),
        }
    }
}

/// What a refresh attempt did.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub mode: UpdateMode,
    /// Whether a fetch was actually attempted.
    pub fetched: bool,
    /// `Ok(changed)`, or the failure of the status check or the fetch.
    pub result: CoreResult<bool>,
}

impl RefreshReport {
    pub fn changed(&self) -> bool {
        matches!(self.result, Ok(true))
    }

    /// Forced refreshes are always recorded, automatic ones only when they changed or failed.
    pub fn should_record(&self) -> bool {
        match self.mode {
            UpdateMode::Force => true,
            UpdateMode::Auto => !matches!(self.result, Ok(false)),
            UpdateMode::Disable => false,
        }
    }

    /// Whether the last-update timestamp should move to now.
    pub fn succeeded_fetch(&self) -> bool {
        self.fetched && self.result.is_ok()
    }
}

/// Applies the refresh policy for `mode`, fetching at most once.
pub fn refresh(
    backend: &mut dyn SyncBackend,
    dir: &Path,
    mode: UpdateMode,
    last_update: i64,
    interval_secs: i64,
    now: i64,
) -> RefreshReport {
    let skipped = RefreshReport {
        mode,
        fetched: false,
        result: Ok(false),
    };
    match mode {
        UpdateMode::Disable => skipped,
        UpdateMode::Force => RefreshReport {
            mode,
            fetched: true,
            result: backend.fetch(dir, true),
        },
        UpdateMode::Auto => {
            if last_update.saturating_add(interval_secs) > now {
                tracing::debug!(last_update, interval_secs, "refresh interval not elapsed");
                return skipped;
            }
            match backend.has_local_changes(dir) {
                Ok(true) => {
                    tracing::debug!("data directory has local changes, not fetching");
                    skipped
                }
                Ok(false) => RefreshReport {
                    mode,
                    fetched: true,
                    result: backend.fetch(dir, false),
                },
                Err(err) => RefreshReport {
                    mode,
                    fetched: false,
                    result: Err(err),
                },
            }
        }
    }
}

/// Scripted backend that records every call.
#[cfg(test)]
pub(crate) mod fake {
    use std::path::Path;

    use crate::error::{CoreError, CoreResult, SyncStep};

    use super::SyncBackend;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct FakeSync {
        pub clean: bool,
        pub local_changes: bool,
        pub fetch_changes: bool,
        pub fail_fetch: bool,
        pub fail_push: bool,
        pub ahead: bool,
        pub calls: Vec<String>,
    }

    impl Default for FakeSync {
        fn default() -> Self {
            Self {
                clean: true,
                local_changes: false,
                fetch_changes: false,
                fail_fetch: false,
                fail_push: false,
                ahead: false,
                calls: Vec::new(),
            }
        }
    }

    impl SyncBackend for FakeSync {
        fn check_clean(&mut self, _dir: &Path) -> CoreResult<bool> {
            self.calls.push("check_clean".to_owned());
            Ok(self.clean)
        }

        fn has_local_changes(&mut self, _dir: &Path) -> CoreResult<bool> {
            self.calls.push("has_local_changes".to_owned());
            Ok(self.local_changes)
        }

        fn fetch(&mut self, _dir: &Path, force: bool) -> CoreResult<bool> {
            self.calls.push(format!("fetch(force={force})"));
            if self.fail_fetch {
                return Err(CoreError::sync_failed(SyncStep::Fetch, "remote unreachable"));
            }
            Ok(self.fetch_changes)
        }

        fn commit(&mut self, _dir: &Path) -> CoreResult<bool> {
            self.calls.push("commit".to_owned());
            let committed = std::mem::take(&mut self.local_changes);
            self.ahead |= committed;
            Ok(committed)
        }

        fn push_commits(&mut self, _dir: &Path) -> CoreResult<bool> {
            self.calls.push("push".to_owned());
            if self.fail_push {
                return Err(CoreError::sync_failed(SyncStep::Push, "rejected"));
            }
            Ok(std::mem::take(&mut self.ahead))
        }
    }
}
