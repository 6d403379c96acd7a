// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::error::{CoreError, CoreResult, SyncStep};

use super::SyncBackend;

pub const COMMIT_MESSAGE: &str = "pUD: Update graph values.";

/// [`SyncBackend`] driving the `git` binary inside the data directory's repository.
#[derive(Debug, Clone)]
pub struct GitSync {
    program: OsString,
}

impl Default for GitSync {
    fn default() -> Self {
        Self::new()
    }
}

impl GitSync {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn git(&self, dir: &Path, args: &[&str], step: SyncStep) -> CoreResult<String> {
        tracing::debug!(dir = %dir.display(), ?args, "running git");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|err| CoreError::sync_failed(step, format!("cannot run git: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(CoreError::sync_failed(
                step,
                format!("git {} exited with {}: {stderr}", args.join(" "), output.status),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn head(&self, dir: &Path, step: SyncStep) -> CoreResult<String> {
        Ok(self
            .git(dir, &["rev-parse", "HEAD"], step)?
            .trim()
            .to_owned())
    }

    fn status_is_empty(&self, dir: &Path, pathspecs: &[&str]) -> CoreResult<bool> {
        let mut args = vec!["status", "--porcelain", "--untracked-files=all", "--"];
        args.extend_from_slice(pathspecs);
        Ok(self.git(dir, &args, SyncStep::Status)?.trim().is_empty())
    }
}

impl SyncBackend for GitSync {
    fn check_clean(&mut self, dir: &Path) -> CoreResult<bool> {
        // Whole repository minus the data directory.
        self.status_is_empty(dir, &[":/", ":!."])
    }

    fn has_local_changes(&mut self, dir: &Path) -> CoreResult<bool> {
        Ok(!self.status_is_empty(dir, &["."])?)
    }

    fn fetch(&mut self, dir: &Path, force: bool) -> CoreResult<bool> {
        let before = self.head(dir, SyncStep::Fetch)?;
        let mut args = vec!["pull", "--ff-only"];
        if force {
            args.push("--autostash");
        }
        self.git(dir, &args, SyncStep::Fetch)?;
        let changed = self.head(dir, SyncStep::Fetch)? != before;
        tracing::info!(changed, force, "fetched remote changes");
        Ok(changed)
    }

    fn commit(&mut self, dir: &Path) -> CoreResult<bool> {
        if !self.has_local_changes(dir)? {
            return Ok(false);
        }
        self.git(dir, &["add", "."], SyncStep::Commit)?;
        self.git(dir, &["commit", "-m", COMMIT_MESSAGE], SyncStep::Commit)?;
        tracing::info!("committed data changes");
        Ok(true)
    }

    fn push_commits(&mut self, dir: &Path) -> CoreResult<bool> {
        let ahead = self.git(dir, &["rev-list", "--count", "@{u}..HEAD"], SyncStep::Push)?;
        let ahead = ahead.trim().parse::<u64>().map_err(|err| {
            CoreError::sync_failed(SyncStep::Push, format!("unexpected rev-list output: {err}"))
        })?;
        if ahead == 0 {
            return Ok(false);
        }
        self.git(dir, &["push"], SyncStep::Push)?;
        tracing::info!(ahead, "pushed commits");
        Ok(true)
    }
}
