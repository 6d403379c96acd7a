// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session state tracking across invocations.
//!
//! The tracker owns the [`SessionState`] for one invocation and persists it after every change,
//! so an interrupted run leaves its pending-action marker on disk.

mod state;

use std::path::Path;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::model::{Catalog, Selection};
use crate::store::{StateFile, StoreError};

pub use state::{ActionKind, ActionRecord, PendingAction, SessionState, HISTORY_CAPACITY};

#[derive(Debug)]
pub struct SessionTracker {
    state: SessionState,
    file: StateFile,
    command_line: String,
    previous_pending: Option<PendingAction>,
}

impl SessionTracker {
    /// Loads (or creates) the state file and records `datapath` in it.
    pub fn open(
        file: StateFile,
        datapath: &Path,
        command_line: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let state = file.load_or_init(datapath, Utc::now())?;
        let previous_pending = state.pending().cloned();
        if let Some(pending) = &previous_pending {
            tracing::warn!(
                action = %pending.action,
                cmd = %pending.cmd,
                "previous invocation did not finish"
            );
        }
        Ok(Self {
            state,
            file,
            command_line: command_line.into(),
            previous_pending,
        })
    }

    /// The marker left by an earlier invocation, as found when this one started.
    pub fn previous_pending(&self) -> Option<&PendingAction> {
        self.previous_pending.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.state.selection()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) -> Result<(), StoreError> {
        self.state.set_selection(selection);
        self.save()
    }

    /// Resolves the persisted selection against a freshly loaded catalog.
    pub fn reconcile_selection(&mut self, catalog: &Catalog) {
        self.state.reconcile_selection(catalog);
    }

    pub fn set_last_update(&mut self, epoch_seconds: i64) -> Result<(), StoreError> {
        self.state.set_last_update(epoch_seconds);
        self.save()
    }

    /// Runs `f` against the state and persists whatever it changed.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut SessionState) -> R) -> Result<R, StoreError> {
        let out = f(&mut self.state);
        self.save()?;
        Ok(out)
    }

    /// Marks `action` as in flight.
    pub fn begin(&mut self, action: ActionKind, param: Option<Value>) -> Result<(), StoreError> {
        tracing::debug!(%action, "begin");
        self.state
            .set_pending(action, param, self.command_line.clone(), Utc::now());
        self.save()
    }

    pub fn record(
        &mut self,
        kind: ActionKind,
        success: bool,
        extra: Map<String, Value>,
    ) -> Result<(), StoreError> {
        tracing::debug!(%kind, success, "record");
        self.state.push_history(kind, success, extra, Utc::now());
        self.save()
    }

    /// Clears the pending-action marker at the end of an invocation that did not crash.
    pub fn finish(&mut self) -> Result<(), StoreError> {
        if self.state.clear_pending() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        self.file.save(&self.state)
    }
}
