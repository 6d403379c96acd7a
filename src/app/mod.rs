// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One invocation, start to finish.
//!
//! Steps run in a fixed order (update, dirty-store check, catalog load, listing, select, add,
//! remove, data, plot, commit, push, history). Each step first sets the pending-action marker.
//! A failed step is recorded and stops the rest; the marker is then cleared as usual. Store
//! errors abort immediately and leave the marker on disk.

use std::io::{self, Write};

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::config::Settings;
use crate::error::CoreError;
use crate::model::{Catalog, Chain, Selection};
use crate::ops::{self, MutationError, OpOutcome, SwapDecider};
use crate::query::{self, SelectionQuery};
use crate::render::{
    render_history, render_listing, render_pending_warning, render_plot, render_table,
};
use crate::session::{ActionKind, SessionTracker};
use crate::store::{DataDir, StoreError};
use crate::sync::{self, SyncBackend, UpdateMode};

/// Everything one command line asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub update: UpdateMode,
    pub list: bool,
    pub list_info: bool,
    pub select: Option<SelectionQuery>,
    pub add: Option<(String, String)>,
    /// Insert position for `add`.
    pub to: Option<i64>,
    pub remove: Option<i64>,
    pub data: bool,
    pub plot: bool,
    pub commit: bool,
    pub push: bool,
    pub history: bool,
    /// Recorded in the pending-action marker.
    pub command_line: String,
}

impl Invocation {
    fn mutates(&self) -> bool {
        self.add.is_some() || self.remove.is_some() || self.commit || self.push
    }

    fn needs_selection(&self) -> bool {
        self.add.is_some() || self.remove.is_some() || self.data || self.plot
    }

    /// The first requested step that works on the selection.
    fn selection_action(&self) -> ActionKind {
        if self.add.is_some() {
            ActionKind::Add
        } else if self.remove.is_some() {
            ActionKind::Remove
        } else if self.data {
            ActionKind::ListData
        } else {
            ActionKind::Plot
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed,
    /// A step failed; it was recorded in the history.
    Failed(CoreError),
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Failed(_) => 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot write output")]
    Output(#[from] io::Error),
}

enum Interrupt {
    Handled(CoreError),
    Fatal(AppError),
}

impl From<CoreError> for Interrupt {
    fn from(err: CoreError) -> Self {
        Self::Handled(err)
    }
}

impl From<StoreError> for Interrupt {
    fn from(err: StoreError) -> Self {
        Self::Fatal(err.into())
    }
}

impl From<io::Error> for Interrupt {
    fn from(err: io::Error) -> Self {
        Self::Fatal(err.into())
    }
}

impl From<MutationError> for Interrupt {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::Core(err) => Self::Handled(err),
            MutationError::Store(err) => Self::Fatal(err.into()),
        }
    }
}

/// Runs `invocation` against the state file and data directory named by `settings`.
pub fn run(
    settings: &Settings,
    invocation: &Invocation,
    sync: &mut dyn SyncBackend,
    decider: &mut dyn SwapDecider,
    out: &mut dyn Write,
) -> Result<RunOutcome, AppError> {
    let tracker = SessionTracker::open(
        settings.state_file(),
        &settings.data_path(),
        invocation.command_line.clone(),
    )?;
    let mut runner = Runner {
        settings,
        invocation,
        tracker,
        data: settings.data_dir(),
        sync,
        decider,
        out,
    };

    let outcome = match runner.steps() {
        Ok(()) => RunOutcome::Completed,
        Err(Interrupt::Handled(err)) => {
            tracing::warn!(kind = %err.kind(), error = %err, "action failed");
            RunOutcome::Failed(err)
        }
        Err(Interrupt::Fatal(err)) => return Err(err),
    };
    runner.tracker.finish()?;
    Ok(outcome)
}

struct Runner<'a> {
    settings: &'a Settings,
    invocation: &'a Invocation,
    tracker: SessionTracker,
    data: DataDir,
    sync: &'a mut dyn SyncBackend,
    decider: &'a mut dyn SwapDecider,
    out: &'a mut dyn Write,
}

impl Runner<'_> {
    fn steps(&mut self) -> Result<(), Interrupt> {
        let inv = self.invocation;

        self.update(inv.update)?;
        if inv.mutates() {
            self.check_clean()?;
        }

        let mut catalog = self.load_catalog()?;
        if inv.list_info {
            self.list(&catalog, true)?;
        } else if inv.list {
            self.list(&catalog, false)?;
        }
        if let Some(query) = &inv.select {
            self.select(&catalog, query)?;
        }

        let selection = if inv.needs_selection() {
            Some(self.require_selection()?)
        } else {
            None
        };
        if let Some(selection) = &selection {
            if let Some((x, y)) = &inv.add {
                self.add(selection, x, y, inv.to)?;
                catalog = self.load_catalog()?;
            }
            if let Some(index) = inv.remove {
                self.remove(selection, index)?;
                catalog = self.load_catalog()?;
            }
            if inv.data {
                self.data(&catalog, selection)?;
            }
            if inv.plot {
                self.plot(&catalog, selection)?;
            }
        }

        if inv.commit {
            self.commit()?;
        }
        if inv.push {
            self.push()?;
        }
        if inv.history {
            self.history()?;
        }
        Ok(())
    }

    fn update(&mut self, mode: UpdateMode) -> Result<(), Interrupt> {
        if mode == UpdateMode::Disable {
            return Ok(());
        }
        self.tracker
            .begin(ActionKind::Update, Some(json!(mode.as_str())))?;

        let now = Utc::now().timestamp();
        let interval = i64::try_from(self.settings.refresh_interval_secs()).unwrap_or(i64::MAX);
        let report = sync::refresh(
            &mut *self.sync,
            self.data.root(),
            mode,
            self.tracker.state().last_update(),
            interval,
            now,
        );
        if report.succeeded_fetch() {
            self.tracker.set_last_update(now)?;
        }
        if report.should_record() {
            self.tracker.record(
                ActionKind::Update,
                report.result.is_ok(),
                extra([
                    ("arg", json!(mode.as_str())),
                    ("updated", json!(report.changed())),
                ]),
            )?;
        }

        match report.result {
            Ok(true) => writeln!(self.out, "Graphs updated from remote.")?,
            Ok(false) => {}
            Err(err) => {
                writeln!(self.out, "Failed to update graphs! Please fix.")?;
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn check_clean(&mut self) -> Result<(), Interrupt> {
        self.tracker.begin(ActionKind::CheckGitStatus, None)?;
        let err = match self.sync.check_clean(self.data.root()) {
            Ok(true) => return Ok(()),
            Ok(false) => {
                writeln!(
                    self.out,
                    "You have unsaved changes in your local repository, please commit or stash them before updating data.."
                )?;
                CoreError::DirtyStore
            }
            Err(err) => err,
        };
        self.tracker
            .record(ActionKind::CheckGitStatus, false, Map::new())?;
        Err(err.into())
    }

    fn load_catalog(&mut self) -> Result<Catalog, Interrupt> {
        self.tracker.begin(ActionKind::GetGraphs, None)?;
        let catalog = self.data.load_catalog()?;
        self.tracker.reconcile_selection(&catalog);
        Ok(catalog)
    }

    fn list(&mut self, catalog: &Catalog, with_info: bool) -> Result<(), Interrupt> {
        let kind = if with_info {
            ActionKind::ListInfo
        } else {
            ActionKind::List
        };
        self.tracker.begin(kind, None)?;

        if let Some(pending) = self.tracker.previous_pending() {
            writeln!(self.out, "{}", render_pending_warning(pending))?;
        }
        if catalog.is_empty() {
            writeln!(self.out, "No graphs in {}", self.data.root().display())?;
        } else {
            let listing = render_listing(catalog, self.tracker.selection(), with_info);
            writeln!(self.out, "{listing}")?;
        }
        Ok(())
    }

    fn select(&mut self, catalog: &Catalog, query: &SelectionQuery) -> Result<(), Interrupt> {
        let before = self.tracker.selection().cloned();
        self.tracker
            .begin(ActionKind::Select, Some(json!(query.segments())))?;

        let result = self
            .tracker
            .update(|state| query::select(catalog, query, state))?;
        let changed = self.tracker.selection() != before.as_ref();
        if changed || result.is_err() {
            let by = match query {
                SelectionQuery::Index(_) => "index",
                SelectionQuery::Path(_) => "identifier",
            };
            self.tracker.record(
                ActionKind::Select,
                result.is_ok(),
                extra([("by", json!(by)), ("args", json!(query.segments()))]),
            )?;
        }

        match result {
            Ok(selection) => {
                writeln!(
                    self.out,
                    "Selected: {} > {} > {}",
                    selection.token, selection.graph, selection.chain
                )?;
                Ok(())
            }
            Err(err) => {
                if let SelectionQuery::Index(_) = query {
                    writeln!(self.out, "Try selecting one of these:")?;
                    writeln!(self.out, "{}", render_listing(catalog, None, false))?;
                }
                Err(err.into())
            }
        }
    }

    fn require_selection(&mut self) -> Result<Selection, Interrupt> {
        if let Some(selection) = self.tracker.selection() {
            return Ok(selection.clone());
        }

        let kind = self.invocation.selection_action();
        self.tracker.begin(kind, None)?;
        let stored = self.tracker.state().selected_dotted().to_owned();
        let err = if stored.is_empty() {
            writeln!(self.out, "You must select a graph first...")?;
            CoreError::NoSelection
        } else {
            CoreError::not_found(stored.clone())
        };
        self.tracker
            .record(kind, false, extra([("selected", json!(stored))]))?;
        Err(err.into())
    }

    fn add(
        &mut self,
        selection: &Selection,
        x: &str,
        y: &str,
        to: Option<i64>,
    ) -> Result<(), Interrupt> {
        let mut param = vec![json!(x), json!(y)];
        param.extend(to.map(|to| json!(to)));
        self.tracker.begin(ActionKind::Add, Some(Value::Array(param)))?;

        let result = ops::add_point(&self.data, selection, x, y, to, &mut *self.decider);
        let outcome = self.record_mutation(
            ActionKind::Add,
            result,
            extra([
                ("coords", json!([x, y])),
                ("to", json!(to)),
                ("selected", json!(selection.to_dotted())),
            ]),
        )?;
        writeln!(self.out, "Added [{}]: {}", outcome.index(), outcome.point())?;
        Ok(())
    }

    fn remove(&mut self, selection: &Selection, index: i64) -> Result<(), Interrupt> {
        self.tracker
            .begin(ActionKind::Remove, Some(json!([index])))?;

        let result = ops::remove_point(&self.data, selection, index);
        let outcome = self.record_mutation(
            ActionKind::Remove,
            result,
            extra([
                ("index", json!(index)),
                ("selected", json!(selection.to_dotted())),
            ]),
        )?;
        writeln!(self.out, "Removed [{}]: {}", outcome.index(), outcome.point())?;
        Ok(())
    }

    fn record_mutation(
        &mut self,
        kind: ActionKind,
        result: Result<OpOutcome, MutationError>,
        extra: Map<String, Value>,
    ) -> Result<OpOutcome, Interrupt> {
        match result {
            Ok(outcome) => {
                self.tracker.record(kind, true, extra)?;
                Ok(outcome)
            }
            Err(MutationError::Core(err)) => {
                self.tracker.record(kind, false, extra)?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn data(&mut self, catalog: &Catalog, selection: &Selection) -> Result<(), Interrupt> {
        self.tracker.begin(ActionKind::ListData, None)?;
        let chain = self.selected_chain(ActionKind::ListData, catalog, selection)?;
        writeln!(self.out, "{}", render_table(selection, chain))?;
        self.tracker
            .record(ActionKind::ListData, true, selected_extra(selection))?;
        Ok(())
    }

    fn plot(&mut self, catalog: &Catalog, selection: &Selection) -> Result<(), Interrupt> {
        self.tracker.begin(ActionKind::Plot, None)?;
        let chain = self.selected_chain(ActionKind::Plot, catalog, selection)?;
        let title = format!(
            "{} {} on {}",
            selection.token, selection.graph, selection.chain
        );
        match render_plot(chain, &title, self.settings.plot()) {
            Ok(plot) => {
                writeln!(self.out, "{plot}")?;
                self.tracker
                    .record(ActionKind::Plot, true, selected_extra(selection))?;
                Ok(())
            }
            Err(err) => {
                writeln!(self.out, "Could not plot data..")?;
                self.tracker
                    .record(ActionKind::Plot, false, selected_extra(selection))?;
                let what = format!("plottable datapoints in {selection} ({err})");
                Err(CoreError::not_found(what).into())
            }
        }
    }

    /// The selected chain, or a recorded failure when the selection went stale.
    fn selected_chain<'c>(
        &mut self,
        kind: ActionKind,
        catalog: &'c Catalog,
        selection: &Selection,
    ) -> Result<&'c Chain, Interrupt> {
        match catalog.chain(selection) {
            Some(chain) => Ok(chain),
            None => {
                self.tracker
                    .record(kind, false, selected_extra(selection))?;
                Err(CoreError::not_found(selection.to_dotted()).into())
            }
        }
    }

    fn commit(&mut self) -> Result<(), Interrupt> {
        self.tracker.begin(ActionKind::Commit, None)?;
        let result = self.sync.commit(self.data.root());
        self.tracker.record(
            ActionKind::Commit,
            result.is_ok(),
            extra([("commited", json!(matches!(result, Ok(true))))]),
        )?;
        if result? {
            writeln!(self.out, "Committed graph changes.")?;
        } else {
            writeln!(self.out, "You have no changes to commit...")?;
        }
        Ok(())
    }

    fn push(&mut self) -> Result<(), Interrupt> {
        self.tracker.begin(ActionKind::Push, None)?;
        let outcome = self.sync.push(self.data.root());
        if outcome.committed_first {
            writeln!(self.out, "Committed unsaved changes before push..")?;
        }
        self.tracker.record(
            ActionKind::Push,
            outcome.pushed.is_ok(),
            extra([
                ("pushed", json!(matches!(outcome.pushed, Ok(true)))),
                ("commited", json!(outcome.committed_first)),
            ]),
        )?;
        match outcome.pushed {
            Ok(true) => writeln!(self.out, "Pushed graph changes.")?,
            Ok(false) => writeln!(self.out, "You have no changes to push.")?,
            Err(err) => {
                writeln!(self.out, "Failed to push changes! Please fix.")?;
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn history(&mut self) -> Result<(), Interrupt> {
        self.tracker.begin(ActionKind::History, None)?;
        let text = render_history(
            self.tracker.state().history(),
            self.tracker.previous_pending(),
        );
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

fn extra<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

fn selected_extra(selection: &Selection) -> Map<String, Value> {
    extra([("selected", json!(selection.to_dotted()))])
}
