// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::Path;

use plsdata::app::{run, Invocation, RunOutcome};
use plsdata::config::Settings;
use plsdata::error::{CoreResult, ErrorKind};
use plsdata::model::{DataPoint, Selection};
use plsdata::ops::SwapDecision;
use plsdata::session::{ActionKind, SessionState};
use plsdata::sync::{SyncBackend, UpdateMode};

#[derive(Debug, Default)]
struct ScriptedSync {
    dirty_outside: bool,
    uncommitted: bool,
    unpushed: bool,
    pulls: usize,
}

impl SyncBackend for ScriptedSync {
    fn check_clean(&mut self, _dir: &Path) -> CoreResult<bool> {
        Ok(!self.dirty_outside)
    }

    fn has_local_changes(&mut self, _dir: &Path) -> CoreResult<bool> {
        Ok(self.uncommitted)
    }

    fn fetch(&mut self, _dir: &Path, _force: bool) -> CoreResult<bool> {
        self.pulls += 1;
        Ok(false)
    }

    fn commit(&mut self, _dir: &Path) -> CoreResult<bool> {
        let committed = std::mem::take(&mut self.uncommitted);
        self.unpushed |= committed;
        Ok(committed)
    }

    fn push_commits(&mut self, _dir: &Path) -> CoreResult<bool> {
        Ok(std::mem::take(&mut self.unpushed))
    }
}

struct Workspace {
    _tmp: tempfile::TempDir,
    settings: Settings,
    sync: ScriptedSync,
}

impl Workspace {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let data = tmp.path().join("plsData");
        fs::create_dir(&data).expect("data dir");
        fs::write(data.join("ADA.json"), r#"{"Price": {"global": []}}"#).expect("seed");
        let settings = Settings::new(tmp.path());
        Self {
            _tmp: tmp,
            settings,
            sync: ScriptedSync::default(),
        }
    }

    fn run(&mut self, invocation: Invocation) -> (RunOutcome, String) {
        let mut out = Vec::new();
        let mut keep = |_: &DataPoint| SwapDecision::Keep;
        let outcome = run(
            &self.settings,
            &invocation,
            &mut self.sync,
            &mut keep,
            &mut out,
        )
        .expect("store stays readable");
        (outcome, String::from_utf8(out).expect("utf8"))
    }

    fn state(&self) -> SessionState {
        self.settings
            .state_file()
            .load()
            .expect("load")
            .expect("state file written")
    }

    fn points(&self) -> usize {
        let catalog = self.settings.data_dir().load_catalog().expect("catalog");
        let selection = Selection::parse_dotted("ADA.Price.global").expect("selection");
        catalog.chain(&selection).map_or(0, |chain| chain.len())
    }
}

fn offline() -> Invocation {
    Invocation {
        update: UpdateMode::Disable,
        command_line: "plsdata".to_owned(),
        ..Invocation::default()
    }
}

fn add(x: &str, y: &str) -> Invocation {
    Invocation {
        add: Some((x.to_owned(), y.to_owned())),
        ..offline()
    }
}

#[test]
fn edit_plot_and_publish_a_chain() {
    let mut ws = Workspace::new();

    let (outcome, out) = ws.run(Invocation {
        select: Some("ADA".parse().expect("query")),
        ..offline()
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(out.contains("Selected: ADA > Price > global"));

    for (x, y) in [("1", "2"), ("2", "4"), ("3", "3")] {
        let (outcome, _) = ws.run(add(x, y));
        assert_eq!(outcome, RunOutcome::Completed);
    }
    assert_eq!(ws.points(), 3);

    let (outcome, out) = ws.run(Invocation {
        data: true,
        plot: true,
        ..offline()
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(out.contains("Data for ADA.Price.global"));
    assert!(out.contains("total delta:"));
    assert!(out.contains("ADA Price on global"));

    let (outcome, out) = ws.run(Invocation {
        remove: Some(-1),
        ..offline()
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(out.starts_with("Removed [2]: 3, 3"));
    assert_eq!(ws.points(), 2);

    ws.sync.uncommitted = true;
    let (outcome, out) = ws.run(Invocation {
        push: true,
        ..offline()
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(out.contains("Pushed graph changes."));

    let state = ws.state();
    assert!(state.pending().is_none());
    let kinds = state
        .history()
        .iter()
        .take(3)
        .map(|record| record.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![ActionKind::Push, ActionKind::Remove, ActionKind::Plot]
    );
}

#[test]
fn dirty_repository_refuses_changes_but_still_lists() {
    let mut ws = Workspace::new();
    ws.run(Invocation {
        select: Some("0".parse().expect("query")),
        ..offline()
    });
    ws.sync.dirty_outside = true;

    let (outcome, out) = ws.run(add("1", "1"));
    assert!(matches!(outcome, RunOutcome::Failed(ref err) if err.kind() == ErrorKind::DirtyStore));
    assert!(out.contains("You have unsaved changes in your local repository"));
    assert_eq!(ws.points(), 0);

    let (outcome, out) = ws.run(Invocation {
        list: true,
        ..offline()
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(out.contains("ADA"));
}

#[test]
fn forced_update_always_pulls() {
    let mut ws = Workspace::new();
    let (outcome, out) = ws.run(Invocation {
        update: UpdateMode::Force,
        ..offline()
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(ws.sync.pulls, 1);
    assert!(!out.contains("Failed to update graphs"));
    assert_eq!(ws.state().history()[0].kind, ActionKind::Update);
}
