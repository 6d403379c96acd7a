// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::model::{Catalog, Selection};

/// Maximum number of entries kept in the action history.
pub const HISTORY_CAPACITY: usize = 10;

/// What an action-history entry or a pending-action marker refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Init,
    Update,
    CheckGitStatus,
    GetGraphs,
    List,
    ListInfo,
    Select,
    Add,
    Remove,
    ListData,
    Plot,
    Commit,
    Push,
    History,
    #[serde(other)]
    Other,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Update => "update",
            Self::CheckGitStatus => "check-git-status",
            Self::GetGraphs => "get-graphs",
            Self::List => "list",
            Self::ListInfo => "list-info",
            Self::Select => "select",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::ListData => "list-data",
            Self::Plot => "plot",
            Self::Commit => "commit",
            Self::Push => "push",
            Self::History => "history",
            Self::Other => "other",
        }
    }

    /// The kind written as `name`, or [`ActionKind::Other`] for names this build does not know.
    pub fn from_name(name: &str) -> Self {
        const KNOWN: [ActionKind; 14] = [
            ActionKind::Init,
            ActionKind::Update,
            ActionKind::CheckGitStatus,
            ActionKind::GetGraphs,
            ActionKind::List,
            ActionKind::ListInfo,
            ActionKind::Select,
            ActionKind::Add,
            ActionKind::Remove,
            ActionKind::ListData,
            ActionKind::Plot,
            ActionKind::Commit,
            ActionKind::Push,
            ActionKind::History,
        ];
        KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One action-history entry. An unknown `type` is kept verbatim and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawActionRecord", into = "RawActionRecord")]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub success: bool,
    pub extra: Map<String, Value>,
    pub timestamp: f64,
    unknown_kind: Option<String>,
}

impl ActionRecord {
    pub fn new(kind: ActionKind, success: bool, extra: Map<String, Value>, timestamp: f64) -> Self {
        Self {
            kind,
            success,
            extra,
            timestamp,
            unknown_kind: None,
        }
    }

    /// The `type` as stored, including names this build does not know.
    pub fn kind_name(&self) -> &str {
        self.unknown_kind
            .as_deref()
            .unwrap_or_else(|| self.kind.as_str())
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct RawActionRecord {
    #[serde(rename = "type")]
    kind: String,
    success: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
    timestamp: f64,
}

impl From<RawActionRecord> for ActionRecord {
    fn from(raw: RawActionRecord) -> Self {
        let kind = ActionKind::from_name(&raw.kind);
        Self {
            kind,
            success: raw.success,
            extra: raw.extra,
            timestamp: raw.timestamp,
            unknown_kind: (kind == ActionKind::Other).then_some(raw.kind),
        }
    }
}

impl From<ActionRecord> for RawActionRecord {
    fn from(record: ActionRecord) -> Self {
        let kind = match record.unknown_kind {
            Some(name) => name,
            None => record.kind.as_str().to_owned(),
        };
        Self {
            kind,
            success: record.success,
            extra: record.extra,
            timestamp: record.timestamp,
        }
    }
}

/// Crash witness: set before a step runs, cleared once the whole invocation finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<Value>,
    #[serde(default)]
    pub cmd: String,
    pub timestamp: f64,
}

/// Persistent per-installation state, read at the start of every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    selected: StoredSelection,
    #[serde(default)]
    action_history: Vec<ActionRecord>,
    #[serde(default, deserialize_with = "deserialize_epoch_seconds")]
    last_update: i64,
    #[serde(default)]
    datapath: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crash_on: Option<PendingAction>,
}

impl SessionState {
    /// State for a first run: nothing selected, never synced, one `init` entry.
    pub fn new(datapath: impl Into<PathBuf>, now: DateTime<Utc>) -> Self {
        Self {
            selected: StoredSelection::default(),
            action_history: vec![ActionRecord::new(
                ActionKind::Init,
                true,
                Map::new(),
                epoch_seconds_f64(now),
            )],
            last_update: 0,
            datapath: datapath.into(),
            crash_on: None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selected.resolved.as_ref()
    }

    /// The persisted `TOKEN.GRAPH.CHAIN` text, empty when nothing is selected.
    pub fn selected_dotted(&self) -> &str {
        &self.selected.dotted
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selected = StoredSelection {
            dotted: selection.as_ref().map(Selection::to_dotted).unwrap_or_default(),
            resolved: selection,
        };
    }

    /// Matches the persisted text against `catalog`, which is needed when a name contains `.`.
    ///
    /// The persisted text itself never changes here.
    pub fn reconcile_selection(&mut self, catalog: &Catalog) {
        let stored = &mut self.selected;
        if stored.dotted.is_empty() {
            return;
        }
        if stored
            .resolved
            .as_ref()
            .is_some_and(|selection| catalog.contains(selection))
        {
            return;
        }
        if let Some(found) = catalog.find_dotted(&stored.dotted) {
            stored.resolved = Some(found);
        }
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.action_history
    }

    /// Pushes an entry to the front, dropping the oldest beyond [`HISTORY_CAPACITY`].
    pub fn push_history(
        &mut self,
        kind: ActionKind,
        success: bool,
        extra: Map<String, Value>,
        now: DateTime<Utc>,
    ) {
        self.action_history.insert(
            0,
            ActionRecord::new(kind, success, extra, epoch_seconds_f64(now)),
        );
        self.action_history.truncate(HISTORY_CAPACITY);
    }

    pub fn last_update(&self) -> i64 {
        self.last_update
    }

    pub fn set_last_update(&mut self, epoch_seconds: i64) {
        self.last_update = epoch_seconds;
    }

    pub fn datapath(&self) -> &Path {
        &self.datapath
    }

    pub fn set_datapath(&mut self, datapath: impl Into<PathBuf>) {
        self.datapath = datapath.into();
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.crash_on.as_ref()
    }

    pub fn set_pending(
        &mut self,
        action: ActionKind,
        param: Option<Value>,
        cmd: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.crash_on = Some(PendingAction {
            action,
            param,
            cmd: cmd.into(),
            timestamp: epoch_seconds_f64(now),
        });
    }

    pub fn clear_pending(&mut self) -> bool {
        self.crash_on.take().is_some()
    }
}

pub(crate) fn epoch_seconds_f64(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

/// The `selected` field: the dotted text as stored, plus the triple it names when known.
#[derive(Debug, Clone, Default, PartialEq)]
struct StoredSelection {
    dotted: String,
    resolved: Option<Selection>,
}

impl Serialize for StoredSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.dotted)
    }
}

impl<'de> Deserialize<'de> for StoredSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let resolved = Selection::parse_dotted(&dotted);
        Ok(Self { dotted, resolved })
    }
}

// Older state files stored `last_update` as fractional seconds.
fn deserialize_epoch_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if !value.is_finite() {
        return Err(serde::de::Error::custom("last_update must be a finite number"));
    }
    Ok(value.trunc() as i64)
}
