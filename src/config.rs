// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime settings shared by every step of an invocation.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::render::PlotOptions;
use crate::store::{DataDir, StateFile, WriteDurability};

pub const DATA_DIR_NAME: &str = "plsData";
pub const STATE_FILE_NAME: &str = "pUD_status.json";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    root: PathBuf,
    refresh_interval_secs: u64,
    durability: WriteDurability,
    plot: PlotOptions,
}

impl Settings {
    /// Settings rooted at `root`, which holds the state file and the data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = fs::canonicalize(&root).unwrap_or(root);
        Self {
            root,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            durability: WriteDurability::default(),
            plot: PlotOptions::default(),
        }
    }

    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_plot(mut self, plot: PlotOptions) -> Self {
        self.plot = plot;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_DIR_NAME)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE_NAME)
    }

    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn plot(&self) -> PlotOptions {
        self.plot
    }

    pub fn data_dir(&self) -> DataDir {
        DataDir::new(self.data_path()).with_durability(self.durability)
    }

    pub fn state_file(&self) -> StateFile {
        StateFile::new(self.state_path()).with_durability(self.durability)
    }
}

/// The directory holding the executable, falling back to the current directory.
pub fn default_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
