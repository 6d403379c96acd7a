// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::session::SessionState;

use super::atomic::{write_atomic, WriteDurability};
use super::StoreError;

/// The session state file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when the file does not exist yet.
    pub fn load(&self) -> Result<Option<SessionState>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Loads the state (or a fresh one), points it at `datapath` and writes it back.
    pub fn load_or_init(
        &self,
        datapath: &Path,
        now: DateTime<Utc>,
    ) -> Result<SessionState, StoreError> {
        let mut state = match self.load()? {
            Some(state) => state,
            None => {
                tracing::info!(path = %self.path.display(), "creating session state");
                SessionState::new(datapath, now)
            }
        };
        state.set_datapath(datapath);
        self.save(&state)?;
        Ok(state)
    }

    pub fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(state).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, text.as_bytes(), self.durability)
    }
}
