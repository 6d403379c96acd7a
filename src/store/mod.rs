// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence on disk.
//!
//! The store module reads/writes the per-token dataset files and the session state file. Every
//! write goes through a temp-file + rename so files are never left half-written.

use std::io;
use std::path::PathBuf;

mod atomic;
pub mod data_dir;
pub mod state_file;

pub use atomic::WriteDurability;
pub use data_dir::DataDir;
pub use state_file::StateFile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}
