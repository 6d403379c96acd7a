// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! plsdata: a local store of time-series graphs with a terminal front end.
//!
//! Graph data lives in `plsData/<TOKEN>.json` files inside a git working copy. The crate resolves
//! operator selections, normalizes and mutates datapoints, renders tables and text plots, and
//! tracks the state of each invocation in a JSON state file.

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod session;
pub mod store;
pub mod sync;
