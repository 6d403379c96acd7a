// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the catalog.
//!
//! Selection resolution turns an operator identifier (a flat index or a dotted
//! `TOKEN[.GRAPH[.CHAIN]]` path) into an exact `(token, graph, chain)` triple.

pub mod selection;
#[cfg(test)]
mod tests;

pub use selection::{
    resolve, resolve_by_index, resolve_by_path, select, QueryParseError, SelectionQuery,
    DEFAULT_CHAIN,
};
