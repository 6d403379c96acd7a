// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A catalog holds tokens, each token holds graphs, each graph holds named chains of datapoints.

pub mod catalog;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod names;
pub mod point;

pub use catalog::{Catalog, Chain, Graph, Selection, TokenData};
pub use names::{ChainName, GraphName, Name, NameError, TokenName};
pub use point::{
    format_epoch, is_timestamp_literal, normalize_value, normalize_value_at, parse_literal,
    DataPoint, PointValue, EPOCH_HEURISTIC_THRESHOLD, TIME_FORMAT,
};
