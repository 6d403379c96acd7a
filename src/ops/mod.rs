// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations on datapoint chains.
//!
//! Ops are applied to a freshly read copy of the token's dataset file, and the whole file is
//! written back only when the op succeeded. Any catalog loaded before the mutation is stale
//! afterwards.

mod prompt;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::model::{parse_literal, Chain, DataPoint, Selection, TokenData};
use crate::store::{DataDir, StoreError};

pub use prompt::TerminalPrompt;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Append { point: DataPoint },
    /// Inserts before an existing position; the tail is reached with `Append`.
    InsertAt { point: DataPoint, index: i64 },
    /// Negative indices count from the end.
    RemoveAt { index: i64 },
}

/// What an applied op did, with indices resolved to non-negative positions.
#[derive(Debug, Clone, PartialEq)]
pub enum OpOutcome {
    Added { index: usize, point: DataPoint },
    Removed { index: usize, point: DataPoint },
}

impl OpOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Added { index, .. } | Self::Removed { index, .. } => *index,
        }
    }

    pub fn point(&self) -> &DataPoint {
        match self {
            Self::Added { point, .. } | Self::Removed { point, .. } => point,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn append(chain: &mut Chain, point: DataPoint) -> usize {
    chain.push(point);
    chain.len() - 1
}

pub fn insert_at(chain: &mut Chain, point: DataPoint, index: i64) -> CoreResult<usize> {
    let len = chain.len();
    let position = usize::try_from(index)
        .ok()
        .filter(|position| *position < len)
        .ok_or(CoreError::OutOfRange { index, len })?;
    chain.insert(position, point);
    Ok(position)
}

pub fn remove_at(chain: &mut Chain, index: i64) -> CoreResult<(usize, DataPoint)> {
    let position = resolve_index(index, chain.len())?;
    Ok((position, chain.remove(position)))
}

/// Maps a possibly negative index onto `0..len`, counting negatives from the end.
pub fn resolve_index(index: i64, len: usize) -> CoreResult<usize> {
    let out_of_range = CoreError::OutOfRange { index, len };
    let signed_len = i64::try_from(len).map_err(|_| out_of_range.clone())?;
    let position = if index < 0 { signed_len + index } else { index };
    if !(0..signed_len).contains(&position) {
        return Err(out_of_range);
    }
    usize::try_from(position).map_err(|_| out_of_range)
}

pub fn apply_op(chain: &mut Chain, op: Op) -> CoreResult<OpOutcome> {
    match op {
        Op::Append { point } => {
            let index = append(chain, point.clone());
            Ok(OpOutcome::Added { index, point })
        }
        Op::InsertAt { point, index } => {
            let index = insert_at(chain, point.clone(), index)?;
            Ok(OpOutcome::Added { index, point })
        }
        Op::RemoveAt { index } => {
            let (index, point) = remove_at(chain, index)?;
            Ok(OpOutcome::Removed { index, point })
        }
    }
}

/// Reads the selected token's file, applies `op` to the selected chain and writes the file back.
///
/// Nothing is written when the op fails.
pub fn apply_to_store(
    dir: &DataDir,
    selection: &Selection,
    op: Op,
) -> Result<OpOutcome, MutationError> {
    let mut data = dir.load_token(&selection.token)?;
    let outcome = apply_op(chain_mut(&mut data, selection)?, op)?;
    dir.save_token(&selection.token, &data)?;
    tracing::info!(selection = %selection, ?outcome, "dataset updated");
    Ok(outcome)
}

fn chain_mut<'a>(data: &'a mut TokenData, selection: &Selection) -> CoreResult<&'a mut Chain> {
    data.get_mut(&selection.graph)
        .and_then(|graph| graph.get_mut(&selection.chain))
        .ok_or_else(|| CoreError::not_found(format!("{selection} in its dataset file")))
}

/// Operator answer when Y looks like a time value while X does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDecision {
    Keep,
    Swap,
    Abort,
}

pub trait SwapDecider {
    fn confirm_swap(&mut self, point: &DataPoint) -> SwapDecision;
}

impl<F> SwapDecider for F
where
    F: FnMut(&DataPoint) -> SwapDecision,
{
    fn confirm_swap(&mut self, point: &DataPoint) -> SwapDecision {
        self(point)
    }
}

/// Parses both raw coordinates and applies the axis-swap check.
///
/// Fails without side effects when either coordinate is unparseable.
pub fn prepare_point(
    x_raw: &str,
    y_raw: &str,
    now: DateTime<Utc>,
    decider: &mut dyn SwapDecider,
) -> CoreResult<DataPoint> {
    let point = DataPoint::new(parse_literal(x_raw, now)?, parse_literal(y_raw, now)?);
    if !point.y.is_timestamp() || point.x.is_timestamp() {
        return Ok(point);
    }

    match decider.confirm_swap(&point) {
        SwapDecision::Keep => Ok(point),
        SwapDecision::Swap => Ok(point.swapped()),
        SwapDecision::Abort => Err(CoreError::Aborted),
    }
}

/// The add operation: parse, disambiguate, then append or insert before `to`.
pub fn add_point(
    dir: &DataDir,
    selection: &Selection,
    x_raw: &str,
    y_raw: &str,
    to: Option<i64>,
    decider: &mut dyn SwapDecider,
) -> Result<OpOutcome, MutationError> {
    let point = prepare_point(x_raw, y_raw, Utc::now(), decider)?;
    let op = match to {
        Some(index) => Op::InsertAt { point, index },
        None => Op::Append { point },
    };
    apply_to_store(dir, selection, op)
}

pub fn remove_point(
    dir: &DataDir,
    selection: &Selection,
    index: i64,
) -> Result<OpOutcome, MutationError> {
    apply_to_store(dir, selection, Op::RemoveAt { index })
}
