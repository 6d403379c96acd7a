// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::model::{Catalog, Name, Selection};
use crate::session::SessionState;

/// Chain picked when a graph has several chains and none was named.
pub const DEFAULT_CHAIN: &str = "global";

const MAX_PATH_SEGMENTS: usize = 3;

/// A parsed `--select` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionQuery {
    Index(i64),
    Path(Vec<String>),
}

impl SelectionQuery {
    /// The raw segments as the operator typed them, for history entries.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::Index(index) => vec![index.to_string()],
            Self::Path(segments) => segments.clone(),
        }
    }
}

impl fmt::Display for SelectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Path(segments) => f.write_str(&segments.join(".")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected TOKEN[.GRAPH[.CHAIN]] or an index, got {segments} segments")]
pub struct QueryParseError {
    pub segments: usize,
}

impl FromStr for SelectionQuery {
    type Err = QueryParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let segments = raw.split('.').map(str::to_owned).collect::<Vec<_>>();
        if segments.len() > MAX_PATH_SEGMENTS {
            return Err(QueryParseError {
                segments: segments.len(),
            });
        }
        if let [single] = segments.as_slice() {
            if let Ok(index) = single.trim().parse::<i64>() {
                return Ok(Self::Index(index));
            }
        }
        Ok(Self::Path(segments))
    }
}

/// Selects the `index`-th triple in flat catalog order.
pub fn resolve_by_index(catalog: &Catalog, index: i64) -> CoreResult<Selection> {
    let not_found = || {
        CoreError::not_found(format!(
            "no graph with index {index} ({} available)",
            catalog.triple_count()
        ))
    };
    let index = usize::try_from(index).map_err(|_| not_found())?;
    catalog.triples().nth(index).ok_or_else(not_found)
}

/// Resolves 1 to 3 dotted segments, matching names case-insensitively.
///
/// An omitted graph defaults to the token's only graph. An omitted chain defaults to the
/// graph's only chain, then to [`DEFAULT_CHAIN`]. A named segment that matches nothing fails
/// the whole resolution.
pub fn resolve_by_path<S: AsRef<str>>(catalog: &Catalog, segments: &[S]) -> CoreResult<Selection> {
    let Some((token_segment, rest)) = segments.split_first() else {
        return Err(CoreError::not_found("empty selection"));
    };
    if segments.len() > MAX_PATH_SEGMENTS {
        return Err(CoreError::not_found(format!(
            "selection has {} segments, at most {MAX_PATH_SEGMENTS} are allowed",
            segments.len()
        )));
    }
    let token_segment = token_segment.as_ref();

    let (token, graphs) = find_ignore_case(catalog.tokens(), token_segment)
        .ok_or_else(|| CoreError::not_found(format!("data for token {token_segment:?}")))?;

    let (graph, chains) = match rest.first().map(AsRef::as_ref) {
        Some(graph_segment) => find_ignore_case(graphs, graph_segment).ok_or_else(|| {
            CoreError::not_found(format!("token {token} has no graph {graph_segment:?}"))
        })?,
        None => match graphs.len() {
            0 => return Err(CoreError::not_found(format!("token {token} has no graphs"))),
            1 => graphs.iter().next().ok_or_else(|| {
                CoreError::not_found(format!("token {token} has no graphs"))
            })?,
            _ => {
                return Err(CoreError::ambiguous(
                    format!("select a graph of {token} with {token}.GRAPH"),
                    names(graphs),
                ))
            }
        },
    };

    let chain = match rest.get(1).map(AsRef::as_ref) {
        Some(chain_segment) => find_ignore_case(chains, chain_segment)
            .map(|(chain, _)| chain)
            .ok_or_else(|| {
                CoreError::not_found(format!(
                    "graph {token}.{graph} has no chain {chain_segment:?}"
                ))
            })?,
        None => {
            let default = if chains.len() == 1 {
                chains.keys().next()
            } else {
                chains.keys().find(|chain| chain.as_str() == DEFAULT_CHAIN)
            };
            default.ok_or_else(|| {
                if chains.is_empty() {
                    CoreError::not_found(format!("graph {token}.{graph} has no chains"))
                } else {
                    CoreError::ambiguous(
                        format!("select a chain of {token}.{graph} with {token}.{graph}.CHAIN"),
                        names(chains),
                    )
                }
            })?
        }
    };

    Ok(Selection::new(token.clone(), graph.clone(), chain.clone()))
}

pub fn resolve(catalog: &Catalog, query: &SelectionQuery) -> CoreResult<Selection> {
    match query {
        SelectionQuery::Index(index) => resolve_by_index(catalog, *index),
        SelectionQuery::Path(segments) => resolve_by_path(catalog, segments),
    }
}

/// Resolves `query` and stores the outcome as the session selection.
///
/// A failed resolution clears the selection; it is never partially applied.
pub fn select(
    catalog: &Catalog,
    query: &SelectionQuery,
    state: &mut SessionState,
) -> CoreResult<Selection> {
    let result = resolve(catalog, query);
    state.set_selection(result.as_ref().ok().cloned());
    result
}

fn find_ignore_case<'a, T: 'a, V: 'a>(
    entries: impl IntoIterator<Item = (&'a Name<T>, &'a V)>,
    segment: &str,
) -> Option<(&'a Name<T>, &'a V)> {
    entries
        .into_iter()
        .find(|(name, _)| name.matches_ignore_case(segment))
}

fn names<'a, T: 'a, V: 'a>(
    entries: impl IntoIterator<Item = (&'a Name<T>, &'a V)>,
) -> Vec<String> {
    entries
        .into_iter()
        .map(|(name, _)| name.as_str().to_owned())
        .collect()
}
