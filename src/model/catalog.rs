// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use super::names::{ChainName, GraphName, TokenName};
use super::point::DataPoint;

/// Ordered datapoints of one chain. Order is insertion order, not x order.
pub type Chain = Vec<DataPoint>;

/// Chains of one graph, keyed by chain name, in file order.
pub type Graph = IndexMap<ChainName, Chain>;

/// The contents of one dataset file: every graph of a token, in file order.
pub type TokenData = IndexMap<GraphName, Graph>;

/// Every dataset loaded from the data directory.
///
/// Catalog order (used for flat indices and listings) is tokens sorted by name, then graphs and
/// chains in the order their file lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tokens: BTreeMap<TokenName, TokenData>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &BTreeMap<TokenName, TokenData> {
        &self.tokens
    }

    pub fn insert_token(&mut self, token: TokenName, data: TokenData) {
        self.tokens.insert(token, data);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn chain(&self, selection: &Selection) -> Option<&Chain> {
        self.tokens
            .get(&selection.token)?
            .get(&selection.graph)?
            .get(&selection.chain)
    }

    pub fn contains(&self, selection: &Selection) -> bool {
        self.chain(selection).is_some()
    }

    /// Every `(token, graph, chain)` triple in flat-index order.
    pub fn triples(&self) -> impl Iterator<Item = Selection> + '_ {
        self.tokens.iter().flat_map(|(token, graphs)| {
            graphs.iter().flat_map(move |(graph, chains)| {
                chains
                    .keys()
                    .map(move |chain| Selection::new(token.clone(), graph.clone(), chain.clone()))
            })
        })
    }

    /// Finds the triple whose dotted form is exactly `dotted`.
    ///
    /// Unlike [`Selection::parse_dotted`] this also finds names that contain `.`.
    pub fn find_dotted(&self, dotted: &str) -> Option<Selection> {
        self.triples().find(|selection| selection.to_dotted() == dotted)
    }

    pub fn triple_count(&self) -> usize {
        self.tokens
            .values()
            .flat_map(|graphs| graphs.values())
            .map(|chains| chains.len())
            .sum()
    }
}

/// A resolved `(token, graph, chain)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selection {
    pub token: TokenName,
    pub graph: GraphName,
    pub chain: ChainName,
}

impl Selection {
    pub fn new(token: TokenName, graph: GraphName, chain: ChainName) -> Self {
        Self {
            token,
            graph,
            chain,
        }
    }

    /// Parses the persisted `TOKEN.GRAPH.CHAIN` form. Returns `None` for anything else,
    /// including the empty string. Names containing `.` need [`Catalog::find_dotted`].
    pub fn parse_dotted(dotted: &str) -> Option<Self> {
        let mut parts = dotted.split('.');
        let token = TokenName::new(parts.next()?).ok()?;
        let graph = GraphName::new(parts.next()?).ok()?;
        let chain = ChainName::new(parts.next()?).ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(token, graph, chain))
    }

    pub fn to_dotted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.token, self.graph, self.chain)
    }
}
