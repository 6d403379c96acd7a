// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::Utc;
use proptest::prelude::*;
use rstest::rstest;

use super::{resolve, resolve_by_index, resolve_by_path, select, SelectionQuery};
use crate::error::CoreError;
use crate::model::fixtures::{sample_catalog, token, token_data};
use crate::model::{Catalog, ChainName, Graph, GraphName, Selection, TokenData, TokenName};
use crate::session::SessionState;

fn dotted(result: Result<Selection, CoreError>) -> String {
    result.expect("resolved").to_dotted()
}

#[rstest]
#[case(0, "ADA.Price.global")]
#[case(1, "BTC.Price.eth")]
#[case(2, "BTC.Price.global")]
#[case(4, "BTC.Volume.sol")]
fn index_walks_tokens_then_graphs_then_chains(#[case] index: i64, #[case] expected: &str) {
    assert_eq!(dotted(resolve_by_index(&sample_catalog(), index)), expected);
}

#[rstest]
#[case(5)]
#[case(-1)]
#[case(i64::MAX)]
fn index_outside_catalog_is_not_found(#[case] index: i64) {
    assert!(matches!(
        resolve_by_index(&sample_catalog(), index),
        Err(CoreError::NotFound { .. })
    ));
}

#[rstest]
#[case(&["ada"], "ADA.Price.global")]
#[case(&["ADA", "price"], "ADA.Price.global")]
#[case(&["btc", "PRICE"], "BTC.Price.global")]
#[case(&["btc", "price", "ETH"], "BTC.Price.eth")]
#[case(&["BTC", "Volume", "sol"], "BTC.Volume.sol")]
fn path_matches_case_insensitively_and_applies_defaults(
    #[case] segments: &[&str],
    #[case] expected: &str,
) {
    assert_eq!(dotted(resolve_by_path(&sample_catalog(), segments)), expected);
}

#[test]
fn omitted_graph_with_several_candidates_is_ambiguous() {
    match resolve_by_path(&sample_catalog(), &["BTC"]) {
        Err(CoreError::Ambiguous { candidates, .. }) => {
            assert_eq!(candidates, vec!["Price", "Volume"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn omitted_chain_without_global_is_ambiguous() {
    match resolve_by_path(&sample_catalog(), &["BTC", "Volume"]) {
        Err(CoreError::Ambiguous { candidates, .. }) => {
            assert_eq!(candidates, vec!["eth", "sol"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[rstest]
#[case(&["DOGE"])]
#[case(&["ADA", "Volume"])]
#[case(&["ADA", "Price", "eth"])]
#[case(&["ADA", ""])]
fn unknown_explicit_segment_fails_the_whole_path(#[case] segments: &[&str]) {
    assert!(matches!(
        resolve_by_path(&sample_catalog(), segments),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn unknown_graph_fails_even_when_chain_default_would_apply() {
    let mut catalog = Catalog::new();
    catalog.insert_token(
        token("ETH"),
        token_data(r#"{"Price": {"global": []}, "Fees": {"global": []}}"#),
    );
    assert!(matches!(
        resolve_by_path(&catalog, &["ETH", "Volume"]),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn single_chain_is_picked_before_global() {
    let mut catalog = Catalog::new();
    catalog.insert_token(token("SOL"), token_data(r#"{"Price": {"binance": [[1, 2]]}}"#));
    assert_eq!(dotted(resolve_by_path(&catalog, &["sol"])), "SOL.Price.binance");
}

#[test]
fn empty_token_and_graph_are_not_found() {
    let mut catalog = Catalog::new();
    catalog.insert_token(token("NIL"), TokenData::new());
    catalog.insert_token(token("HOLLOW"), token_data(r#"{"Price": {}}"#));
    assert!(matches!(
        resolve_by_path(&catalog, &["NIL"]),
        Err(CoreError::NotFound { .. })
    ));
    assert!(matches!(
        resolve_by_path(&catalog, &["HOLLOW"]),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn too_many_segments_are_rejected() {
    assert!(resolve_by_path(&sample_catalog(), &["a", "b", "c", "d"]).is_err());
    assert!("a.b.c.d".parse::<SelectionQuery>().is_err());
}

#[rstest]
#[case("3", SelectionQuery::Index(3))]
#[case("-2", SelectionQuery::Index(-2))]
#[case("ADA", SelectionQuery::Path(vec!["ADA".to_owned()]))]
#[case("1.5", SelectionQuery::Path(vec!["1".to_owned(), "5".to_owned()]))]
#[case("ADA.Price.global", SelectionQuery::Path(vec!["ADA".to_owned(), "Price".to_owned(), "global".to_owned()]))]
fn parses_select_argument(#[case] raw: &str, #[case] expected: SelectionQuery) {
    assert_eq!(raw.parse::<SelectionQuery>().expect("parse"), expected);
}

#[test]
fn select_records_success_and_clears_on_failure() {
    let catalog = sample_catalog();
    let mut state = SessionState::new("/data", Utc::now());

    let query = "ada".parse::<SelectionQuery>().expect("parse");
    select(&catalog, &query, &mut state).expect("select");
    assert_eq!(
        state.selection().map(Selection::to_dotted).as_deref(),
        Some("ADA.Price.global")
    );

    let query = "btc".parse::<SelectionQuery>().expect("parse");
    select(&catalog, &query, &mut state).unwrap_err();
    assert_eq!(state.selection(), None);

    let query = SelectionQuery::Index(2);
    select(&catalog, &query, &mut state).expect("select");
    assert_eq!(
        state.selection().map(Selection::to_dotted).as_deref(),
        Some("BTC.Price.global")
    );
}

#[test]
fn single_graph_with_global_chain_defaults_to_it() {
    let mut catalog = Catalog::new();
    catalog.insert_token(
        token("TOKEN"),
        token_data(r#"{"Only": {"alpha": [], "global": [], "zeta": []}}"#),
    );
    let query = SelectionQuery::Path(vec!["TOKEN".to_owned()]);
    assert_eq!(dotted(resolve(&catalog, &query)), "TOKEN.Only.global");
}

#[test]
fn index_follows_file_order_and_reaches_dotted_names() {
    let mut catalog = Catalog::new();
    catalog.insert_token(
        token("ADA"),
        token_data(r#"{"Volume": {"global": []}, "Price v1.5": {"global": [[1, 2]]}}"#),
    );
    assert_eq!(dotted(resolve_by_index(&catalog, 0)), "ADA.Volume.global");

    let by_index = resolve_by_index(&catalog, 1).expect("index");
    assert_eq!(by_index.graph.as_str(), "Price v1.5");
    assert_eq!(catalog.find_dotted(&by_index.to_dotted()), Some(by_index));
    assert!(matches!(
        resolve_by_path(&catalog, &["ADA", "Price v1", "5"]),
        Err(CoreError::NotFound { .. })
    ));
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,5}"
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    let chains = prop::collection::btree_set(name_strategy(), 1..4);
    let graphs = prop::collection::btree_map(name_strategy(), chains, 1..4);
    prop::collection::btree_map(name_strategy(), graphs, 1..4).prop_map(|tokens| {
        let mut catalog = Catalog::new();
        for (token_name, graphs) in tokens {
            let mut data = TokenData::new();
            for (graph_name, chains) in graphs {
                let mut graph = Graph::new();
                for chain_name in chains {
                    graph.insert(ChainName::new(chain_name).expect("chain"), Vec::new());
                }
                data.insert(GraphName::new(graph_name).expect("graph"), graph);
            }
            catalog.insert_token(TokenName::new(token_name).expect("token"), data);
        }
        catalog
    })
}

proptest! {
    #[test]
    fn index_and_dotted_path_round_trip(catalog in catalog_strategy(), seed in any::<prop::sample::Index>()) {
        let total = catalog.triple_count();
        let index = seed.index(total);
        let by_index = resolve_by_index(&catalog, index as i64).expect("index in range");
        let dotted = by_index.to_dotted();
        let segments = dotted.split('.').collect::<Vec<_>>();
        let by_path = resolve_by_path(&catalog, &segments).expect("path resolves");
        prop_assert_eq!(by_index, by_path);
    }

    #[test]
    fn every_flat_index_is_distinct(catalog in catalog_strategy()) {
        let all = (0..catalog.triple_count())
            .map(|i| resolve_by_index(&catalog, i as i64).expect("in range"))
            .collect::<Vec<_>>();
        let unique = all.iter().cloned().map(|s| (s, ())).collect::<BTreeMap<_, _>>();
        prop_assert_eq!(unique.len(), all.len());
    }
}
