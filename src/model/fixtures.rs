// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::catalog::{Catalog, TokenData};
use super::names::TokenName;

pub(crate) const ADA_JSON: &str = r#"{
  "Price": {
    "global": [
      ["2024-01-01 00:00:00", 10],
      ["2024-02-01 00:00:00", 12]
    ]
  }
}"#;

pub(crate) const BTC_JSON: &str = r#"{
  "Price": {
    "eth": [[1, 1]],
    "global": [[1, 2], [2, 4], [3, 8]]
  },
  "Volume": {
    "eth": [[0.5, "oops"], [1.5, 3]],
    "sol": []
  }
}"#;

pub(crate) fn token(name: &str) -> TokenName {
    TokenName::new(name).expect("token name")
}

pub(crate) fn token_data(json: &str) -> TokenData {
    serde_json::from_str(json).expect("token data")
}

/// `ADA` has one graph with one `global` chain; `BTC` has two graphs with two chains each.
pub(crate) fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert_token(token("ADA"), token_data(ADA_JSON));
    catalog.insert_token(token("BTC"), token_data(BTC_JSON));
    catalog
}
