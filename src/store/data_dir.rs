// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Catalog, TokenData, TokenName};

use super::atomic::{write_atomic, WriteDurability};
use super::StoreError;

const DATASET_EXTENSION: &str = "json";

/// The directory of per-token dataset files (`<TOKEN>.json`).
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    durability: WriteDurability,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn token_path(&self, token: &TokenName) -> PathBuf {
        self.root.join(format!("{token}.{DATASET_EXTENSION}"))
    }

    /// Lists the dataset files and loads every one of them.
    ///
    /// Files that do not look like `<TOKEN>.json` are skipped.
    pub fn load_catalog(&self) -> Result<Catalog, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut catalog = Catalog::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(token) = token_from_path(&path) else {
                tracing::debug!(path = %path.display(), "skipping non-dataset file");
                continue;
            };
            let data = self.load_token_file(&path)?;
            catalog.insert_token(token, data);
        }

        tracing::debug!(tokens = catalog.tokens().len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn load_token(&self, token: &TokenName) -> Result<TokenData, StoreError> {
        self.load_token_file(&self.token_path(token))
    }

    /// Rewrites a token's whole dataset file, pretty-printed with 2-space indentation.
    pub fn save_token(&self, token: &TokenName, data: &TokenData) -> Result<(), StoreError> {
        let path = self.token_path(token);
        let text = serde_json::to_string_pretty(data).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, text.as_bytes(), self.durability)
    }

    fn load_token_file(&self, path: &Path) -> Result<TokenData, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn token_from_path(path: &Path) -> Option<TokenName> {
    if path.extension()?.to_str()? != DATASET_EXTENSION {
        return None;
    }
    TokenName::path_segment(path.file_stem()?.to_str()?).ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::{fixture, rstest};

    use super::DataDir;
    use crate::model::fixtures::{token, ADA_JSON, BTC_JSON};
    use crate::store::StoreError;

    struct DataDirCtx {
        _tmp: tempfile::TempDir,
        dir: DataDir,
    }

    #[fixture]
    fn ctx() -> DataDirCtx {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::write(tmp.path().join("ADA.json"), ADA_JSON).expect("seed ADA");
        fs::write(tmp.path().join("BTC.json"), BTC_JSON).expect("seed BTC");
        let dir = DataDir::new(tmp.path());
        DataDirCtx { _tmp: tmp, dir }
    }

    #[rstest]
    fn loads_every_dataset_file(ctx: DataDirCtx) {
        let catalog = ctx.dir.load_catalog().expect("catalog");
        let tokens = catalog
            .tokens()
            .keys()
            .map(|t| t.as_str())
            .collect::<Vec<_>>();
        assert_eq!(tokens, vec!["ADA", "BTC"]);
        assert_eq!(catalog.triple_count(), 5);
    }

    #[rstest]
    fn skips_files_that_are_not_datasets(ctx: DataDirCtx) {
        let root = ctx.dir.root().to_path_buf();
        fs::write(root.join("README.md"), "# data").expect("seed readme");
        fs::write(root.join("ADA.backup.json"), "not json").expect("seed backup");
        fs::create_dir(root.join("nested.json")).expect("seed dir");

        let catalog = ctx.dir.load_catalog().expect("catalog");
        assert_eq!(catalog.tokens().len(), 2);
    }

    #[rstest]
    fn save_token_writes_pretty_json(ctx: DataDirCtx) {
        let ada = token("ADA");
        let mut data = ctx.dir.load_token(&ada).expect("load");
        data.clear();
        ctx.dir.save_token(&ada, &data).expect("save");
        assert_eq!(
            fs::read_to_string(ctx.dir.token_path(&ada)).expect("read"),
            "{}"
        );

        let data = crate::model::fixtures::token_data(ADA_JSON);
        ctx.dir.save_token(&ada, &data).expect("save");
        let text = fs::read_to_string(ctx.dir.token_path(&ada)).expect("read");
        assert!(text.starts_with("{\n  \"Price\": {\n    \"global\": [\n      [\n"));
        assert_eq!(ctx.dir.load_token(&ada).expect("reload"), data);
    }

    #[rstest]
    fn dotted_graph_and_chain_names_load(ctx: DataDirCtx) {
        let root = ctx.dir.root().to_path_buf();
        fs::write(
            root.join("DOT.json"),
            r#"{"Price v1.5": {"eth.usd": [[1, 2]]}}"#,
        )
        .expect("seed dotted names");

        let catalog = ctx.dir.load_catalog().expect("catalog");
        let found = catalog
            .find_dotted("DOT.Price v1.5.eth.usd")
            .expect("dotted triple");
        assert_eq!(found.chain.as_str(), "eth.usd");
        assert_eq!(catalog.triple_count(), 6);
    }

    #[rstest]
    fn save_keeps_the_file_key_order(ctx: DataDirCtx) {
        let eth = token("ETH");
        fs::write(
            ctx.dir.token_path(&eth),
            r#"{"Volume": {"sol": [], "eth": []}, "Price": {"global": [[1, 2]]}}"#,
        )
        .expect("seed unsorted");

        let data = ctx.dir.load_token(&eth).expect("load");
        ctx.dir.save_token(&eth, &data).expect("save");
        let text = fs::read_to_string(ctx.dir.token_path(&eth)).expect("read");
        let positions = ["\"Volume\"", "\"sol\"", "\"eth\"", "\"Price\""]
            .map(|key| text.find(key).expect("key present"));
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{text}");
    }

    #[rstest]
    fn broken_dataset_reports_its_path(ctx: DataDirCtx) {
        let path = ctx.dir.root().join("ETH.json");
        fs::write(&path, "{\"Price\": {\"global\": [[1]]}}").expect("seed");
        match ctx.dir.load_catalog() {
            Err(StoreError::Json { path: err_path, .. }) => assert_eq!(err_path, path),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn missing_data_dir_is_an_io_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = DataDir::new(tmp.path().join("missing"));
        assert!(matches!(
            dir.load_catalog(),
            Err(StoreError::Io { .. })
        ));
    }
}
