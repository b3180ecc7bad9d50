use crate::error::ConfigError;
use crate::sort::Sort;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Builder settings. Every field has a default, so an empty document (or a
/// missing file) gives `i`/`n` aliases and the stock default sorts.
///
/// ```toml
/// root_alias = "doc"
/// count_alias = "total"
///
/// [[search_sort]]
/// field = { field = "created" }
/// direction = "DESC"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Identifier bound to each document inside generated queries.
    pub root_alias: String,
    /// Identifier bound to the count accumulator.
    pub count_alias: String,
    /// Sort used by `find` when the caller passes none.
    pub find_sort: Vec<Sort>,
    /// Sort used by `search` when the caller passes none.
    pub search_sort: Vec<Sort>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_alias: "i".to_string(),
            count_alias: "n".to_string(),
            find_sort: vec![Sort::asc("_key")],
            search_sort: vec![Sort::asc("_rev")],
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file; a missing file yields the defaults.
    #[tracing::instrument(skip_all)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no search config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
