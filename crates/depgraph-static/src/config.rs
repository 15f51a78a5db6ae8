//! TOML dependency tables.
//!
//! ```toml
//! relation_kind = "include"
//! extensions = [".c", ".h"]
//!
//! [[dependency]]
//! node = "main.c"
//! depends_on = ["util.h"]
//! attributes = { optional = false }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use depgraph_core::{Attributes, EdgeError, ErrorCode, Extensions, Node, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{DEFAULT_RELATION_KIND, StaticDependencies};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse dependency table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("dependency row for '{node}': {source}")]
    Attributes {
        node: String,
        #[source]
        source: EdgeError,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::ConfigParseError,
            Self::Attributes { source, .. } => source.code(),
        }
    }
}

/// On-disk shape of a dependency table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticTable {
    #[serde(default = "default_relation_kind")]
    pub relation_kind: String,
    #[serde(default)]
    pub extensions: Extensions,
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyRow>,
}

impl Default for StaticTable {
    fn default() -> Self {
        Self {
            relation_kind: default_relation_kind(),
            extensions: Extensions::default(),
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyRow {
    pub node: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

fn default_relation_kind() -> String {
    DEFAULT_RELATION_KIND.to_string()
}

impl<N: Node + From<String>> StaticDependencies<N> {
    /// Build a producer from a parsed table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Attributes`] if a row uses a reserved
    /// attribute key.
    pub fn from_table(table: StaticTable) -> Result<Self, ConfigError> {
        let mut deps = Self::new(std::iter::empty())
            .with_relation_kind(table.relation_kind)
            .with_extensions(table.extensions);

        for row in table.dependencies {
            let attributes = Attributes::try_from(row.attributes).map_err(|source| {
                ConfigError::Attributes {
                    node: row.node.clone(),
                    source,
                }
            })?;
            deps = deps.with_row_attributes(
                N::from(row.node),
                row.depends_on.into_iter().map(N::from).collect(),
                attributes,
            );
        }
        Ok(deps)
    }

    /// Parse a TOML dependency table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown fields,
    /// and [`ConfigError::Attributes`] on reserved attribute keys.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let table: StaticTable = toml::from_str(input)?;
        debug!(
            rows = table.dependencies.len(),
            relation_kind = %table.relation_kind,
            extensions = %table.extensions,
            "parsed dependency table"
        );
        Self::from_table(table)
    }
}

/// Read and parse the dependency table at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid table.
pub fn load_static_table<N: Node + From<String>>(path: &Path) -> Result<StaticDependencies<N>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    StaticDependencies::from_toml_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
