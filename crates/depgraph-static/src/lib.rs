#![forbid(unsafe_code)]
//! depgraph-static: a table-driven [`Producer`](depgraph_core::Producer).
//!
//! Rows are given in code with [`StaticDependencies::new`] or loaded from a
//! TOML file with [`load_static_table`].

pub mod config;
pub mod table;

pub use config::{ConfigError, DependencyRow, StaticTable, load_static_table};
pub use table::{DEFAULT_RELATION_KIND, Row, StaticDependencies};
