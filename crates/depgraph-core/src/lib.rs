#![forbid(unsafe_code)]
//! depgraph-core library.
//!
//! Models dependency relationships between named nodes as a directed graph
//! that is discovered lazily through pluggable [`Producer`]s and proven
//! acyclic before it is exposed.
//!
//! # Conventions
//!
//! - **Errors**: One `thiserror` enum per concern ([`EdgeError`],
//!   [`FilterError`], [`GraphError`]), each mapping to an [`ErrorCode`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!   The library never installs a subscriber.

pub mod edge;
pub mod error;
pub mod filter;
pub mod graph;
pub mod node;
pub mod producer;
pub mod value;

pub use edge::{Attributes, Edge, EdgeError};
pub use error::ErrorCode;
pub use filter::{Comparison, FieldAccess, Filter, FilterError};
pub use graph::{DependencyGraph, GraphError, TransitiveDependencies};
pub use node::{Node, NodeId};
pub use producer::{Extensions, Producer};
pub use value::Value;
