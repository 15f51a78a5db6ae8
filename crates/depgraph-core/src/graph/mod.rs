//! The dependency graph engine.
//!
//! # Overview
//!
//! A [`DependencyGraph`] is discovered lazily from a set of seed nodes and a
//! list of [`Producer`]s, then checked for cycles before it is handed back.
//! Construction either yields a complete, acyclic, frozen graph or fails with
//! [`GraphError::CircularDependency`]; nothing in between is observable.
//!
//! ## Pipeline
//!
//! ```text
//! seeds + producers
//!        ↓  build::discover()       explicit worklist, dedup by edge triple
//! Discovery { nodes, edges }
//!        ↓  build::index()          petgraph DiGraph, deterministic indices
//! DiGraph<N, relation_kind>
//!        ↓  cycles::kahn_eliminate() canonical Kahn elimination
//! topological order  |  residue → GraphError::CircularDependency
//!        ↓
//! DependencyGraph (immutable; queries in `query`)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use depgraph_core::graph::DependencyGraph;
//!
//! let producers: Vec<Box<dyn Producer<String>>> = vec![Box::new(table)];
//! let graph = DependencyGraph::discover(["app.c".to_string()], &producers)?;
//!
//! for dep in graph.transitive_closure(&"app.c".to_string()) {
//!     println!("{dep}");
//! }
//! ```

pub mod build;
pub mod cycles;
pub mod query;

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{info, instrument, warn};

use crate::edge::Edge;
use crate::error::ErrorCode;
use crate::node::Node;
use crate::producer::Producer;

pub use query::TransitiveDependencies;

/// Errors raised while constructing a [`DependencyGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Kahn elimination could not remove every edge.
    ///
    /// `cycles` lists the members of each strongly connected component
    /// (and self-loop) left in the residue, sorted for determinism.
    #[error(
        "circular dependency: {unresolved_edges} edge(s) could not be eliminated; cycles: {}",
        cycles::render_cycles(.cycles)
    )]
    CircularDependency {
        unresolved_edges: usize,
        cycles: Vec<Vec<String>>,
    },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CircularDependency { .. } => ErrorCode::CycleDetected,
        }
    }
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// An immutable, acyclic dependency graph.
///
/// Nodes are the seeds plus everything reachable from them through the
/// producers. An edge `A → B` means "A depends on B".
#[derive(Debug, Clone)]
pub struct DependencyGraph<N: Node> {
    nodes: HashSet<N>,
    edges: HashSet<Edge<N>>,
    /// Query index: node weights are the nodes, edge weights the relation kind.
    index: DiGraph<N, String>,
    node_map: HashMap<N, NodeIndex>,
    /// Kahn pop order: every node precedes the nodes it depends on.
    order: Vec<NodeIndex>,
    content_hash: String,
}

impl<N: Node> DependencyGraph<N> {
    /// Discover the graph reachable from `seeds` and validate that it is
    /// acyclic.
    ///
    /// Every producer that [`applies`](Producer::applies) to a node is asked
    /// for that node's outgoing edges; newly seen endpoints are expanded in
    /// turn until no new nodes appear.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CircularDependency`] if the discovered edges
    /// contain a cycle. No graph is returned in that case.
    #[instrument(skip_all, fields(producers = producers.len()))]
    pub fn discover<I>(seeds: I, producers: &[Box<dyn Producer<N>>]) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = N>,
    {
        let discovery = build::discover(seeds, producers);
        let (index, node_map) = build::index(&discovery);

        let order = match cycles::kahn_eliminate(&index) {
            Ok(order) => order,
            Err(residue) => {
                let cycles = cycles::find_all_cycles(&index);
                warn!(
                    unresolved_edges = residue.len(),
                    cycle_count = cycles.len(),
                    "rejecting dependency graph with cycles"
                );
                return Err(GraphError::CircularDependency {
                    unresolved_edges: residue.len(),
                    cycles,
                });
            }
        };

        let content_hash = build::content_hash(&index);
        info!(
            nodes = discovery.nodes.len(),
            edges = discovery.edges.len(),
            "dependency graph built"
        );

        Ok(Self {
            nodes: discovery.nodes,
            edges: discovery.edges,
            index,
            node_map,
            order,
            content_hash,
        })
    }

    /// All nodes: the seeds plus every discovered endpoint.
    #[must_use]
    pub const fn nodes(&self) -> &HashSet<N> {
        &self.nodes
    }

    /// All edges, deduplicated by `(relation_kind, from, to)`.
    #[must_use]
    pub const fn edges(&self) -> &HashSet<Edge<N>> {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// BLAKE3 hash of the sorted node names and edge triples.
    ///
    /// Two graphs built from the same seeds and producers hash identically
    /// no matter in which order discovery visited the nodes.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    fn node_index(&self, node: &N) -> Option<NodeIndex> {
        self.node_map.get(node).copied()
    }
}

impl<N: Node> fmt::Display for DependencyGraph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = self.edges.iter().map(ToString::to_string).collect();
        lines.sort_unstable();
        f.write_str(&lines.join("\n"))
    }
}
