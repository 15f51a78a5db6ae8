//! Cycle detection by topological elimination.
//!
//! # Algorithm
//!
//! Canonical Kahn elimination:
//!
//! 1. `indegree[n]` = number of edges ending at `n`.
//! 2. Every node with in-degree zero goes on the ready queue.
//! 3. Pop `n`; remove each outgoing edge `n → m` not yet removed, count it,
//!    and decrement `indegree[m]`. When `indegree[m]` reaches zero, `m` is
//!    ready.
//! 4. The graph is acyclic iff every edge was removed.
//!
//! Edges never removed (the *residue*) contain every cycle. For diagnostics
//! the strongly connected components among them are reported through
//! [`find_all_cycles`].
//!
//! # Edge Direction
//!
//! Edges point from a node to what it depends on, so the pop order lists
//! dependents before their dependencies.

#![allow(clippy::module_name_repetitions)]

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::node::Node;

/// Run Kahn elimination over `graph`.
///
/// Returns the pop order when every edge could be removed, or the residue
/// (edges that were never removed) when the graph has a cycle. An empty
/// graph is trivially acyclic.
///
/// # Errors
///
/// Returns the residual edges if the graph contains a cycle.
pub fn kahn_eliminate<N, E>(graph: &DiGraph<N, E>) -> Result<Vec<NodeIndex>, Vec<EdgeIndex>> {
    let mut indegree: Vec<usize> = vec![0; graph.node_count()];
    for edge in graph.edge_references() {
        indegree[edge.target().index()] += 1;
    }

    let mut ready: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|idx| indegree[idx.index()] == 0)
        .collect();

    let mut removed = FixedBitSet::with_capacity(graph.edge_count());
    let mut removed_count = 0usize;
    let mut order: Vec<NodeIndex> = Vec::with_capacity(graph.node_count());

    while let Some(node) = ready.pop_front() {
        order.push(node);

        for edge in graph.edges(node) {
            let id = edge.id().index();
            if removed.contains(id) {
                continue;
            }
            removed.insert(id);
            removed_count += 1;

            let target = edge.target();
            indegree[target.index()] -= 1;
            if indegree[target.index()] == 0 {
                ready.push_back(target);
            }
        }
    }

    if removed_count == graph.edge_count() {
        Ok(order)
    } else {
        Err(graph
            .edge_indices()
            .filter(|idx| !removed.contains(idx.index()))
            .collect())
    }
}

/// Returns `true` if `graph` has no cycle.
#[must_use]
pub fn is_acyclic<N, E>(graph: &DiGraph<N, E>) -> bool {
    kahn_eliminate(graph).is_ok()
}

/// Find all cycles currently present in `graph`.
///
/// Each entry is a sorted list of node names in one strongly connected
/// component. Self-loops are reported as a one-element cycle.
#[must_use]
pub fn find_all_cycles<N: Node, E>(graph: &DiGraph<N, E>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|node| has_self_loop(graph, *node))
        })
        .map(|component| {
            let mut names: Vec<String> = component
                .into_iter()
                .map(|idx| graph[idx].name().to_string())
                .collect();
            names.sort_unstable();
            names
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

/// Render cycles as `[A, B]; [C]` for error messages.
#[must_use]
pub fn render_cycles(cycles: &[Vec<String>]) -> String {
    if cycles.is_empty() {
        return "none identified".to_string();
    }
    cycles
        .iter()
        .map(|members| format!("[{}]", members.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn has_self_loop<N, E>(graph: &DiGraph<N, E>, node: NodeIndex) -> bool {
    graph.find_edge(node, node).is_some()
}
