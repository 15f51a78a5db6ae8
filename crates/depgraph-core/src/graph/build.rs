//! Lazy discovery of the reachable node/edge sets.
//!
//! # Algorithm
//!
//! A worklist starts with a copy of the seeds and a `discovered` set starts
//! equal to the seeds. Each popped node is offered to every producer that
//! applies to it. Every produced edge is recorded; an edge whose target has
//! not been discovered yet adds that target to `discovered` and pushes it on
//! the worklist so it is expanded too.
//!
//! Each node is expanded at most once (guarded by `discovered`), and
//! producers yield finite sequences, so discovery terminates. The worklist
//! is an explicit `Vec`, so dependency chains of any depth are expanded
//! without growing the call stack.
//!
//! Pop order is unspecified. It never affects the result because both
//! outputs are sets, and edges are deduplicated by their
//! `(relation_kind, from, to)` identity.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace, warn};

use crate::edge::Edge;
use crate::node::Node;
use crate::producer::Producer;

/// Raw output of discovery, before cycle validation.
#[derive(Debug, Clone)]
pub struct Discovery<N: Node> {
    pub nodes: HashSet<N>,
    pub edges: HashSet<Edge<N>>,
}

/// Expand `seeds` through `producers` until no new node appears.
pub fn discover<N, I>(seeds: I, producers: &[Box<dyn Producer<N>>]) -> Discovery<N>
where
    N: Node,
    I: IntoIterator<Item = N>,
{
    let mut discovered: HashSet<N> = seeds.into_iter().collect();
    let mut frontier: Vec<N> = discovered.iter().cloned().collect();
    let mut edges: HashSet<Edge<N>> = HashSet::new();

    debug!(seeds = discovered.len(), "starting discovery");

    while let Some(node) = frontier.pop() {
        let mut produced = 0usize;

        for producer in producers.iter().filter(|p| p.applies(&node)) {
            for edge in producer.edges_for(&node) {
                produced += 1;

                if edge.from() != &node {
                    // Keep the edge, but make sure its source is a known node
                    // so every edge endpoint stays inside the node set.
                    warn!(
                        producer = producer.name(),
                        expanded = %node,
                        edge = %edge,
                        "producer emitted an edge that does not start at the expanded node"
                    );
                    if discovered.insert(edge.from().clone()) {
                        frontier.push(edge.from().clone());
                    }
                }

                if discovered.insert(edge.to().clone()) {
                    frontier.push(edge.to().clone());
                }

                trace!(producer = producer.name(), edge = %edge, "edge produced");
                edges.insert(edge);
            }
        }

        debug!(node = %node, produced, pending = frontier.len(), "node expanded");
    }

    Discovery {
        nodes: discovered,
        edges,
    }
}

/// Build the petgraph query index for a discovery result.
///
/// Nodes and edges are inserted in name order so node indices (and with
/// them the Kahn pop order) do not depend on hash-set iteration order.
pub fn index<N: Node>(discovery: &Discovery<N>) -> (DiGraph<N, String>, HashMap<N, NodeIndex>) {
    let mut nodes: Vec<&N> = discovery.nodes.iter().collect();
    nodes.sort_by(|a, b| a.name().cmp(b.name()));

    let mut graph = DiGraph::<N, String>::with_capacity(nodes.len(), discovery.edges.len());
    let mut node_map: HashMap<N, NodeIndex> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        let idx = graph.add_node(node.clone());
        node_map.insert(node.clone(), idx);
    }

    let mut edges: Vec<&Edge<N>> = discovery.edges.iter().collect();
    edges.sort_by(|a, b| edge_key(a).cmp(&edge_key(b)));

    for edge in edges {
        // Discovery guarantees both endpoints are in the node set.
        if let (Some(&from), Some(&to)) = (node_map.get(edge.from()), node_map.get(edge.to())) {
            graph.add_edge(from, to, edge.relation_kind().to_string());
        }
    }

    (graph, node_map)
}

/// Compute a BLAKE3 hash over sorted node names and edge triples.
pub fn content_hash<N: Node>(graph: &DiGraph<N, String>) -> String {
    let mut names: Vec<&str> = graph.node_indices().map(|idx| graph[idx].name()).collect();
    names.sort_unstable();

    let mut triples: Vec<(&str, &str, &str)> = graph
        .edge_references()
        .map(|e| {
            (
                e.weight().as_str(),
                graph[e.source()].name(),
                graph[e.target()].name(),
            )
        })
        .collect();
    triples.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for name in names {
        hasher.update(b"node\x00");
        hasher.update(name.as_bytes());
        hasher.update(b"\x00");
    }
    for (kind, from, to) in triples {
        hasher.update(b"edge\x00");
        hasher.update(kind.as_bytes());
        hasher.update(b"\x00");
        hasher.update(from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(to.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

fn edge_key<N: Node>(edge: &Edge<N>) -> (&str, &str, &str) {
    (edge.relation_kind(), edge.from().name(), edge.to().name())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Table(Vec<(&'static str, Vec<&'static str>)>);

    impl Producer<&'static str> for Table {
        fn edges_for(&self, node: &&'static str) -> Vec<Edge<&'static str>> {
            self.0
                .iter()
                .filter(|(from, _)| from == node)
                .flat_map(|(from, deps)| deps.iter().map(move |to| Edge::new("static", *from, *to)))
                .collect()
        }
    }

    /// Emits edges that start somewhere other than the node being expanded.
    struct Stray;

    impl Producer<&'static str> for Stray {
        fn edges_for(&self, node: &&'static str) -> Vec<Edge<&'static str>> {
            if *node == "A" {
                vec![Edge::new("stray", "X", "Y")]
            } else {
                Vec::new()
            }
        }
    }

    fn producers(
        list: Vec<Box<dyn Producer<&'static str>>>,
    ) -> Vec<Box<dyn Producer<&'static str>>> {
        list
    }

    #[test]
    fn seeds_without_producers_are_nodes_only() {
        let d = discover(["A", "B"], &[]);
        assert_eq!(d.nodes, HashSet::from(["A", "B"]));
        assert!(d.edges.is_empty());
    }

    #[test]
    fn overlapping_rows_are_deduplicated() {
        let p = producers(vec![Box::new(Table(vec![
            ("A", vec!["C", "D"]),
            ("A", vec!["B", "C"]),
        ]))]);
        let d = discover(["A"], &p);
        assert_eq!(d.nodes.len(), 4);
        assert_eq!(d.edges.len(), 3);
    }

    #[test]
    fn stray_edge_sources_join_the_node_set() {
        let p = producers(vec![Box::new(Stray)]);
        let d = discover(["A"], &p);
        assert_eq!(d.nodes, HashSet::from(["A", "X", "Y"]));
        assert_eq!(d.edges.len(), 1);
    }

    #[test]
    fn index_is_deterministic() {
        let p = producers(vec![Box::new(Table(vec![("A", vec!["B", "C"]), ("B", vec!["C"])]))]);
        let (first, _) = index(&discover(["A"], &p));
        let (second, _) = index(&discover(["A"], &p));
        let names = |g: &DiGraph<&'static str, String>| {
            g.node_indices().map(|idx| g[idx]).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), vec!["A", "B", "C"]);
        assert_eq!(names(&first), names(&second));
        assert_eq!(content_hash(&first), content_hash(&second));
    }

    #[test]
    fn content_hash_changes_with_edges() {
        let lone = producers(Vec::new());
        let linked = producers(vec![Box::new(Table(vec![("A", vec!["B"])]))]);

        let (g1, _) = index(&discover(["A", "B"], &lone));
        let (g2, _) = index(&discover(["A", "B"], &linked));

        assert!(content_hash(&g1).starts_with("blake3:"));
        assert_ne!(content_hash(&g1), content_hash(&g2), "hash must change when edges added");
    }
}
