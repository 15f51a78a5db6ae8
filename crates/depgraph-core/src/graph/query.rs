//! Read-only dependency queries over a built [`DependencyGraph`].
//!
//! None of these queries can fail: a node the graph has never seen simply
//! has no dependencies.

use std::collections::HashSet;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::DependencyGraph;
use crate::edge::Edge;
use crate::filter::Filter;
use crate::node::Node;

impl<N: Node> DependencyGraph<N> {
    /// The `to` endpoint of every edge leaving `node`.
    ///
    /// A target reached through several relation kinds appears once per
    /// edge. Unknown nodes yield an empty list.
    #[must_use]
    pub fn direct_dependencies(&self, node: &N) -> Vec<&N> {
        self.node_index(node).map_or_else(Vec::new, |idx| {
            self.index
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|n| &self.index[n])
                .collect()
        })
    }

    /// Every node reachable from `node` through one or more edges, in
    /// depth-first order.
    ///
    /// The walk keeps no visited set (the graph is acyclic, so it always
    /// ends). A node reachable along several paths, as in a diamond, is
    /// yielded once per path. Use [`transitive_closure`](Self::transitive_closure)
    /// when a unique set is needed.
    #[must_use]
    pub fn transitive_dependencies(&self, node: &N) -> TransitiveDependencies<'_, N> {
        let stack = self
            .node_index(node)
            .map(|idx| {
                self.index
                    .neighbors_directed(idx, Direction::Outgoing)
                    .collect()
            })
            .unwrap_or_default();

        TransitiveDependencies {
            graph: &self.index,
            stack,
        }
    }

    /// The set of nodes reachable from `node` through one or more edges.
    #[must_use]
    pub fn transitive_closure(&self, node: &N) -> HashSet<&N> {
        let Some(start) = self.node_index(node) else {
            return HashSet::new();
        };

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<NodeIndex> = self
            .index
            .neighbors_directed(start, Direction::Outgoing)
            .collect();

        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(
                    self.index
                        .neighbors_directed(current, Direction::Outgoing)
                        .filter(|n| !visited.contains(n)),
                );
            }
        }

        visited.into_iter().map(|idx| &self.index[idx]).collect()
    }

    /// Nodes in elimination order: each node comes before everything it
    /// depends on.
    #[must_use]
    pub fn topological_order(&self) -> Vec<&N> {
        self.order.iter().map(|&idx| &self.index[idx]).collect()
    }

    /// Edges matching `filter`.
    #[must_use]
    pub fn edges_matching(&self, filter: &Filter) -> Vec<&Edge<N>> {
        self.edges.iter().filter(|edge| filter.matches(*edge)).collect()
    }
}

/// Depth-first walk over outgoing edges, driven by an explicit stack.
///
/// Returned by [`DependencyGraph::transitive_dependencies`].
#[derive(Debug, Clone)]
pub struct TransitiveDependencies<'a, N> {
    graph: &'a DiGraph<N, String>,
    stack: Vec<NodeIndex>,
}

impl<'a, N> Iterator for TransitiveDependencies<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.graph.neighbors_directed(current, Direction::Outgoing));
        Some(&self.graph[current])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::producer::Producer;

    struct Table(HashMap<&'static str, Vec<&'static str>>);

    impl Producer<&'static str> for Table {
        fn edges_for(&self, node: &&'static str) -> Vec<Edge<&'static str>> {
            self.0
                .get(node)
                .map(|deps| deps.iter().map(|to| Edge::new("static", *node, *to)).collect())
                .unwrap_or_default()
        }
    }

    fn build(
        seeds: &[&'static str],
        rows: &[(&'static str, &[&'static str])],
    ) -> DependencyGraph<&'static str> {
        let table = Table(rows.iter().map(|(k, v)| (*k, v.to_vec())).collect());
        let producers: Vec<Box<dyn Producer<&'static str>>> = vec![Box::new(table)];
        DependencyGraph::discover(seeds.iter().copied(), &producers).expect("acyclic")
    }

    #[test]
    fn direct_dependencies_of_unknown_node_is_empty() {
        let graph = build(&["A"], &[("A", &["B"])]);
        assert!(graph.direct_dependencies(&"Z").is_empty());
        assert!(graph.transitive_dependencies(&"Z").next().is_none());
        assert!(graph.transitive_closure(&"Z").is_empty());
    }

    #[test]
    fn diamond_yields_shared_node_per_path() {
        // A → B → D, A → C → D
        let graph = build(&["A"], &[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"])]);

        let walked: Vec<&&str> = graph.transitive_dependencies(&"A").collect();
        assert_eq!(walked.len(), 4, "D is reached through B and through C");
        assert_eq!(walked.iter().filter(|n| ***n == "D").count(), 2);

        let closure = graph.transitive_closure(&"A");
        assert_eq!(closure, HashSet::from([&"B", &"C", &"D"]));
    }

    #[test]
    fn topological_order_respects_every_edge() {
        let graph = build(&["A"], &[("A", &["B", "C", "D"]), ("B", &["C", "D"]), ("D", &["E"])]);
        let order = graph.topological_order();
        assert_eq!(order.len(), graph.node_count());

        let pos = |n: &str| order.iter().position(|x| **x == n).expect("present");
        for edge in graph.edges() {
            assert!(pos(*edge.from()) < pos(*edge.to()), "{edge} out of order");
        }
    }

    #[test]
    fn edges_matching_filters_the_edge_set() {
        let graph = build(&["A"], &[("A", &["B", "C"]), ("B", &["C"])]);
        let from_a = graph.edges_matching(&Filter::new("from", "A"));
        assert_eq!(from_a.len(), 2);
        assert!(graph.edges_matching(&Filter::new("relation_kind__ne", "static")).is_empty());
    }
}
