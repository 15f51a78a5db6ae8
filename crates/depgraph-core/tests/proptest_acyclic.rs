use std::collections::HashSet;

use depgraph_core::{DependencyGraph, GraphError};
use proptest::prelude::*;

use generators::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn random_dags_always_build((n, edges) in arb_dag()) {
        let seeds: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let graph = DependencyGraph::discover(seeds, &numbered(n, &edges));
        prop_assert!(graph.is_ok());

        let graph = graph.expect("checked above");
        prop_assert_eq!(graph.node_count(), n);
        let distinct: HashSet<(usize, usize)> = edges.iter().copied().collect();
        prop_assert_eq!(graph.edge_count(), distinct.len());
    }

    #[test]
    fn construction_is_idempotent((n, edges) in arb_dag()) {
        let seeds: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let mut reversed = seeds.clone();
        reversed.reverse();

        let a = DependencyGraph::discover(seeds, &numbered(n, &edges)).expect("dag");
        let b = DependencyGraph::discover(reversed, &numbered(n, &edges)).expect("dag");

        prop_assert_eq!(a.nodes(), b.nodes());
        prop_assert_eq!(a.edges(), b.edges());
        prop_assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn closing_a_path_is_always_rejected((n, edges) in arb_dag()) {
        // Any existing edge a → b plus b → a closes a cycle.
        prop_assume!(!edges.is_empty());
        let (from, to) = edges[0];

        let mut cyclic = edges.clone();
        cyclic.push((to, from));

        let seeds: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let result = DependencyGraph::discover(seeds, &numbered(n, &cyclic));
        let is_cycle_error = matches!(result, Err(GraphError::CircularDependency { .. }));
        prop_assert!(is_cycle_error);
    }

    #[test]
    fn closure_matches_deduplicated_walk((n, edges) in arb_dag()) {
        let graph = DependencyGraph::discover([s("0")], &numbered(n, &edges)).expect("dag");
        let walked: HashSet<&String> = graph.transitive_dependencies(&s("0")).collect();
        prop_assert_eq!(walked, graph.transitive_closure(&s("0")));
    }

    #[test]
    fn topological_order_respects_edges((n, edges) in arb_dag()) {
        let seeds: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let graph = DependencyGraph::discover(seeds, &numbered(n, &edges)).expect("dag");
        let order: Vec<&String> = graph.topological_order();
        prop_assert_eq!(order.len(), n);
        for edge in graph.edges() {
            let from = order.iter().position(|x| *x == edge.from());
            let to = order.iter().position(|x| *x == edge.to());
            prop_assert!(from < to, "{} out of order", edge);
        }
    }
}
