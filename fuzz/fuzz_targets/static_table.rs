#![no_main]

use depgraph_core::{DependencyGraph, Producer};
use depgraph_static::StaticDependencies;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = StaticDependencies::<String>::from_toml_str(input) else {
        return;
    };

    let seeds: Vec<String> = table.rows().iter().map(|row| row.node.clone()).collect();
    let producers: Vec<Box<dyn Producer<String>>> = vec![Box::new(table)];
    if let Ok(graph) = DependencyGraph::discover(seeds, &producers) {
        assert_eq!(graph.topological_order().len(), graph.node_count());
    }
});
