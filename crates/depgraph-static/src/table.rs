//! A producer backed by a fixed dependency table.

use depgraph_core::{Attributes, Edge, Extensions, Node, Producer};
use tracing::trace;

/// Relation kind stamped on table edges unless overridden.
pub const DEFAULT_RELATION_KIND: &str = "static";

/// One table row: `node` depends on every entry of `depends_on`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<N> {
    pub node: N,
    pub depends_on: Vec<N>,
    pub attributes: Attributes,
}

/// Yields edges from a list of `(node, dependencies)` rows.
///
/// Several rows may name the same node. Their edges are concatenated and
/// any overlap is deduplicated by the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticDependencies<N> {
    rows: Vec<Row<N>>,
    relation_kind: String,
    extensions: Extensions,
}

impl<N: Node> StaticDependencies<N> {
    /// Build a table with the default relation kind and no extension filter.
    #[must_use]
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<N>)>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|(node, depends_on)| Row {
                    node,
                    depends_on,
                    attributes: Attributes::new(),
                })
                .collect(),
            relation_kind: DEFAULT_RELATION_KIND.to_string(),
            extensions: Extensions::Any,
        }
    }

    #[must_use]
    pub fn with_relation_kind(mut self, relation_kind: impl Into<String>) -> Self {
        self.relation_kind = relation_kind.into();
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Append a row whose edges all carry `attributes`.
    #[must_use]
    pub fn with_row_attributes(mut self, node: N, depends_on: Vec<N>, attributes: Attributes) -> Self {
        self.rows.push(Row {
            node,
            depends_on,
            attributes,
        });
        self
    }

    #[must_use]
    pub fn rows(&self) -> &[Row<N>] {
        &self.rows
    }

    #[must_use]
    pub fn relation_kind(&self) -> &str {
        &self.relation_kind
    }

    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl<N: Node> Producer<N> for StaticDependencies<N> {
    fn applies(&self, node: &N) -> bool {
        self.extensions.applies_to(node)
    }

    fn edges_for(&self, node: &N) -> Vec<Edge<N>> {
        let edges: Vec<Edge<N>> = self
            .rows
            .iter()
            .filter(|row| &row.node == node)
            .flat_map(|row| {
                row.depends_on.iter().map(|to| {
                    Edge::with_attributes(
                        self.relation_kind.as_str(),
                        node.clone(),
                        to.clone(),
                        row.attributes.clone(),
                    )
                })
            })
            .collect();
        trace!(node = %node, edges = edges.len(), "static table lookup");
        edges
    }

    fn name(&self) -> &str {
        "static-table"
    }
}
