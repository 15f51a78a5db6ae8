//! Node identity contract.
//!
//! The engine treats nodes as opaque tokens: it only needs stable equality
//! and hashing, a `Display` rendering for diagnostics, and a `name()` that
//! producers use for suffix matching (see [`crate::producer::Extensions`]).

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A participant in a dependency graph.
pub trait Node: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// Name used by producers for extension (suffix) matching and by
    /// content hashing.
    fn name(&self) -> &str;
}

impl Node for String {
    fn name(&self) -> &str {
        self
    }
}

impl Node for &'static str {
    fn name(&self) -> &str {
        self
    }
}

/// String-backed node identifier.
///
/// Internally uses `Arc<str>` so that cloning a node while it travels
/// through discovery, edge sets and the query index is a reference count
/// bump only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates a node ID from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Node for NodeId {
    fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
