//! The producer contract: pluggable sources of outgoing edges.
//!
//! The graph engine knows nothing about where edges come from. It holds a
//! list of `Box<dyn Producer<N>>` and, for every discovered node, asks each
//! producer that [`applies`](Producer::applies) for that node's outgoing
//! edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::node::Node;

/// A strategy that yields the outgoing edges of a node.
pub trait Producer<N: Node> {
    /// Whether this producer can emit edges for `node`.
    fn applies(&self, node: &N) -> bool {
        let _ = node;
        true
    }

    /// The outgoing edges of `node`.
    ///
    /// Each call must return a fresh, finite sequence. Every edge's `from`
    /// should be `node`.
    fn edges_for(&self, node: &N) -> Vec<Edge<N>>;

    /// Human-readable producer name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ---------------------------------------------------------------------------
// Extensions
// ---------------------------------------------------------------------------

/// Node-name suffix policy used to decide whether a producer applies.
///
/// Deserializes from `"*"` ([`Extensions::Any`]), any other single string
/// ([`Extensions::Suffix`]), or a list of strings ([`Extensions::AnyOf`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawExtensions", into = "RawExtensions")]
pub enum Extensions {
    /// Applies to every node.
    #[default]
    Any,
    /// Applies iff the node name ends with this suffix.
    Suffix(String),
    /// Applies iff the node name ends with any of these suffixes.
    AnyOf(Vec<String>),
}

impl Extensions {
    /// Returns `true` if a node called `name` is covered by this policy.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Suffix(suffix) => name.ends_with(suffix.as_str()),
            Self::AnyOf(suffixes) => suffixes.iter().any(|s| name.ends_with(s.as_str())),
        }
    }

    /// Convenience for `Extensions::matches(node.name())`.
    #[must_use]
    pub fn applies_to<N: Node>(&self, node: &N) -> bool {
        self.matches(node.name())
    }
}

impl fmt::Display for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Suffix(suffix) => f.write_str(suffix),
            Self::AnyOf(suffixes) => write!(f, "[{}]", suffixes.join(", ")),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawExtensions {
    One(String),
    Many(Vec<String>),
}

impl From<RawExtensions> for Extensions {
    fn from(raw: RawExtensions) -> Self {
        match raw {
            RawExtensions::One(s) if s == "*" => Self::Any,
            RawExtensions::One(s) => Self::Suffix(s),
            RawExtensions::Many(list) => Self::AnyOf(list),
        }
    }
}

impl From<Extensions> for RawExtensions {
    fn from(ext: Extensions) -> Self {
        match ext {
            Extensions::Any => Self::One("*".to_string()),
            Extensions::Suffix(s) => Self::One(s),
            Extensions::AnyOf(list) => Self::Many(list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Producer<&'static str> for Fixed {
        fn edges_for(&self, node: &&'static str) -> Vec<Edge<&'static str>> {
            vec![Edge::new("fixed", *node, "leaf")]
        }
    }

    #[test]
    fn star_always_applies() {
        assert!(Extensions::Any.matches("anything"));
        assert!(Extensions::Any.matches(""));
    }

    #[test]
    fn single_suffix_matches_end_of_name() {
        let ext = Extensions::Suffix(".rs".to_string());
        assert!(ext.matches("src/lib.rs"));
        assert!(!ext.matches("src/lib.rs.bak"));
        assert!(ext.applies_to(&"main.rs"));
    }

    #[test]
    fn any_of_matches_any_suffix() {
        let ext = Extensions::AnyOf(vec![".c".to_string(), ".h".to_string()]);
        assert!(ext.matches("util.c"));
        assert!(ext.matches("util.h"));
        assert!(!ext.matches("util.cpp"));
        assert!(!Extensions::AnyOf(Vec::new()).matches("util.c"));
    }

    #[test]
    fn default_producer_applies_everywhere() {
        let producer = Fixed;
        assert!(producer.applies(&"x"));
        assert_eq!(producer.edges_for(&"x"), vec![Edge::new("fixed", "x", "leaf")]);
        assert!(producer.name().ends_with("Fixed"));
    }

    #[test]
    fn display_round_trips_star() {
        assert_eq!(Extensions::Any.to_string(), "*");
        assert_eq!(
            Extensions::AnyOf(vec![".c".into(), ".h".into()]).to_string(),
            "[.c, .h]"
        );
    }
}
