//! Edges: directed, typed relations between two nodes.
//!
//! An [`Edge`] is identified by its `(relation_kind, from, to)` triple only.
//! The attached [`Attributes`] bag is metadata: two edges with the same
//! triple but different attributes are equal, hash identically, and collapse
//! to one when collected into a set.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::filter::FieldAccess;
use crate::node::Node;
use crate::value::Value;

/// Attribute keys that would shadow an edge's identity fields.
pub const RESERVED_KEYS: [&str; 3] = ["relation_kind", "from", "to"];

/// Errors from building edges and attribute bags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeError {
    /// The attribute bag tried to use one of [`RESERVED_KEYS`].
    #[error("attribute key '{key}' is reserved for edge identity")]
    ReservedAttribute { key: String },
}

impl EdgeError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ReservedAttribute { .. } => ErrorCode::InvalidArgument,
        }
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// A validated key → [`Value`] map that never contains a reserved key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    /// Creates an empty attribute bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning the previous value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::ReservedAttribute`] if `key` is reserved.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, EdgeError> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(EdgeError::ReservedAttribute { key });
        }
        Ok(self.0.insert(key, value.into()))
    }

    /// Build a bag from `(key, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::ReservedAttribute`] on the first reserved key.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, EdgeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut attrs = Self::new();
        for (key, value) in pairs {
            attrs.insert(key, value)?;
        }
        Ok(attrs)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<BTreeMap<String, Value>> for Attributes {
    type Error = EdgeError;

    fn try_from(map: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        Self::try_from_pairs(map)
    }
}

impl From<Attributes> for BTreeMap<String, Value> {
    fn from(attrs: Attributes) -> Self {
        attrs.0
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed dependency `from → to`, tagged with a relation kind.
#[derive(Debug, Clone)]
pub struct Edge<N> {
    relation_kind: String,
    from: N,
    to: N,
    attributes: Attributes,
}

impl<N: Node> Edge<N> {
    /// Creates an edge with an empty attribute bag.
    #[must_use]
    pub fn new(relation_kind: impl Into<String>, from: N, to: N) -> Self {
        Self::with_attributes(relation_kind, from, to, Attributes::new())
    }

    /// Creates an edge carrying an already validated attribute bag.
    #[must_use]
    pub fn with_attributes(
        relation_kind: impl Into<String>,
        from: N,
        to: N,
        attributes: Attributes,
    ) -> Self {
        Self {
            relation_kind: relation_kind.into(),
            from,
            to,
            attributes,
        }
    }

    /// Creates an edge from raw `(key, value)` attribute pairs.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::ReservedAttribute`] if any key is one of
    /// `relation_kind`, `from` or `to`.
    pub fn try_new<I, K, V>(
        relation_kind: impl Into<String>,
        from: N,
        to: N,
        attributes: I,
    ) -> Result<Self, EdgeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes = Attributes::try_from_pairs(attributes)?;
        Ok(Self::with_attributes(relation_kind, from, to, attributes))
    }

    #[must_use]
    pub fn relation_kind(&self) -> &str {
        &self.relation_kind
    }

    #[must_use]
    pub const fn from(&self) -> &N {
        &self.from
    }

    #[must_use]
    pub const fn to(&self) -> &N {
        &self.to
    }

    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns `true` if the edge points back at its own source.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl<N: PartialEq> PartialEq for Edge<N> {
    fn eq(&self, other: &Self) -> bool {
        self.relation_kind == other.relation_kind && self.from == other.from && self.to == other.to
    }
}

impl<N: Eq> Eq for Edge<N> {}

impl<N: Hash> Hash for Edge<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.relation_kind.hash(state);
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.from, self.to)
    }
}

impl<N: Node> FieldAccess for Edge<N> {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "relation_kind" => Some(Value::from(self.relation_kind.as_str())),
            "from" => Some(Value::from(self.from.name())),
            "to" => Some(Value::from(self.to.name())),
            other => self.attributes.get(other).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn reserved_keys_are_rejected() {
        for key in RESERVED_KEYS {
            let err = Edge::try_new("static", "A", "B", [(key, 1)])
                .expect_err("reserved key must be rejected");
            assert_eq!(err, EdgeError::ReservedAttribute { key: key.to_string() });
            assert_eq!(err.code(), ErrorCode::InvalidArgument);
        }
    }

    #[test]
    fn identity_ignores_attributes() {
        let plain = Edge::new("static", "A", "B");
        let weighted = Edge::try_new("static", "A", "B", [("weight", 3)]).expect("valid attrs");
        assert_eq!(plain, weighted);

        let set: HashSet<Edge<&str>> = [plain, weighted].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn relation_kind_is_part_of_identity() {
        assert_ne!(Edge::new("static", "A", "B"), Edge::new("include", "A", "B"));
        assert_ne!(Edge::new("static", "A", "B"), Edge::new("static", "B", "A"));
    }

    #[test]
    fn display_renders_arrow() {
        assert_eq!(Edge::new("static", "main.c", "util.h").to_string(), "main.c --> util.h");
    }

    #[test]
    fn field_access_prefers_identity_fields() {
        let edge = Edge::try_new("import", "a.rs", "b.rs", [("line", 12)]).expect("valid attrs");
        assert_eq!(edge.field("relation_kind"), Some(Value::from("import")));
        assert_eq!(edge.field("from"), Some(Value::from("a.rs")));
        assert_eq!(edge.field("to"), Some(Value::from("b.rs")));
        assert_eq!(edge.field("line"), Some(Value::Int(12)));
        assert_eq!(edge.field("missing"), None);
    }

    #[test]
    fn attributes_insert_returns_previous() {
        let mut attrs = Attributes::new();
        assert_eq!(attrs.insert("weight", 1).expect("insert"), None);
        assert_eq!(attrs.insert("weight", 2).expect("insert"), Some(Value::Int(1)));
        assert_eq!(attrs.len(), 1);
        assert!(attrs.insert("to", "x").is_err());
    }
}
