//! Attribute-matching predicates.
//!
//! A [`Filter`] matches an object when the object's resolved field value
//! satisfies a comparison. Criteria are written as compound keys of the form
//! `field__op`:
//!
//! | suffix   | comparison |
//! |----------|------------|
//! | *(none)* | `==`       |
//! | `__ne`   | `!=`       |
//! | `__gt`   | `>`        |
//! | `__gte`  | `>=`       |
//! | `__lt`   | `<`        |
//! | `__lte`  | `<=`       |
//!
//! Unrecognised suffixes fall back to equality. The special field `_self`
//! compares the object itself (see [`FieldAccess::self_value`]) instead of
//! one of its fields. A missing field never matches and is not an error.
//!
//! ```rust,ignore
//! use depgraph_core::filter::Filter;
//!
//! let heavy = Filter::new("weight__gte", 10);
//! let imports = Filter::new("relation_kind", "import");
//! let both = Filter::all(vec![heavy, imports]);
//! let hits = graph.edges_matching(&both);
//! ```

use std::cmp::Ordering;

use crate::error::ErrorCode;
use crate::node::NodeId;
use crate::value::Value;

/// Field name that refers to the object itself.
pub const SELF_FIELD: &str = "_self";

/// Objects that filters can inspect.
pub trait FieldAccess {
    /// Resolve a named field, or `None` if the object has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// The object's own value, compared when the field is `_self`.
    fn self_value(&self) -> Option<Value> {
        None
    }
}

impl FieldAccess for str {
    fn field(&self, name: &str) -> Option<Value> {
        (name == "name").then(|| Value::from(self))
    }

    fn self_value(&self) -> Option<Value> {
        Some(Value::from(self))
    }
}

impl FieldAccess for String {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_str().field(name)
    }

    fn self_value(&self) -> Option<Value> {
        self.as_str().self_value()
    }
}

impl FieldAccess for NodeId {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_str().field(name)
    }

    fn self_value(&self) -> Option<Value> {
        self.as_str().self_value()
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for &T {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }

    fn self_value(&self) -> Option<Value> {
        (**self).self_value()
    }
}

/// Errors from building filters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A keyword query must carry exactly one criterion.
    #[error("a filter takes exactly one criterion, got {count}")]
    CriterionCount { count: usize },
}

impl FilterError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CriterionCount { .. } => ErrorCode::InvalidArgument,
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// The comparison applied between a resolved field and the filter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    /// Parse the operator suffix (the text after `__`). Unknown suffixes
    /// mean equality.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "ne" => Self::Ne,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            _ => Self::Eq,
        }
    }

    fn holds(self, actual: &Value, expected: &Value) -> bool {
        let ordering = actual.compare(expected);
        match self {
            Self::Eq => ordering == Some(Ordering::Equal),
            Self::Ne => ordering != Some(Ordering::Equal),
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

/// Split `field__op` into the field name and comparison.
///
/// The field is everything before the first `__`; the operator is whatever
/// follows the last `__`.
fn parse_key(key: &str) -> (String, Comparison) {
    let field = key.split("__").next().unwrap_or(key).to_string();
    let op = key
        .rsplit_once("__")
        .map_or(Comparison::Eq, |(_, suffix)| Comparison::from_suffix(suffix));
    (field, op)
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// A predicate over any [`FieldAccess`] object.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A single `field op value` criterion.
    Field {
        field: String,
        op: Comparison,
        value: Value,
    },
    /// Matches when every sub-filter matches (vacuously true when empty).
    All(Vec<Filter>),
    /// Matches when at least one sub-filter matches.
    Any(Vec<Filter>),
}

impl Filter {
    /// Build a criterion from a compound key such as `weight__gte`.
    #[must_use]
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        let (field, op) = parse_key(key);
        Self::Field {
            field,
            op,
            value: value.into(),
        }
    }

    /// Build a criterion from a keyword query that must hold exactly one
    /// `(key, value)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::CriterionCount`] for zero or several pairs.
    pub fn from_query<I, K, V>(query: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut pairs: Vec<(K, V)> = query.into_iter().collect();
        if pairs.len() != 1 {
            return Err(FilterError::CriterionCount { count: pairs.len() });
        }
        let Some((key, value)) = pairs.pop() else {
            return Err(FilterError::CriterionCount { count: 0 });
        };
        Ok(Self::new(key.as_ref(), value))
    }

    /// Logical AND of `filters`.
    #[must_use]
    pub const fn all(filters: Vec<Self>) -> Self {
        Self::All(filters)
    }

    /// Logical OR of `filters`.
    #[must_use]
    pub const fn any(filters: Vec<Self>) -> Self {
        Self::Any(filters)
    }

    /// AND of `filters` plus one criterion per keyword pair.
    #[must_use]
    pub fn and_query<I, K, V>(filters: Vec<Self>, query: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Self::All(Self::extend_with_query(filters, query))
    }

    /// OR of `filters` plus one criterion per keyword pair.
    #[must_use]
    pub fn or_query<I, K, V>(filters: Vec<Self>, query: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Self::Any(Self::extend_with_query(filters, query))
    }

    fn extend_with_query<I, K, V>(mut filters: Vec<Self>, query: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        filters.extend(
            query
                .into_iter()
                .map(|(key, value)| Self::new(key.as_ref(), value)),
        );
        filters
    }

    /// Returns `true` if `target` satisfies this filter.
    pub fn matches<T: FieldAccess + ?Sized>(&self, target: &T) -> bool {
        match self {
            Self::Field { field, op, value } => {
                let actual = if field == SELF_FIELD {
                    target.self_value()
                } else {
                    target.field(field)
                };
                actual.is_some_and(|actual| op.holds(&actual, value))
            }
            Self::All(filters) => filters.iter().all(|f| f.matches(target)),
            Self::Any(filters) => filters.iter().any(|f| f.matches(target)),
        }
    }
}
