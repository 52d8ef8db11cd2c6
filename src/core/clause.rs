//! Filter and sort clauses accumulated by the query builder

use crate::core::operator::{Operator, Polarity};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

/// One side of a range query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeBound {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeBound {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeBound::Gt => "gt",
            RangeBound::Gte => "gte",
            RangeBound::Lt => "lt",
            RangeBound::Lte => "lte",
        }
    }

    /// Bound emitted for a range operator.
    ///
    /// The mapping is inverted on purpose: `field > value` reads as "value is
    /// below the field", so `>` compiles to `lt`. Callers depend on this.
    pub fn for_operator(operator: Operator) -> Option<Self> {
        match operator {
            Operator::RangeGt => Some(RangeBound::Lt),
            Operator::RangeGte => Some(RangeBound::Lte),
            Operator::RangeLt => Some(RangeBound::Gt),
            Operator::RangeLte => Some(RangeBound::Gte),
            Operator::Match | Operator::Wildcard => None,
        }
    }
}

/// What a filter clause compiles into
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseKind {
    /// `{"match": {field: value}}`
    Match(Value),

    /// `{"wildcard": {field: pattern}}`
    Wildcard(String),

    /// `{"range": {field: {bounds..., options...}}}`
    Range {
        bounds: Vec<(RangeBound, Value)>,
        options: Map<String, Value>,
    },
}

/// A single predicate of the compiled `bool` query
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    field: String,
    polarity: Polarity,
    kind: ClauseKind,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, polarity: Polarity, kind: ClauseKind) -> Self {
        Self {
            field: field.into(),
            polarity,
            kind,
        }
    }

    /// Exact match clause
    pub fn matching(field: impl Into<String>, polarity: Polarity, value: Value) -> Self {
        Self::new(field, polarity, ClauseKind::Match(value))
    }

    /// Wildcard clause; `%` tokens become the backend's `*` token
    pub fn wildcard(field: impl Into<String>, polarity: Polarity, value: &Value) -> Self {
        let pattern = match value {
            Value::String(s) => s.replace('%', "*"),
            Value::Null => String::new(),
            other => other.to_string().replace('%', "*"),
        };
        Self::new(field, polarity, ClauseKind::Wildcard(pattern))
    }

    /// Range clause. Option keys never override a bound already present.
    pub fn range(
        field: impl Into<String>,
        polarity: Polarity,
        bounds: Vec<(RangeBound, Value)>,
        options: Map<String, Value>,
    ) -> Self {
        Self::new(field, polarity, ClauseKind::Range { bounds, options })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn kind(&self) -> &ClauseKind {
        &self.kind
    }

    /// Compile into the backend's clause shape
    pub fn to_value(&self) -> Value {
        match &self.kind {
            ClauseKind::Match(value) => json!({ "match": { self.field.as_str(): value } }),
            ClauseKind::Wildcard(pattern) => {
                json!({ "wildcard": { self.field.as_str(): pattern } })
            }
            ClauseKind::Range { bounds, options } => {
                let mut body = Map::new();
                for (bound, value) in bounds {
                    body.insert(bound.as_str().to_string(), value.clone());
                }
                for (key, value) in options {
                    if !body.contains_key(key) {
                        body.insert(key.clone(), value.clone());
                    }
                }
                json!({ "range": { self.field.as_str(): Value::Object(body) } })
            }
        }
    }
}

/// One sort key. Serialized as the single-entry object `{field: direction}`.
///
/// The direction is passed through untouched; the backend decides what is
/// legal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortClause {
    pub field: String,
    pub direction: String,
}

impl SortClause {
    pub fn new(field: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: direction.into(),
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, "asc")
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, "desc")
    }

    pub fn is_descending(&self) -> bool {
        self.direction.eq_ignore_ascii_case("desc")
    }
}

impl Serialize for SortClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.direction)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for SortClause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SortVisitor;

        impl<'de> Visitor<'de> for SortVisitor {
            type Value = SortClause;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-entry map of field to direction")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SortClause, A::Error> {
                let (field, direction): (String, String) = map
                    .next_entry()?
                    .ok_or_else(|| de::Error::custom("empty sort clause"))?;
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom("sort clause must have exactly one field"));
                }
                Ok(SortClause { field, direction })
            }
        }

        deserializer.deserialize_map(SortVisitor)
    }
}
