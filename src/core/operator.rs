//! Where-operator parsing
//!
//! Operators arrive as strings (`">"`, `"!="`, `"like"`, ...). They are parsed
//! once into a [`ParsedOperator`] so that the rest of the builder only deals
//! with a closed set of variants.

use crate::core::error::QueryError;
use std::fmt;
use std::str::FromStr;

/// Whether a clause must or must not match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Must,
    MustNot,
}

impl Polarity {
    /// Key of the `bool` query section this polarity compiles into
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Must => "must",
            Polarity::MustNot => "must_not",
        }
    }
}

/// Supported where-operators, without their negation prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>`
    RangeGt,
    /// `>=`
    RangeGte,
    /// `<`
    RangeLt,
    /// `<=`
    RangeLte,
    /// `=`
    Match,
    /// `like`
    Wildcard,
}

impl Operator {
    /// The token this operator is written as
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::RangeGt => ">",
            Operator::RangeGte => ">=",
            Operator::RangeLt => "<",
            Operator::RangeLte => "<=",
            Operator::Match => "=",
            Operator::Wildcard => "like",
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Operator::RangeGt | Operator::RangeGte | Operator::RangeLt | Operator::RangeLte
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An operator together with the polarity selected by an optional `!` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedOperator {
    pub operator: Operator,
    pub polarity: Polarity,
}

impl FromStr for ParsedOperator {
    type Err = QueryError;

    /// Parse an operator string.
    ///
    /// A single leading `!` flips the polarity to `MustNot` and is stripped
    /// before the remaining token is matched. Matching is exact and
    /// case-sensitive.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (polarity, token) = match raw.strip_prefix('!') {
            Some(rest) => (Polarity::MustNot, rest),
            None => (Polarity::Must, raw),
        };

        let operator = match token {
            ">" => Operator::RangeGt,
            ">=" => Operator::RangeGte,
            "<" => Operator::RangeLt,
            "<=" => Operator::RangeLte,
            "=" => Operator::Match,
            "like" => Operator::Wildcard,
            _ => {
                return Err(QueryError::InvalidOperator {
                    operator: raw.to_string(),
                });
            }
        };

        Ok(Self { operator, polarity })
    }
}
