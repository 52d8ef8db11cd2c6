//! Compiled query documents
//!
//! A [`QueryDocument`] is the body sent to the backend. It is produced either
//! by [`QueryBuilder::build_query`](crate::core::QueryBuilder::build_query) or
//! by one of the canned constructors below.

use crate::core::clause::SortClause;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Page size used when nothing else is configured
pub const DEFAULT_SIZE: u64 = 1000;

/// Offset used when the caller does not set one.
///
/// This is 1, not 0: the first hit is skipped. Existing callers paginate
/// against this value, so it stays.
pub const DEFAULT_FROM: u64 = 1;

/// Page size of the canned queries
pub const CANNED_SIZE: u64 = 1000;

/// Fuzziness used by [`QueryDocument::fuzzy`]
pub const DEFAULT_FUZZINESS: &str = "AUTO";

/// Backend query body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDocument {
    pub query: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortClause>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
}

/// Tuning knobs of a `more_like_this` query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoreLikeThis {
    pub min_term_freq: u32,
    pub percent_terms_to_match: f64,
    pub min_word_length: u32,
}

impl Default for MoreLikeThis {
    fn default() -> Self {
        Self {
            min_term_freq: 1,
            percent_terms_to_match: 0.5,
            min_word_length: 3,
        }
    }
}

impl QueryDocument {
    /// Document with only a query and a page size
    pub fn with_query(query: Value, size: u64) -> Self {
        Self {
            query,
            sort: None,
            size: Some(size),
            from: None,
        }
    }

    /// `multi_match` across several fields
    pub fn multi_match<F, S>(fields: F, text: impl Into<Value>) -> Self
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        Self::with_query(
            json!({ "multi_match": { "query": text.into(), "fields": fields } }),
            CANNED_SIZE,
        )
    }

    /// `fuzzy` query on one field
    pub fn fuzzy(field: &str, value: impl Into<Value>, fuzziness: &str) -> Self {
        Self::with_query(
            json!({ "fuzzy": { field: { "value": value.into(), "fuzziness": fuzziness } } }),
            CANNED_SIZE,
        )
    }

    /// `ids` query
    pub fn ids<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::with_query(json!({ "ids": { "values": values } }), CANNED_SIZE)
    }

    /// `more_like_this` query seeded by existing document ids
    pub fn more_like_this<F, S, I, V>(fields: F, ids: I, params: &MoreLikeThis) -> Self
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        Self::with_query(
            json!({
                "more_like_this": {
                    "fields": fields,
                    "ids": ids,
                    "min_term_freq": params.min_term_freq,
                    "percent_terms_to_match": params.percent_terms_to_match,
                    "min_word_length": params.min_word_length,
                }
            }),
            CANNED_SIZE,
        )
    }

    /// Serialize into a JSON body
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_match_shape() {
        let doc = QueryDocument::multi_match(["title", "body"], "rust search");
        assert_eq!(
            doc.to_value(),
            json!({
                "query": { "multi_match": { "query": "rust search", "fields": ["title", "body"] } },
                "size": 1000
            })
        );
    }

    #[test]
    fn test_fuzzy_shape() {
        let doc = QueryDocument::fuzzy("name", "jonh", DEFAULT_FUZZINESS);
        assert_eq!(
            doc.to_value(),
            json!({
                "query": { "fuzzy": { "name": { "value": "jonh", "fuzziness": "AUTO" } } },
                "size": 1000
            })
        );
    }

    #[test]
    fn test_ids_shape() {
        let doc = QueryDocument::ids(["1", "2", "3"]);
        assert_eq!(
            doc.to_value(),
            json!({ "query": { "ids": { "values": ["1", "2", "3"] } }, "size": 1000 })
        );
    }

    #[test]
    fn test_more_like_this_defaults() {
        let doc = QueryDocument::more_like_this(["title"], ["5"], &MoreLikeThis::default());
        assert_eq!(
            doc.to_value(),
            json!({
                "query": {
                    "more_like_this": {
                        "fields": ["title"],
                        "ids": ["5"],
                        "min_term_freq": 1,
                        "percent_terms_to_match": 0.5,
                        "min_word_length": 3
                    }
                },
                "size": 1000
            })
        );
    }
}
