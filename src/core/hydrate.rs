//! Raw backend responses and the strategies that turn hits into results

use crate::core::error::{HydrationError, SearchResult};
use crate::core::model::{Attributes, Document, DocumentMeta, Model};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;

/// One hit as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(rename = "_source", default)]
    pub source: Attributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<IndexMap<String, Vec<String>>>,
}

impl RawHit {
    /// Build a hit from its id and `_source`
    pub fn new(id: impl Into<String>, source: Attributes) -> Self {
        Self {
            id: Some(id.into()),
            source,
            ..Default::default()
        }
    }
}

/// The part of a search response the builder consumes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub took: Option<u64>,
    pub timed_out: bool,
    pub total: Option<u64>,
    pub max_score: Option<f64>,
    pub hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    took: Option<u64>,
    #[serde(default)]
    timed_out: bool,
    #[serde(default)]
    hits: WireHits,
}

#[derive(Deserialize, Default)]
struct WireHits {
    #[serde(default)]
    total: Option<WireTotal>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// `hits.total` is a plain integer on older servers and an object on newer ones
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawResponse {
    /// Decode a search response body
    pub fn from_value(body: Value) -> SearchResult<Self> {
        let wire: WireResponse = serde_json::from_value(body)?;
        Ok(Self {
            took: wire.took,
            timed_out: wire.timed_out,
            total: wire.hits.total.map(|total| match total {
                WireTotal::Count(n) => n,
                WireTotal::Object { value } => value,
            }),
            max_score: wire.hits.max_score,
            hits: wire.hits.hits,
        })
    }
}

/// Strategy turning a raw hit into a result item
pub trait Hydrator: Send + Sync {
    type Output: Send;

    fn from_hit(&self, hit: RawHit) -> SearchResult<Self::Output>;
}

/// Returns hits unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawHydrator;

impl Hydrator for RawHydrator {
    type Output = RawHit;

    fn from_hit(&self, hit: RawHit) -> SearchResult<RawHit> {
        Ok(hit)
    }
}

/// Hydrates hits into [`Document`]s of model `M`
pub struct ModelHydrator<M> {
    _marker: PhantomData<fn() -> M>,
}

impl<M> ModelHydrator<M> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<M> Default for ModelHydrator<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for ModelHydrator<M> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for ModelHydrator<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHydrator")
            .field("table", &std::any::type_name::<M>())
            .finish()
    }
}

impl<M: Model> Hydrator for ModelHydrator<M> {
    type Output = Document<M>;

    fn from_hit(&self, hit: RawHit) -> SearchResult<Document<M>> {
        let mut instance = M::new_instance(Attributes::new(), true);

        let highlighted = hit
            .highlight
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(field, fragments)| {
                fragments.into_iter().next().map(|first| (field, first))
            })
            .collect();

        let meta = DocumentMeta {
            id: hit.id,
            score: hit.score,
            version: hit.version,
            highlighted,
        };

        instance
            .set_raw_attributes(hit.source, true)
            .map_err(|e| HydrationError::Attributes {
                table: M::table().to_string(),
                id: meta.id.clone(),
                message: e.to_string(),
            })?;

        Ok(Document::new(instance, meta))
    }
}

/// Hydrated results of one search, in backend order.
///
/// Iterating consumes the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCollection<T> {
    items: Vec<T>,
    total: Option<u64>,
    max_score: Option<f64>,
    took: Option<u64>,
    timed_out: bool,
}

impl<T> ResultCollection<T> {
    pub fn new(items: Vec<T>, response: &RawResponse) -> Self {
        Self {
            items,
            total: response.total,
            max_score: response.max_score,
            took: response.took,
            timed_out: response.timed_out,
        }
    }

    /// Total number of matching documents, when the backend reports it
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn max_score(&self) -> Option<f64> {
        self.max_score
    }

    /// Milliseconds the backend spent on the query
    pub fn took(&self) -> Option<u64> {
        self.took
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<M: Model> ResultCollection<Document<M>> {
    /// Primary keys of the hydrated models
    pub fn keys(&self) -> Vec<Value> {
        self.items.iter().filter_map(|doc| doc.model.key()).collect()
    }
}

impl<T> IntoIterator for ResultCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_with_integer_total() {
        let response = RawResponse::from_value(json!({
            "took": 3,
            "timed_out": false,
            "hits": {
                "total": 2,
                "max_score": 1.5,
                "hits": [
                    { "_id": "1", "_score": 1.5, "_source": { "a": 1 } },
                    { "_id": "2", "_score": 0.5, "_source": { "a": 2 } }
                ]
            }
        }))
        .unwrap();

        assert_eq!(response.total, Some(2));
        assert_eq!(response.took, Some(3));
        assert_eq!(response.max_score, Some(1.5));
        assert_eq!(response.hits.len(), 2);
        assert_eq!(response.hits[1].source.get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_response_with_object_total() {
        let response = RawResponse::from_value(json!({
            "hits": { "total": { "value": 17, "relation": "eq" }, "hits": [] }
        }))
        .unwrap();
        assert_eq!(response.total, Some(17));
        assert!(response.hits.is_empty());
    }

    #[test]
    fn test_response_without_hits_section() {
        let response = RawResponse::from_value(json!({ "took": 1 })).unwrap();
        assert_eq!(response.total, None);
        assert!(response.hits.is_empty());
    }

    #[test]
    fn test_raw_hydrator_is_passthrough() {
        let hit: RawHit = serde_json::from_value(json!({
            "_id": "7",
            "_source": { "title": "x" },
            "highlight": { "title": ["<em>x</em>"] }
        }))
        .unwrap();

        let out = RawHydrator.from_hit(hit.clone()).unwrap();
        assert_eq!(out, hit);
    }

    #[test]
    fn test_collection_iterates_in_order() {
        let response = RawResponse {
            total: Some(10),
            ..Default::default()
        };
        let collection = ResultCollection::new(vec![1, 2, 3], &response);
        assert_eq!(collection.total(), Some(10));
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
