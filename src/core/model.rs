//! Model capability consumed by hydration
//!
//! The ORM side of the crate is reduced to the handful of operations hydration
//! needs. Anything that can be built from a bag of attributes can be searched.

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// Raw attribute map, in the order the backend returned the fields
pub type Attributes = IndexMap<String, Value>;

/// Result of replacing a model's attributes
pub type AttributeResult = anyhow::Result<()>;

/// Deserialize an attribute map into a serde model
pub fn attributes_into<T: DeserializeOwned>(attributes: Attributes) -> anyhow::Result<T> {
    let object: Map<String, Value> = attributes.into_iter().collect();
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// Primary key as JSON; `null` keys count as absent
pub fn key_value<T: Serialize + ?Sized>(key: &T) -> Option<Value> {
    serde_json::to_value(key).ok().filter(|v| !v.is_null())
}

/// Trait for model types that can be hydrated from search hits.
///
/// The methods mirror what an ORM model offers:
/// - `table`: storage name, also the default document type
/// - `key`: primary key of an instance
/// - `new_instance`: construct an instance, flagged as existing or not
/// - `set_raw_attributes`: replace the attributes without casting or events
///
/// Most types should use [`impl_search_model!`](crate::impl_search_model)
/// rather than implementing this by hand.
pub trait Model: Send + Sync + Sized + 'static {
    /// Table (or collection) name of the model
    fn table() -> &'static str;

    /// Index holding this model's documents.
    ///
    /// `None` means the configured default index is used.
    fn index_name() -> Option<&'static str> {
        None
    }

    /// Document type inside the index, defaults to the table name
    fn type_name() -> &'static str {
        Self::table()
    }

    /// Primary key of this instance, if it has one
    fn key(&self) -> Option<Value>;

    /// Create a new instance from attributes
    ///
    /// `exists` tells the model the instance is already persisted.
    fn new_instance(attributes: Attributes, exists: bool) -> Self;

    /// Replace the raw attributes of this instance
    ///
    /// `sync` marks the attributes as the original, unmodified state.
    fn set_raw_attributes(&mut self, attributes: Attributes, sync: bool) -> anyhow::Result<()>;
}

/// Search-side metadata of a hydrated hit.
///
/// Kept next to the model rather than inside its attributes, so that it is
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMeta {
    /// Document id in the index
    pub id: Option<String>,

    /// Relevance score
    pub score: Option<f64>,

    /// Document version
    pub version: Option<i64>,

    /// First highlighted fragment per field
    pub highlighted: IndexMap<String, String>,
}

/// A model instance that was sourced from the search backend, not from
/// primary storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<M> {
    pub model: M,
    pub meta: DocumentMeta,
}

impl<M> Document<M> {
    pub fn new(model: M, meta: DocumentMeta) -> Self {
        Self { model, meta }
    }

    pub fn score(&self) -> Option<f64> {
        self.meta.score
    }

    pub fn version(&self) -> Option<i64> {
        self.meta.version
    }

    /// Highlighted fragment for a field, if the backend returned one
    pub fn highlight(&self, field: &str) -> Option<&str> {
        self.meta.highlighted.get(field).map(String::as_str)
    }

    pub fn into_model(self) -> M {
        self.model
    }
}

impl<M> Deref for Document<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M> DerefMut for Document<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.model
    }
}
