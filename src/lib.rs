//! # elastic-model
//!
//! A fluent query builder that compiles into Elasticsearch request documents
//! and hydrates the returned hits into model instances.
//!
//! ## Features
//!
//! - **Fluent Builder**: `where_`, `where_between`, `where_time_between`, `order`, `limit`, `offset`
//! - **Operator Strings**: `>`, `>=`, `<`, `<=`, `=`, `like`, each negatable with `!`
//! - **Canned Queries**: `multi_match`, `fuzzy`, `ids`, `more_like_this`
//! - **Hydration**: hits become `Document<M>` values, or raw hits when no model is wanted
//! - **Pluggable Backends**: HTTP via `reqwest`, plus an in-memory searcher for tests
//! - **Configuration-Based**: index, hosts and defaults from YAML or `ES_*` variables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use elastic_model::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! pub struct Article {
//!     pub id: u64,
//!     pub title: String,
//!     pub views: u64,
//! }
//!
//! impl_search_model!(Article, "articles", key = id);
//!
//! let config = ElasticConfig::from_env()?;
//! let searcher: Arc<dyn Searcher> = Arc::new(HttpSearcher::from_config(&config)?);
//! let articles = SearchIndex::<ModelHydrator<Article>>::for_model(searcher, &config);
//!
//! let popular = articles
//!     .query()
//!     .where_("views", ">=", 1000)?
//!     .where_("title", "like", "%rust%")?
//!     .order("views", "desc")
//!     .limit(10)
//!     .get()
//!     .await?;
//!
//! for article in popular {
//!     println!("{} ({:?})", article.title, article.score());
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Query Building ===
    pub use crate::core::{
        clause::SortClause,
        document::{MoreLikeThis, QueryDocument},
        index::SearchIndex,
        query::{QueryBuilder, QueryDefaults},
    };

    // === Models & Hydration ===
    pub use crate::core::{
        hydrate::{Hydrator, ModelHydrator, RawHit, RawHydrator, ResultCollection},
        model::{Attributes, Document, DocumentMeta, Model},
    };

    // === Backends ===
    pub use crate::core::searcher::{SearchTarget, Searcher};
    pub use crate::storage::{HttpSearcher, InMemorySearcher};

    // === Errors ===
    pub use crate::core::error::{SearchError, SearchResult};

    // === Macros ===
    pub use crate::impl_search_model;

    // === Config ===
    pub use crate::config::ElasticConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
