//! Shared test harness for searcher testing
//!
//! Provides `Article`, declared through `impl_search_model!`, a hand-written
//! `StrictArticle` whose hydration can fail, and helpers for seeding an
//! in-memory searcher with a deterministic corpus.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod search_harness;
//! use search_harness::*;
//! ```

#![allow(dead_code, unused_macros)]

#[macro_use]
mod searcher_contract_tests;

use anyhow::{Result, bail};
use elastic_model::core::model::{Attributes, Model, attributes_into};
use elastic_model::prelude::*;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Article — declared through the macro
// ---------------------------------------------------------------------------

/// A blog article covering strings, numbers, timestamps and arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub status: String,
    pub views: u64,
    pub published_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

elastic_model::impl_search_model!(Article, "articles", key = id);

/// The same document shape stored in a dedicated index
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchivedArticle {
    pub id: u64,
    pub title: String,
}

elastic_model::impl_search_model!(ArchivedArticle, "articles", key = id, index = "archive");

// ---------------------------------------------------------------------------
// StrictArticle — hand-written Model rejecting documents without a title
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrictArticle {
    pub exists: bool,
    pub attributes: Attributes,
}

impl Model for StrictArticle {
    fn table() -> &'static str {
        "articles"
    }

    fn key(&self) -> Option<Value> {
        self.attributes.get("id").cloned()
    }

    fn new_instance(attributes: Attributes, exists: bool) -> Self {
        Self { exists, attributes }
    }

    fn set_raw_attributes(&mut self, attributes: Attributes, _sync: bool) -> Result<()> {
        if !attributes.contains_key("title") {
            bail!("missing title");
        }
        let _: Article = attributes_into(attributes.clone())?;
        self.attributes = attributes;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Target articles are stored under with the default configuration
pub fn articles_target() -> SearchTarget {
    SearchTarget::new("default", "articles")
}

pub fn create_article(
    id: u64,
    title: &str,
    author: &str,
    status: &str,
    views: u64,
    published_at: &str,
) -> Article {
    Article {
        id,
        title: title.to_string(),
        author: author.to_string(),
        status: status.to_string(),
        views,
        published_at: published_at.to_string(),
        tags: Vec::new(),
    }
}

/// Five articles with distinct ids, views and publication times.
///
/// | id | status    | views | published_at        |
/// |----|-----------|-------|---------------------|
/// | 1  | published | 50    | 2024-01-05T09:00:00 |
/// | 2  | published | 1500  | 2024-01-20T12:00:00 |
/// | 3  | draft     | 0     | 2024-02-02T08:30:00 |
/// | 4  | published | 300   | 2023-12-24T18:00:00 |
/// | 5  | archived  | 900   | 2024-03-01T00:00:00 |
pub fn sample_articles() -> Vec<Article> {
    let mut articles = vec![
        create_article(1, "Rust ownership explained", "alice", "published", 50, "2024-01-05T09:00:00"),
        create_article(2, "Async Rust in practice", "bob", "published", 1500, "2024-01-20T12:00:00"),
        create_article(3, "Draft: tokio internals", "alice", "draft", 0, "2024-02-02T08:30:00"),
        create_article(4, "Serde tips", "carol", "published", 300, "2023-12-24T18:00:00"),
        create_article(5, "Python vs Rust", "bob", "archived", 900, "2024-03-01T00:00:00"),
    ];
    articles[0].tags = vec!["rust".to_string(), "memory".to_string()];
    articles[1].tags = vec!["rust".to_string(), "async".to_string()];
    articles
}

/// Store articles in the searcher, keyed by their id
pub fn seed(searcher: &InMemorySearcher, articles: &[Article]) {
    for article in articles {
        searcher
            .insert_json(
                &articles_target(),
                article.id.to_string(),
                serde_json::to_value(article).unwrap(),
            )
            .unwrap();
    }
}

/// In-memory searcher holding [`sample_articles`]
pub fn seeded_in_memory() -> InMemorySearcher {
    let searcher = InMemorySearcher::new();
    seed(&searcher, &sample_articles());
    searcher
}

/// Article index over any searcher, using the default configuration
pub fn article_index(searcher: Arc<dyn Searcher>) -> SearchIndex<ModelHydrator<Article>> {
    SearchIndex::for_model(searcher, &ElasticConfig::default())
}

/// Ids of hydrated articles, in result order
pub fn ids_of(results: ResultCollection<Document<Article>>) -> Vec<u64> {
    results.into_iter().map(|doc| doc.id).collect()
}

/// Install a test-friendly subscriber once; filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
