//! Per-model search handle

use crate::config::ElasticConfig;
use crate::core::document::{DEFAULT_FUZZINESS, MoreLikeThis, QueryDocument};
use crate::core::error::SearchResult;
use crate::core::hydrate::{Hydrator, ModelHydrator, RawHydrator, ResultCollection};
use crate::core::model::Model;
use crate::core::query::{QueryBuilder, QueryDefaults};
use crate::core::searcher::{SearchTarget, Searcher};
use serde_json::Value;
use std::sync::Arc;

/// Everything needed to run queries against one index: the backend, the
/// target, compilation defaults and the hydration strategy.
///
/// Cheap to share behind an `Arc`; each [`query`](Self::query) call starts a
/// fresh builder.
pub struct SearchIndex<H> {
    searcher: Arc<dyn Searcher>,
    target: SearchTarget,
    defaults: QueryDefaults,
    hydrator: H,
}

impl<M: Model> SearchIndex<ModelHydrator<M>> {
    /// Index for model `M`.
    ///
    /// The index name comes from `M::index_name()` or the configured default,
    /// the document type from `M::type_name()`.
    pub fn for_model(searcher: Arc<dyn Searcher>, config: &ElasticConfig) -> Self {
        let index = M::index_name().unwrap_or(config.index.as_str());
        Self::new(
            searcher,
            SearchTarget::new(index, M::type_name()),
            config.query_defaults(),
            ModelHydrator::new(),
        )
    }
}

impl SearchIndex<RawHydrator> {
    /// Index returning raw hits, for callers without a model
    pub fn raw(searcher: Arc<dyn Searcher>, target: SearchTarget, config: &ElasticConfig) -> Self {
        Self::new(searcher, target, config.query_defaults(), RawHydrator)
    }
}

impl<H: Hydrator> SearchIndex<H> {
    pub fn new(
        searcher: Arc<dyn Searcher>,
        target: SearchTarget,
        defaults: QueryDefaults,
        hydrator: H,
    ) -> Self {
        Self {
            searcher,
            target,
            defaults,
            hydrator,
        }
    }

    pub fn target(&self) -> &SearchTarget {
        &self.target
    }

    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Start a new query
    pub fn query(&self) -> QueryBuilder<'_, H> {
        QueryBuilder::new(self)
    }

    /// Execute a pre-built document and hydrate the hits
    pub async fn search(&self, document: QueryDocument) -> SearchResult<ResultCollection<H::Output>> {
        tracing::debug!(
            target_path = %self.target,
            size = ?document.size,
            from = ?document.from,
            "executing search"
        );

        let mut response = self.searcher.execute(&self.target, &document).await?;

        tracing::debug!(
            target_path = %self.target,
            hits = response.hits.len(),
            total = ?response.total,
            "search completed"
        );

        let items = std::mem::take(&mut response.hits)
            .into_iter()
            .map(|hit| self.hydrator.from_hit(hit))
            .collect::<SearchResult<Vec<_>>>()?;

        Ok(ResultCollection::new(items, &response))
    }

    /// Count documents matching a pre-built document
    pub async fn count(&self, document: QueryDocument) -> SearchResult<u64> {
        let total = self.searcher.count(&self.target, &document).await?;
        tracing::debug!(target_path = %self.target, total, "count completed");
        Ok(total)
    }

    /// `multi_match` over `fields`
    pub async fn multi_match<F, S>(
        &self,
        fields: F,
        text: impl Into<Value>,
    ) -> SearchResult<ResultCollection<H::Output>>
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search(QueryDocument::multi_match(fields, text)).await
    }

    /// `fuzzy` query with `AUTO` fuzziness
    pub async fn fuzzy(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> SearchResult<ResultCollection<H::Output>> {
        self.fuzzy_with(field, value, DEFAULT_FUZZINESS).await
    }

    /// `fuzzy` query with explicit fuzziness
    pub async fn fuzzy_with(
        &self,
        field: &str,
        value: impl Into<Value>,
        fuzziness: &str,
    ) -> SearchResult<ResultCollection<H::Output>> {
        self.search(QueryDocument::fuzzy(field, value, fuzziness)).await
    }

    /// Documents with the given ids
    pub async fn ids<I, V>(&self, values: I) -> SearchResult<ResultCollection<H::Output>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.search(QueryDocument::ids(values)).await
    }

    /// `more_like_this` with default tuning
    pub async fn more_like_this<F, S, I, V>(
        &self,
        fields: F,
        ids: I,
    ) -> SearchResult<ResultCollection<H::Output>>
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.more_like_this_with(fields, ids, &MoreLikeThis::default())
            .await
    }

    pub async fn more_like_this_with<F, S, I, V>(
        &self,
        fields: F,
        ids: I,
        params: &MoreLikeThis,
    ) -> SearchResult<ResultCollection<H::Output>>
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.search(QueryDocument::more_like_this(fields, ids, params))
            .await
    }
}
