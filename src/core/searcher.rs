//! Searcher trait: the seam between query compilation and the wire

use crate::core::document::QueryDocument;
use crate::core::error::SearchResult;
use crate::core::hydrate::RawResponse;
use async_trait::async_trait;
use std::fmt;

/// Index and document type a query runs against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTarget {
    pub index: String,

    /// Document type; empty for typeless indices
    pub doc_type: String,
}

impl SearchTarget {
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
        }
    }

    /// Target without a document type
    pub fn typeless(index: impl Into<String>) -> Self {
        Self::new(index, "")
    }

    /// URL path of this target, e.g. `blog/articles`
    pub fn path(&self) -> String {
        if self.doc_type.is_empty() {
            self.index.clone()
        } else {
            format!("{}/{}", self.index, self.doc_type)
        }
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Backend capable of running compiled documents.
///
/// Implementations own transport concerns (connections, timeouts). Their
/// errors are handed back to callers as-is; the builder never retries.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Run a search and return the raw hits
    async fn execute(
        &self,
        target: &SearchTarget,
        document: &QueryDocument,
    ) -> SearchResult<RawResponse>;

    /// Run a count-only request and return the reported total
    async fn count(&self, target: &SearchTarget, document: &QueryDocument) -> SearchResult<u64>;
}
