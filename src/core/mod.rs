//! Core module containing the query model, hydration and the backend seam

pub mod clause;
pub mod document;
pub mod error;
pub mod hydrate;
pub mod index;
pub mod model;
pub mod operator;
pub mod query;
pub mod searcher;
pub mod time;

pub use clause::{ClauseKind, FilterClause, RangeBound, SortClause};
pub use document::{MoreLikeThis, QueryDocument};
pub use error::{
    BackendError, ConfigError, HydrationError, QueryError, SearchError, SearchResult,
};
pub use hydrate::{Hydrator, ModelHydrator, RawHit, RawHydrator, RawResponse, ResultCollection};
pub use index::SearchIndex;
pub use model::{Attributes, Document, DocumentMeta, Model};
pub use operator::{Operator, ParsedOperator, Polarity};
pub use query::{QueryBuilder, QueryDefaults, QueryState};
pub use searcher::{SearchTarget, Searcher};
