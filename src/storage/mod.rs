//! Searcher implementations for different backends

pub mod http;
pub mod in_memory;

pub use http::HttpSearcher;
pub use in_memory::{ExecutedQuery, InMemorySearcher};
