//! Macro-generated test suite validating a `Searcher` end to end through the
//! query builder.
//!
//! The `searcher_contract_tests!` macro generates a test module that runs the
//! fluent builder and the canned queries against any `Searcher` seeded with
//! [`sample_articles`](super::sample_articles).
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod search_harness;
//!
//! use search_harness::*;
//!
//! searcher_contract_tests!(seeded_in_memory());
//! ```
//!
//! # Generated Tests
//!
//! ## Filters
//! - `test_match_filter` — `=` keeps equal values
//! - `test_negated_match` — `!=` moves the clause to `must_not`
//! - `test_greater_than_is_inverted` — `>` compiles to `lt`
//! - `test_less_or_equal_is_inverted` — `<=` compiles to `gte`
//! - `test_like_wildcard` — `like` with `%` and its negation
//! - `test_two_argument_form` — `where_eq` and the `null` value shorthand
//! - `test_where_between` / `test_where_time_between` / `test_open_time_bound`
//!
//! ## Paging and Sorting
//! - `test_limit_and_offset`, `test_default_offset_skips_first_hit`
//! - `test_multiple_sort_keys`, `test_count_ignores_paging`
//!
//! ## Canned Queries
//! - `test_ids_hydrates_meta`, `test_multi_match`, `test_fuzzy`, `test_ids_keys`

/// Generate a `Searcher` conformance test suite.
///
/// `$factory` must evaluate to a `Searcher + 'static` already holding the
/// sample articles under the default target. It is re-evaluated for each
/// test to ensure isolation.
macro_rules! searcher_contract_tests {
    ($factory:expr) => {
        mod searcher_contract {
            use super::*;
            use elastic_model::core::error::{QueryError, SearchError};
            use elastic_model::prelude::*;
            use std::sync::Arc;

            fn index() -> SearchIndex<ModelHydrator<Article>> {
                article_index(Arc::new($factory))
            }

            // ==================================================================
            // Filters
            // ==================================================================

            #[tokio::test]
            async fn test_match_filter() {
                let index = index();

                let total = index
                    .query()
                    .where_("status", "=", "published")
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 3);

                let results = index
                    .query()
                    .where_("status", "=", "published")
                    .unwrap()
                    .order("id", "asc")
                    .get()
                    .await
                    .unwrap();
                assert_eq!(results.total(), Some(3));
            }

            #[tokio::test]
            async fn test_negated_match() {
                let total = index()
                    .query()
                    .where_("status", "!=", "published")
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 2);
            }

            #[tokio::test]
            async fn test_greater_than_is_inverted() {
                // `>` compiles to `lt`, so this keeps views below 1000
                let total = index()
                    .query()
                    .where_("views", ">", 1000)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 4);

                let negated = index()
                    .query()
                    .where_("views", "!>", 1000)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(negated, 1);
            }

            #[tokio::test]
            async fn test_less_or_equal_is_inverted() {
                let total = index()
                    .query()
                    .where_("views", "<=", 300)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 3);
            }

            #[tokio::test]
            async fn test_like_wildcard() {
                let index = index();

                let matching = index
                    .query()
                    .where_("title", "like", "%Rust%")
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(matching, 3);

                let others = index
                    .query()
                    .where_("title", "!like", "%Rust%")
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(others, 2);
            }

            #[tokio::test]
            async fn test_two_argument_form() {
                let index = index();

                let by_eq = index.query().where_eq("author", "alice").count().await.unwrap();
                assert_eq!(by_eq, 2);

                let by_null = index
                    .query()
                    .where_("author", "bob", Value::Null)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(by_null, 2);
            }

            #[tokio::test]
            async fn test_filters_combine() {
                let total = index()
                    .query()
                    .where_("status", "=", "published")
                    .unwrap()
                    .where_("views", ">", 1000)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 2);
            }

            #[tokio::test]
            async fn test_where_between() {
                let total = index()
                    .query()
                    .where_between("views", 100, 1000, None)
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 2);
            }

            #[tokio::test]
            async fn test_where_time_between() {
                let total = index()
                    .query()
                    .where_time_between("published_at", "2024-01-01", "2024-01-31", None)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 2);
            }

            #[tokio::test]
            async fn test_open_time_bound() {
                let total = index()
                    .query()
                    .where_time_between("published_at", "", "2024-01-01", None)
                    .unwrap()
                    .count()
                    .await
                    .unwrap();
                assert_eq!(total, 1);
            }

            #[tokio::test]
            async fn test_no_match() {
                let results = index()
                    .query()
                    .where_("status", "=", "deleted")
                    .unwrap()
                    .get()
                    .await
                    .unwrap();
                assert!(results.is_empty());
                assert_eq!(results.total(), Some(0));
            }

            #[tokio::test]
            async fn test_invalid_operator_fails_before_search() {
                let err = index().query().where_("views", "~", 1).err().unwrap();
                assert!(matches!(
                    err,
                    SearchError::Query(QueryError::InvalidOperator { ref operator }) if operator == "~"
                ));
            }

            // ==================================================================
            // Paging and Sorting
            // ==================================================================

            #[tokio::test]
            async fn test_limit_and_offset() {
                let results = index()
                    .query()
                    .order("views", "desc")
                    .limit(2)
                    .offset(1)
                    .get()
                    .await
                    .unwrap();
                assert_eq!(results.total(), Some(5));
                assert_eq!(ids_of(results), vec![5, 4]);
            }

            #[tokio::test]
            async fn test_default_offset_skips_first_hit() {
                let results = index().query().order("id", "asc").get().await.unwrap();
                assert_eq!(results.total(), Some(5));
                assert_eq!(ids_of(results), vec![2, 3, 4, 5]);
            }

            #[tokio::test]
            async fn test_multiple_sort_keys() {
                let results = index()
                    .query()
                    .order("status", "asc")
                    .order("views", "desc")
                    .get()
                    .await
                    .unwrap();
                assert_eq!(ids_of(results), vec![3, 2, 4, 1]);
            }

            #[tokio::test]
            async fn test_count_ignores_paging() {
                let total = index().query().limit(1).offset(3).count().await.unwrap();
                assert_eq!(total, 5);
            }

            // ==================================================================
            // Canned Queries
            // ==================================================================

            #[tokio::test]
            async fn test_ids_hydrates_meta() {
                let results = index().ids(["2"]).await.unwrap();
                assert_eq!(results.len(), 1);

                let doc = results.into_iter().next().unwrap();
                assert_eq!(doc.id, 2);
                assert_eq!(doc.title, "Async Rust in practice");
                assert_eq!(doc.meta.id.as_deref(), Some("2"));
                assert_eq!(doc.version(), Some(1));
                assert!(doc.meta.highlighted.is_empty());
            }

            #[tokio::test]
            async fn test_multi_match() {
                let results = index().multi_match(["title", "author"], "alice").await.unwrap();
                let mut ids = ids_of(results);
                ids.sort();
                assert_eq!(ids, vec![1, 3]);
            }

            #[tokio::test]
            async fn test_fuzzy() {
                let results = index().fuzzy("author", "alise").await.unwrap();
                assert_eq!(results.total(), Some(2));

                let exact = index().fuzzy_with("author", "alise", "0").await.unwrap();
                assert!(exact.is_empty());
            }

            #[tokio::test]
            async fn test_ids_keys() {
                let results = index().ids(["2", "4"]).await.unwrap();
                assert_eq!(results.keys(), vec![json!(2), json!(4)]);
            }
        }
    };
}
