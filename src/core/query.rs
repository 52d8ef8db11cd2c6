//! Fluent query builder
//!
//! A [`QueryBuilder`] accumulates filters, sort keys and paging for one query,
//! then compiles them into a [`QueryDocument`] when [`get`](QueryBuilder::get)
//! is called.
//!
//! # Example
//! ```rust,ignore
//! let recent = articles
//!     .query()
//!     .where_("views", "<", 100)?
//!     .where_("status", "!=", "draft")?
//!     .where_("title", "like", "%rust%")?
//!     .where_time_between("published_at", "2024-01-01", "2024-02-01", None)?
//!     .order("published_at", "desc")
//!     .limit(20)
//!     .get()
//!     .await?;
//! ```
//!
//! Builders are single-owner values: each chained call consumes the builder
//! and hands it back.

use crate::core::clause::{FilterClause, RangeBound, SortClause};
use crate::core::document::{DEFAULT_FROM, DEFAULT_SIZE, QueryDocument};
use crate::core::error::{QueryError, SearchResult};
use crate::core::hydrate::{Hydrator, ResultCollection};
use crate::core::index::SearchIndex;
use crate::core::operator::{Operator, ParsedOperator, Polarity};
use crate::core::time::{self, DEFAULT_TIME_ZONE};
use serde_json::{Map, Value, json};

/// Compilation defaults of one index
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDefaults {
    /// Page size when no limit is set
    pub size: u64,

    /// Sort keys when no order is set
    pub sort: Vec<SortClause>,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            sort: Vec::new(),
        }
    }
}

/// Accumulated state of a query under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    must: Vec<FilterClause>,
    must_not: Vec<FilterClause>,
    sort: Vec<SortClause>,
    size: Option<u64>,
    from: Option<u64>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a clause under its polarity
    pub fn push(&mut self, clause: FilterClause) {
        match clause.polarity() {
            Polarity::Must => self.must.push(clause),
            Polarity::MustNot => self.must_not.push(clause),
        }
    }

    pub fn push_sort(&mut self, sort: SortClause) {
        self.sort.push(sort);
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = Some(size);
    }

    pub fn set_from(&mut self, from: u64) {
        self.from = Some(from);
    }

    pub fn must(&self) -> &[FilterClause] {
        &self.must
    }

    pub fn must_not(&self) -> &[FilterClause] {
        &self.must_not
    }

    pub fn sort(&self) -> &[SortClause] {
        &self.sort
    }

    /// Compile into a backend document.
    ///
    /// - `must` is always emitted, `must_not` only when it has clauses
    /// - sort falls back to the defaults, then to an empty list
    /// - a size or offset of 0 counts as unset
    pub fn compile(&self, defaults: &QueryDefaults) -> QueryDocument {
        let mut bool_query = Map::new();
        bool_query.insert(
            Polarity::Must.as_str().to_string(),
            Value::Array(self.must.iter().map(FilterClause::to_value).collect()),
        );
        if !self.must_not.is_empty() {
            bool_query.insert(
                Polarity::MustNot.as_str().to_string(),
                Value::Array(self.must_not.iter().map(FilterClause::to_value).collect()),
            );
        }

        let sort = if !self.sort.is_empty() {
            self.sort.clone()
        } else {
            defaults.sort.clone()
        };

        let default_size = if defaults.size > 0 {
            defaults.size
        } else {
            DEFAULT_SIZE
        };

        QueryDocument {
            query: json!({ "bool": Value::Object(bool_query) }),
            sort: Some(sort),
            size: Some(self.size.filter(|n| *n > 0).unwrap_or(default_size)),
            from: Some(self.from.filter(|n| *n > 0).unwrap_or(DEFAULT_FROM)),
        }
    }
}

/// Builder for one query against a [`SearchIndex`]
pub struct QueryBuilder<'a, H> {
    index: &'a SearchIndex<H>,
    state: QueryState,
}

impl<'a, H: Hydrator> QueryBuilder<'a, H> {
    pub fn new(index: &'a SearchIndex<H>) -> Self {
        Self {
            index,
            state: QueryState::new(),
        }
    }

    /// Add a predicate.
    ///
    /// `operator` is one of `>`, `>=`, `<`, `<=`, `=`, `like`, optionally
    /// prefixed with `!` to negate it. Range operators compile inverted:
    /// `>` becomes `lt`, `<=` becomes `gte`. `like` uses `%` as wildcard.
    ///
    /// A `null` value selects the two-argument form: `operator` is then the
    /// value to match, exactly like [`where_eq`](Self::where_eq).
    ///
    /// # Errors
    /// [`QueryError::InvalidOperator`] for any other operator string.
    pub fn where_(
        mut self,
        field: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> SearchResult<Self> {
        let field = field.into();
        let value = value.into();

        if value.is_null() {
            return Ok(self.where_eq(field, operator));
        }

        let ParsedOperator { operator, polarity } = operator.parse()?;

        let clause = match operator {
            Operator::Match => FilterClause::matching(field, polarity, value),
            Operator::Wildcard => FilterClause::wildcard(field, polarity, &value),
            range => {
                let bound = RangeBound::for_operator(range).ok_or_else(|| {
                    QueryError::InvalidOperator {
                        operator: range.to_string(),
                    }
                })?;
                FilterClause::range(field, polarity, vec![(bound, value)], Map::new())
            }
        };

        tracing::trace!(field = clause.field(), polarity = polarity.as_str(), "where clause added");
        self.state.push(clause);
        Ok(self)
    }

    /// Exact match shorthand, always in `must`
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state
            .push(FilterClause::matching(field, Polarity::Must, value.into()));
        self
    }

    /// Inclusive range `low..=high`, merged with `options` (e.g. `time_zone`)
    pub fn where_between(
        mut self,
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
        options: Option<Map<String, Value>>,
    ) -> Self {
        self.state.push(FilterClause::range(
            field,
            Polarity::Must,
            vec![(RangeBound::Gte, low.into()), (RangeBound::Lte, high.into())],
            options.unwrap_or_default(),
        ));
        self
    }

    /// Inclusive time range.
    ///
    /// Non-empty bounds are rewritten as `YYYY-MM-DDTHH:mm:ss`; empty bounds
    /// leave that side of the range open. `time_zone` defaults to `+08:00`.
    ///
    /// # Errors
    /// [`QueryError::InvalidTimeBound`] when a bound is not a readable time.
    pub fn where_time_between(
        self,
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
        options: Option<Map<String, Value>>,
    ) -> SearchResult<Self> {
        let field = field.into();
        let mut options = options.unwrap_or_default();
        if !options.contains_key("time_zone") {
            options.insert("time_zone".to_string(), json!(DEFAULT_TIME_ZONE));
        }
        let time_zone = options
            .get("time_zone")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TIME_ZONE)
            .to_string();

        let normalize = |raw: Value| {
            time::normalize_bound(&raw, &time_zone).ok_or_else(|| QueryError::InvalidTimeBound {
                field: field.clone(),
                value: match &raw {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
        };
        let low = normalize(low.into())?;
        let high = normalize(high.into())?;

        Ok(self.where_between(field, low, high, Some(options)))
    }

    /// Append a sort key; earlier keys take precedence
    pub fn order(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.state.push_sort(SortClause::new(field, direction));
        self
    }

    /// Page size; the last call wins
    pub fn limit(mut self, size: u64) -> Self {
        self.state.set_size(size);
        self
    }

    /// Page offset; the last call wins
    pub fn offset(mut self, from: u64) -> Self {
        self.state.set_from(from);
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Compile the accumulated state without executing it
    pub fn build_query(&self) -> QueryDocument {
        self.state.compile(self.index.defaults())
    }

    /// Compile, execute and hydrate
    pub async fn get(self) -> SearchResult<ResultCollection<H::Output>> {
        let document = self.build_query();
        self.index.search(document).await
    }

    /// Compile and run through the count-only path
    pub async fn count(self) -> SearchResult<u64> {
        let document = self.build_query();
        self.index.count(document).await
    }
}
