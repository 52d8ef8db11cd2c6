//! In-memory implementation of Searcher for testing and development
//!
//! Documents are kept per [`SearchTarget`] and compiled query documents are
//! evaluated directly against their `_source`. The subset of the DSL this
//! crate produces is supported:
//!
//! - `bool` with `must` / `must_not`
//! - `match` (token match on strings, equality otherwise)
//! - `wildcard` (`*` and `?`)
//! - `range` (`gt`, `gte`, `lt`, `lte` on numbers or strings)
//! - `ids`, `multi_match`, `fuzzy`, `match_all`
//!
//! Field names may use dots to reach nested objects. Every executed document
//! is recorded and can be inspected with [`InMemorySearcher::executed`].

use crate::core::document::QueryDocument;
use crate::core::error::{BackendError, SearchResult};
use crate::core::hydrate::{RawHit, RawResponse};
use crate::core::model::Attributes;
use crate::core::searcher::{SearchTarget, Searcher};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A document run through [`InMemorySearcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedQuery {
    pub target: SearchTarget,
    pub document: QueryDocument,
    pub count_only: bool,
}

/// In-memory searcher
///
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemorySearcher {
    documents: Arc<RwLock<HashMap<SearchTarget, Vec<RawHit>>>>,
    executed: Arc<RwLock<Vec<ExecutedQuery>>>,
}

impl InMemorySearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, replacing any previous one with the same id
    pub fn insert(
        &self,
        target: &SearchTarget,
        id: impl Into<String>,
        source: Attributes,
    ) -> SearchResult<()> {
        let id = id.into();
        let mut documents = self.documents.write().map_err(lock_error)?;
        let hits = documents.entry(target.clone()).or_default();

        let mut hit = RawHit::new(id.clone(), source);
        hit.index = Some(target.index.clone());
        if !target.doc_type.is_empty() {
            hit.doc_type = Some(target.doc_type.clone());
        }
        hit.version = Some(1);

        match hits.iter_mut().find(|h| h.id.as_deref() == Some(id.as_str())) {
            Some(existing) => {
                hit.version = existing.version.map(|v| v + 1);
                *existing = hit;
            }
            None => hits.push(hit),
        }

        Ok(())
    }

    /// Store a document given as a JSON object
    pub fn insert_json(
        &self,
        target: &SearchTarget,
        id: impl Into<String>,
        source: Value,
    ) -> SearchResult<()> {
        let source: Attributes = serde_json::from_value(source)?;
        self.insert(target, id, source)
    }

    /// Documents executed so far, oldest first
    pub fn executed(&self) -> SearchResult<Vec<ExecutedQuery>> {
        let executed = self.executed.read().map_err(lock_error)?;
        Ok(executed.clone())
    }

    /// The most recently executed document
    pub fn last_document(&self) -> SearchResult<Option<QueryDocument>> {
        let executed = self.executed.read().map_err(lock_error)?;
        Ok(executed.last().map(|e| e.document.clone()))
    }

    fn record(
        &self,
        target: &SearchTarget,
        document: &QueryDocument,
        count_only: bool,
    ) -> SearchResult<()> {
        let mut executed = self.executed.write().map_err(lock_error)?;
        executed.push(ExecutedQuery {
            target: target.clone(),
            document: document.clone(),
            count_only,
        });
        Ok(())
    }

    fn matching(&self, target: &SearchTarget, query: &Value) -> SearchResult<Vec<RawHit>> {
        let documents = self.documents.read().map_err(lock_error)?;
        let Some(hits) = documents.get(target) else {
            return Ok(Vec::new());
        };

        let mut matched = Vec::new();
        for hit in hits {
            if evaluate(query, hit)? {
                matched.push(hit.clone());
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl Searcher for InMemorySearcher {
    async fn execute(
        &self,
        target: &SearchTarget,
        document: &QueryDocument,
    ) -> SearchResult<RawResponse> {
        self.record(target, document, false)?;

        let mut hits = self.matching(target, &document.query)?;
        let total = hits.len() as u64;

        if let Some(sort) = &document.sort {
            hits.sort_by(|a, b| {
                for clause in sort {
                    let ordering = compare_missing_last(
                        lookup(&a.source, &clause.field),
                        lookup(&b.source, &clause.field),
                    );
                    let ordering = if clause.is_descending() {
                        ordering.reverse()
                    } else {
                        ordering
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        let from = document.from.unwrap_or(0) as usize;
        let size = document.size.unwrap_or(10) as usize;
        let hits: Vec<RawHit> = hits.into_iter().skip(from).take(size).collect();

        Ok(RawResponse {
            took: Some(0),
            timed_out: false,
            total: Some(total),
            max_score: None,
            hits,
        })
    }

    async fn count(&self, target: &SearchTarget, document: &QueryDocument) -> SearchResult<u64> {
        self.record(target, document, true)?;
        Ok(self.matching(target, &document.query)?.len() as u64)
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> BackendError {
    BackendError::Unavailable {
        message: format!("in-memory store lock poisoned: {}", e),
    }
}

fn unsupported(kind: &str) -> BackendError {
    BackendError::UnsupportedQuery {
        kind: kind.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn evaluate(query: &Value, hit: &RawHit) -> SearchResult<bool> {
    let Some((kind, body)) = query.as_object().and_then(|o| o.iter().next()) else {
        return Err(unsupported("empty query").into());
    };

    match kind.as_str() {
        "match_all" => Ok(true),
        "bool" => {
            for clause in clauses(body, "must") {
                if !evaluate(clause, hit)? {
                    return Ok(false);
                }
            }
            for clause in clauses(body, "must_not") {
                if evaluate(clause, hit)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        "match" => Ok(field_entries(body)
            .iter()
            .all(|(field, expected)| text_matches(lookup(&hit.source, field), expected))),
        "wildcard" => Ok(field_entries(body).iter().all(|(field, pattern)| {
            match (lookup(&hit.source, field), pattern.as_str()) {
                (Some(Value::String(s)), Some(p)) => wildcard_matches(p, s),
                (Some(other), Some(p)) if !other.is_null() => {
                    wildcard_matches(p, &other.to_string())
                }
                _ => false,
            }
        })),
        "range" => Ok(field_entries(body)
            .iter()
            .all(|(field, bounds)| range_matches(lookup(&hit.source, field), bounds))),
        "ids" => {
            let values = body.get("values").and_then(Value::as_array);
            Ok(values.is_some_and(|values| {
                values.iter().any(|v| {
                    let wanted = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    hit.id.as_deref() == Some(wanted.as_str())
                })
            }))
        }
        "multi_match" => {
            let expected = body.get("query").cloned().unwrap_or(Value::Null);
            let fields = body.get("fields").and_then(Value::as_array);
            Ok(fields.is_some_and(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|field| text_matches(lookup(&hit.source, field), &expected))
            }))
        }
        "fuzzy" => Ok(field_entries(body).iter().all(|(field, clause)| {
            let (value, fuzziness) = match clause {
                Value::Object(o) => (
                    o.get("value").and_then(Value::as_str).unwrap_or_default(),
                    o.get("fuzziness").cloned().unwrap_or(Value::Null),
                ),
                Value::String(s) => (s.as_str(), Value::Null),
                _ => ("", Value::Null),
            };
            fuzzy_matches(lookup(&hit.source, field), value, &fuzziness)
        })),
        other => Err(unsupported(other).into()),
    }
}

fn clauses<'a>(body: &'a Value, key: &str) -> Vec<&'a Value> {
    match body.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(_)) => body.get(key).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn field_entries(body: &Value) -> Vec<(&String, &Value)> {
    body.as_object()
        .map(|o| o.iter().collect())
        .unwrap_or_default()
}

/// Resolve a possibly dotted field path inside `_source`
fn lookup<'a>(source: &'a Attributes, field: &str) -> Option<&'a Value> {
    if let Some(value) = source.get(field) {
        return Some(value);
    }

    let mut parts = field.split('.');
    let mut current = source.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn text_matches(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (Some(Value::Array(items)), _) => items.iter().any(|item| text_matches(Some(item), expected)),
        (Some(Value::String(actual)), Value::String(expected)) => {
            let haystack = tokens(actual);
            tokens(expected).iter().any(|t| haystack.contains(t))
        }
        (Some(actual), expected) => compare(actual, expected) == Some(Ordering::Equal),
        (None, _) => false,
    }
}

fn range_matches(actual: Option<&Value>, bounds: &Value) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let Some(bounds) = bounds.as_object() else {
        return false;
    };

    bounds.iter().all(|(key, limit)| {
        let ordering = compare(actual, limit);
        match key.as_str() {
            "gt" => ordering == Some(Ordering::Greater),
            "gte" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            "lt" => ordering == Some(Ordering::Less),
            "lte" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            // time_zone, format, boost...
            _ => true,
        }
    })
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn compare_missing_last(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Glob match with `*` (any run) and `?` (any single char)
fn wildcard_matches(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|c| *c == '*')
}

fn fuzzy_matches(actual: Option<&Value>, expected: &str, fuzziness: &Value) -> bool {
    let Some(Value::String(actual)) = actual else {
        return false;
    };
    let expected = expected.to_lowercase();
    let auto = || match expected.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    };
    let max_edits = match fuzziness {
        Value::Number(n) => n.as_u64().map(|n| n as usize).unwrap_or_else(auto),
        Value::String(s) => s.parse::<usize>().unwrap_or_else(|_| auto()),
        _ => auto(),
    };

    tokens(actual)
        .iter()
        .any(|token| levenshtein(token, &expected) <= max_edits)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            current[j + 1] = (previous[j] + cost)
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        previous = current;
    }

    previous[b.len()]
}
