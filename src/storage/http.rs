//! HTTP searcher talking to an Elasticsearch-compatible REST endpoint
//!
//! Documents are POSTed as JSON to `{host}/{index}/{type}/_search` (or
//! `_count`); the type segment is left out for typeless targets. Hosts are
//! used round-robin. Failures are reported once, never retried.
//!
//! Count requests carry only the `query` part of the document; the count API
//! rejects paging and sort keys.

use crate::config::ElasticConfig;
use crate::core::document::QueryDocument;
use crate::core::error::{BackendError, SearchResult};
use crate::core::hydrate::RawResponse;
use crate::core::searcher::{SearchTarget, Searcher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Header carrying a per-request id, echoed in the backend's slow logs
pub const OPAQUE_ID_HEADER: &str = "X-Opaque-Id";

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

/// Searcher backed by `reqwest`
#[derive(Debug)]
pub struct HttpSearcher {
    client: reqwest::Client,
    hosts: Vec<String>,
    next_host: AtomicUsize,
}

impl HttpSearcher {
    /// Create a searcher for the given hosts.
    ///
    /// Hosts without a scheme get `http://`; trailing slashes are dropped.
    pub fn new<I, S>(hosts: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_client(hosts, reqwest::Client::new())
    }

    /// Create a searcher using a preconfigured client
    pub fn with_client<I, S>(hosts: I, client: reqwest::Client) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts: Vec<String> = hosts
            .into_iter()
            .map(|h| normalize_host(h.as_ref()))
            .filter(|h| !h.is_empty())
            .collect();

        if hosts.is_empty() {
            return Err(BackendError::Unavailable {
                message: "no hosts configured".to_string(),
            }
            .into());
        }

        Ok(Self {
            client,
            hosts,
            next_host: AtomicUsize::new(0),
        })
    }

    /// Create a searcher from configuration, honoring `timeout_secs`
    pub fn from_config(config: &ElasticConfig) -> SearchResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs.max(1)));
        }
        let client = builder.build().map_err(|e| BackendError::Unavailable {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Self::with_client(&config.hosts, client)
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    fn pick_host(&self) -> &str {
        let i = self.next_host.fetch_add(1, Ordering::Relaxed) % self.hosts.len();
        &self.hosts[i]
    }

    async fn post<B>(&self, target: &SearchTarget, action: &str, body: &B) -> SearchResult<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let host = self.pick_host();
        let url = format!("{}/{}/{}", host, target.path(), action);
        let opaque_id = Uuid::new_v4().to_string();

        tracing::debug!(url = %url, opaque_id = %opaque_id, "sending search request");

        let response = self
            .client
            .post(&url)
            .header(OPAQUE_ID_HEADER, &opaque_id)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport {
                host: host.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                url = %url,
                opaque_id = %opaque_id,
                status = status.as_u16(),
                "search backend rejected request"
            );
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| {
                BackendError::InvalidResponse {
                    message: e.to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl Searcher for HttpSearcher {
    async fn execute(
        &self,
        target: &SearchTarget,
        document: &QueryDocument,
    ) -> SearchResult<RawResponse> {
        let body = self.post(target, "_search", document).await?;
        RawResponse::from_value(body)
    }

    async fn count(&self, target: &SearchTarget, document: &QueryDocument) -> SearchResult<u64> {
        let body = self
            .post(target, "_count", &json!({ "query": document.query }))
            .await?;
        let parsed: CountResponse = serde_json::from_value(body)?;
        Ok(parsed.count)
    }
}

fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("localhost:9200"), "http://localhost:9200");
        assert_eq!(normalize_host("https://es.example.com/"), "https://es.example.com");
        assert_eq!(normalize_host("  "), "");
    }

    #[test]
    fn test_requires_a_host() {
        let err = HttpSearcher::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err.error_code(), "BACKEND_UNAVAILABLE");
    }

    #[test]
    fn test_round_robin() {
        let searcher = HttpSearcher::new(["a:9200", "b:9200"]).unwrap();
        assert_eq!(searcher.pick_host(), "http://a:9200");
        assert_eq!(searcher.pick_host(), "http://b:9200");
        assert_eq!(searcher.pick_host(), "http://a:9200");
    }
}
