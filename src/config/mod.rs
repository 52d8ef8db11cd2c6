//! Configuration loading and management

use crate::core::clause::SortClause;
use crate::core::document::DEFAULT_SIZE;
use crate::core::error::{ConfigError, SearchResult};
use crate::core::query::QueryDefaults;
use crate::core::time::DEFAULT_TIME_ZONE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Connection and compilation settings
///
/// # Example
/// ```yaml
/// index: blog
/// hosts:
///   - http://localhost:9200
/// default_size: 50
/// default_sort:
///   - published_at: desc
/// timeout_secs: 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ElasticConfig {
    /// Index used by models that do not name their own
    #[validate(length(min = 1, message = "index name must not be empty"))]
    pub index: String,

    /// Backend hosts, `host:port` or full URLs
    pub hosts: Vec<String>,

    /// Page size when a query sets no limit
    #[validate(range(min = 1, message = "default_size must be at least 1"))]
    pub default_size: u64,

    /// Sort keys when a query sets no order
    pub default_sort: Vec<SortClause>,

    /// Time zone for time ranges without an explicit one
    #[validate(length(min = 1))]
    pub time_zone: String,

    /// Per-request timeout handed to the HTTP client
    pub timeout_secs: Option<u64>,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            index: "default".to_string(),
            hosts: vec!["localhost:9200".to_string()],
            default_size: DEFAULT_SIZE,
            default_sort: Vec::new(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            timeout_secs: None,
        }
    }
}

impl ElasticConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SearchResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), index = %config.index, "loaded search config");
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> SearchResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `ES_HOST`/`ES_PORT` and `ES_INDEX`
    pub fn from_env() -> SearchResult<Self> {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Overlay environment values read through `lookup`.
    ///
    /// `ES_HOST` and `ES_PORT` together replace the host list with the single
    /// host `ES_HOST:ES_PORT`; `ES_HOST` alone keeps its own port, if any.
    pub fn merge_env<F>(mut self, lookup: F) -> SearchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ES_HOST").filter(|h| !h.is_empty()) {
            let host = match lookup("ES_PORT").filter(|p| !p.is_empty()) {
                Some(port) => {
                    port.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                        field: "ES_PORT".to_string(),
                        message: format!("'{}' is not a valid port", port),
                    })?;
                    format!("{}:{}", host, port)
                }
                None => host,
            };
            self.hosts = vec![host];
        }

        if let Some(index) = lookup("ES_INDEX").filter(|i| !i.is_empty()) {
            self.index = index;
        }

        self.validate()?;
        Ok(self)
    }

    /// Compilation defaults derived from this configuration
    pub fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            size: self.default_size,
            sort: self.default_sort.clone(),
        }
    }
}
