//! Typed error handling for elastic-model
//!
//! Every fallible operation in the crate returns a [`SearchError`]. Each
//! variant wraps a more specific error type for its category so callers can
//! match precisely instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`QueryError`]: caller mistakes detected while building a query
//! - [`BackendError`]: failures reported by a [`Searcher`](crate::core::Searcher)
//! - [`HydrationError`]: a model refused the attributes of a hit
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! use elastic_model::prelude::*;
//!
//! match articles.query().where_("age", "~", 30) {
//!     Err(SearchError::Query(QueryError::InvalidOperator { operator })) => {
//!         eprintln!("bad operator: {}", operator);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//!     Ok(builder) => { /* ... */ }
//! }
//! ```

use reqwest::StatusCode;
use std::fmt;

/// The main error type for elastic-model
#[derive(Debug)]
pub enum SearchError {
    /// Invalid query construction (raised before any network call)
    Query(QueryError),

    /// Errors surfaced by the search backend
    Backend(BackendError),

    /// Errors while turning a hit into a model
    Hydration(HydrationError),

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Query(e) => write!(f, "{}", e),
            SearchError::Backend(e) => write!(f, "{}", e),
            SearchError::Hydration(e) => write!(f, "{}", e),
            SearchError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Query(e) => Some(e),
            SearchError::Backend(e) => Some(e),
            SearchError::Hydration(e) => Some(e),
            SearchError::Config(e) => Some(e),
        }
    }
}

impl SearchError {
    /// Get the HTTP status code associated with this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Query(e) => e.status_code(),
            SearchError::Backend(e) => e.status_code(),
            SearchError::Hydration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SearchError::Query(e) => e.error_code(),
            SearchError::Backend(e) => e.error_code(),
            SearchError::Hydration(_) => "HYDRATION_ERROR",
            SearchError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the error was raised locally, before the backend was contacted
    pub fn is_local(&self) -> bool {
        !matches!(self, SearchError::Backend(_))
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while building a query
#[derive(Debug)]
pub enum QueryError {
    /// Operator string is not part of the supported set
    InvalidOperator { operator: String },

    /// A time bound could not be parsed as a date or timestamp
    InvalidTimeBound { field: String, value: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidOperator { operator } => {
                write!(f, "Invalid operator '{}' in where search", operator)
            }
            QueryError::InvalidTimeBound { field, value } => {
                write!(f, "Invalid time bound '{}' for field '{}'", value, field)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Operator mistakes are programming errors, reported as 500
            QueryError::InvalidOperator { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::InvalidTimeBound { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::InvalidOperator { .. } => "INVALID_OPERATOR",
            QueryError::InvalidTimeBound { .. } => "INVALID_TIME_BOUND",
        }
    }
}

impl From<QueryError> for SearchError {
    fn from(err: QueryError) -> Self {
        SearchError::Query(err)
    }
}

// =============================================================================
// Backend Errors
// =============================================================================

/// Errors reported by a search backend
#[derive(Debug)]
pub enum BackendError {
    /// The request never reached the backend or the connection broke
    Transport { host: String, message: String },

    /// The backend answered with a non-success status
    Rejected { status: u16, body: String },

    /// The backend answered with a body that could not be decoded
    InvalidResponse { message: String },

    /// The backend cannot evaluate this kind of query
    UnsupportedQuery { kind: String },

    /// No backend host is configured or reachable
    Unavailable { message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport { host, message } => {
                write!(f, "Failed to reach search backend at {}: {}", host, message)
            }
            BackendError::Rejected { status, body } => {
                write!(f, "Search backend rejected the request ({}): {}", status, body)
            }
            BackendError::InvalidResponse { message } => {
                write!(f, "Invalid search backend response: {}", message)
            }
            BackendError::UnsupportedQuery { kind } => {
                write!(f, "Unsupported query kind: {}", kind)
            }
            BackendError::Unavailable { message } => {
                write!(f, "Search backend unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

impl BackendError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BackendError::Transport { .. } => StatusCode::BAD_GATEWAY,
            BackendError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            BackendError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            BackendError::UnsupportedQuery { .. } => StatusCode::BAD_REQUEST,
            BackendError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BackendError::Transport { .. } => "BACKEND_TRANSPORT_ERROR",
            BackendError::Rejected { .. } => "BACKEND_REJECTED",
            BackendError::InvalidResponse { .. } => "BACKEND_INVALID_RESPONSE",
            BackendError::UnsupportedQuery { .. } => "UNSUPPORTED_QUERY",
            BackendError::Unavailable { .. } => "BACKEND_UNAVAILABLE",
        }
    }
}

impl From<BackendError> for SearchError {
    fn from(err: BackendError) -> Self {
        SearchError::Backend(err)
    }
}

// =============================================================================
// Hydration Errors
// =============================================================================

/// Errors raised while hydrating a hit into a model
#[derive(Debug)]
pub enum HydrationError {
    /// The model rejected the `_source` attributes
    Attributes {
        table: String,
        id: Option<String>,
        message: String,
    },
}

impl fmt::Display for HydrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydrationError::Attributes { table, id, message } => match id {
                Some(id) => write!(f, "Failed to hydrate {} '{}': {}", table, id, message),
                None => write!(f, "Failed to hydrate {}: {}", table, message),
            },
        }
    }
}

impl std::error::Error for HydrationError {}

impl From<HydrationError> for SearchError {
    fn from(err: HydrationError) -> Self {
        SearchError::Hydration(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue { field: String, message: String },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid value for field '{}': {}", field, message)
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for SearchError {
    fn from(err: ConfigError) -> Self {
        SearchError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Backend(BackendError::InvalidResponse {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for SearchError {
    fn from(err: serde_yaml::Error) -> Self {
        SearchError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for SearchError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_default();
        SearchError::Config(ConfigError::InvalidValue {
            field,
            message: err.to_string(),
        })
    }
}

/// Model implementations report attribute failures through anyhow
impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        SearchError::Hydration(HydrationError::Attributes {
            table: "unknown".to_string(),
            id: None,
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for elastic-model operations
pub type SearchResult<T> = Result<T, SearchError>;
