//! Typed errors for the wayfind library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Each error family has its
//! own enum and `Result` alias; the search controller is the only place
//! where collaborator failures are turned into control-flow decisions.

use thiserror::Error;

/// Errors raised while fetching a single page.
///
/// Fetch errors are node-scoped and recoverable: the controller logs the
/// failure and moves on to the next frontier node. The one exception is
/// the seed page, whose fetch failure aborts the whole search.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request exceeded the configured per-request timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Connection-level failure (refused, reset, DNS, TLS)
    #[error("connection failed for {url}: {reason}")]
    Connection { url: String, reason: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response body could not be decoded or processed
    #[error("failed to parse page at {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Errors raised by a classifier collaborator.
///
/// These never leave the scorer: the classifier-based scorer maps any
/// failure to a zero score with a logged diagnostic.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The persisted artifact could not be read or deserialized
    #[error("failed to load classifier artifact: {0}")]
    Artifact(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Prediction failed for the given input
    #[error("prediction failed: {reason}")]
    Prediction { reason: String },
}

/// Errors raised while persisting or loading an offline page graph.
#[derive(Debug, Error)]
pub enum GraphStoreError {
    /// The file could not be read or written
    #[error("graph store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serialized graph could not be encoded or decoded
    #[error("graph store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Configuration errors, fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The seed URL could not be parsed as an absolute http(s) URL
    #[error("invalid seed URL: {url}")]
    InvalidSeedUrl { url: String },

    /// The goal phrase is empty or whitespace-only
    #[error("target phrase must not be empty")]
    EmptyTargetPhrase,

    /// A numeric parameter is outside its valid range
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Errors returned by a search run.
///
/// Everything else that goes wrong mid-search (unreachable pages, scorer
/// failures) is absorbed by the per-node failure policy and reported only
/// through the final [`SearchReport`](crate::SearchReport).
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search was misconfigured and never began
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The seed page could not be fetched, so no frontier could be seeded
    #[error("seed page unreachable: {0}")]
    SeedUnreachable(#[source] FetchError),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for classifier collaborators.
pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

/// Result type alias for search runs.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
