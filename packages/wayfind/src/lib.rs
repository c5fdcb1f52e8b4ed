//! Goal-Directed Web Search Library
//!
//! Searches a lazily-discovered graph of web pages for one that satisfies
//! a goal condition (a target phrase or topic description), expanding
//! pages best-first by a pluggable relevance estimate instead of
//! exhaustively.
//!
//! # Design
//!
//! - The search controller owns all state (visited set, parent map,
//!   frontier) as a single writer; the page fetch is the only suspension
//!   point.
//! - Scoring is a swappable strategy: lexical multi-factor, blended
//!   topic/phrase, or a pretrained text classifier injected as a
//!   dependency.
//! - Relevance is a heuristic estimate, not an admissible cost bound:
//!   the search finds *a* satisfying page, not provably the best one.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use wayfind::{
//!     BlendedScorer, FeatureWeights, HttpFetcher, SearchConfig, Searcher,
//! };
//!
//! let config = SearchConfig::new("https://cs.example.edu/", "alumni reunion 2025")
//!     .with_topic("alumni news and events")
//!     .with_max_pages(200);
//!
//! let fetcher = HttpFetcher::new(Duration::from_secs(5));
//! let scorer = BlendedScorer::new(
//!     "alumni news and events",
//!     "alumni reunion 2025",
//!     FeatureWeights::ANCHOR_HEAVY,
//! );
//!
//! let report = Searcher::new(fetcher, scorer, config).run().await?;
//! if let Some(path) = report.path {
//!     for step in path {
//!         println!("{step}");
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - [`search`] - The priority-driven search controller
//! - [`score`] - Relevance scorer variants
//! - [`fetch`] - Page fetching ([`PageFetcher`] trait + HTTP impl)
//! - [`goal`] - Goal detection with Arabic-aware normalization
//! - [`frontier`] - Priority container over discovered nodes
//! - [`urls`] / [`html`] - URL canonicalization and HTML processing
//! - [`graph`] - Offline search over a pre-crawled, materialized graph
//! - [`naive`] - Bounded depth-first fallback probe
//! - [`testing`] - Mock fetcher/classifier for tests

pub mod error;
pub mod fetch;
pub mod frontier;
pub mod goal;
pub mod graph;
pub mod html;
pub mod naive;
pub mod score;
pub mod search;
pub mod testing;
pub mod types;
pub mod urls;

// Re-export core types at crate root
pub use error::{
    ClassifierError, ClassifierResult, ConfigError, FetchError, FetchResult, GraphStoreError,
    SearchError, SearchResult,
};
pub use fetch::{HttpFetcher, PageFetcher};
pub use frontier::{Frontier, FrontierNode};
pub use goal::GoalMatcher;
pub use graph::{PageEdge, PageGraph, PageNode};
pub use score::{
    BayesArtifact, BlendedScorer, ClassifierScorer, FeatureWeights, LexicalScorer,
    RelevanceScorer, TextClassifier,
};
pub use search::Searcher;
pub use types::{
    AdmissionPolicy, LinkContext, Page, SearchConfig, SearchReport, Termination,
};
pub use urls::UrlScope;
