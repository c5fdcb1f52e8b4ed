//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Policy for admitting child links when a page has more candidates than
/// `max_children_per_page`.
///
/// The two policies produce different frontiers whenever the cap binds, so
/// callers (and tests) must pin which one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionPolicy {
    /// Admit candidates in page order until the cap is reached
    Streaming,

    /// Score every surviving candidate first, then admit the top-K by
    /// score (stable order on ties)
    RankThenCap,
}

/// Configuration for a goal-directed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Seed URL anchoring the search
    pub seed: String,

    /// Target phrase the goal detector looks for in page text
    pub target_phrase: String,

    /// Optional topic description; when present, lexical scoring blends
    /// topic and phrase scores
    pub topic_description: Option<String>,

    /// Domain restriction; derived from the seed URL's host when absent
    pub base_domain: Option<String>,

    /// Maximum number of pages charged against the budget
    pub max_pages: usize,

    /// Maximum admitted child links per expanded page
    pub max_children_per_page: usize,

    /// Per-request fetch timeout
    pub timeout: Duration,

    /// Depth-proportional bias subtracted per level; a tunable bias, not a
    /// path cost
    pub depth_penalty_per_level: f64,

    /// Child admission policy when the cap binds
    pub admission: AdmissionPolicy,

    /// Optional fixed delay between fetches (politeness)
    pub fetch_delay: Option<Duration>,

    /// Optional wall-clock budget for the whole search
    pub max_elapsed: Option<Duration>,

    /// Number of in-flight fetches (1 = strictly sequential loop)
    pub fetch_concurrency: usize,

    /// Whether a failed fetch still consumes a unit of the page budget
    pub count_failed_fetches: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            target_phrase: String::new(),
            topic_description: None,
            base_domain: None,
            max_pages: 200,
            max_children_per_page: 100,
            timeout: Duration::from_secs(5),
            depth_penalty_per_level: 75.0,
            admission: AdmissionPolicy::Streaming,
            fetch_delay: None,
            max_elapsed: None,
            fetch_concurrency: 1,
            count_failed_fetches: true,
        }
    }
}

impl SearchConfig {
    /// Create a config for a seed URL and target phrase.
    pub fn new(seed: impl Into<String>, target_phrase: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            target_phrase: target_phrase.into(),
            ..Default::default()
        }
    }

    /// Set the topic description used for blended lexical scoring.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic_description = Some(topic.into());
        self
    }

    /// Override the base domain restriction.
    pub fn with_base_domain(mut self, domain: impl Into<String>) -> Self {
        self.base_domain = Some(domain.into());
        self
    }

    /// Set the page budget.
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }

    /// Set the child admission cap.
    pub fn with_max_children(mut self, max: usize) -> Self {
        self.max_children_per_page = max;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-level depth penalty.
    pub fn with_depth_penalty(mut self, penalty: f64) -> Self {
        self.depth_penalty_per_level = penalty;
        self
    }

    /// Set the child admission policy.
    pub fn with_admission(mut self, policy: AdmissionPolicy) -> Self {
        self.admission = policy;
        self
    }

    /// Set a fixed delay between fetches.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Set a wall-clock budget for the whole search.
    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(budget);
        self
    }

    /// Set the number of in-flight fetches.
    pub fn with_fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n;
        self
    }

    /// Choose whether failed fetches consume page budget.
    pub fn count_failed_fetches(mut self, count: bool) -> Self {
        self.count_failed_fetches = count;
        self
    }

    /// Validate the configuration and return the parsed seed URL.
    ///
    /// Fatal at startup: an invalid seed or empty target phrase means the
    /// search never begins.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let seed = Url::parse(self.seed.trim()).map_err(|_| ConfigError::InvalidSeedUrl {
            url: self.seed.clone(),
        })?;

        if !matches!(seed.scheme(), "http" | "https") || seed.host_str().is_none() {
            return Err(ConfigError::InvalidSeedUrl {
                url: self.seed.clone(),
            });
        }

        if self.target_phrase.trim().is_empty() {
            return Err(ConfigError::EmptyTargetPhrase);
        }

        if self.max_pages == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_pages",
                reason: "must be at least 1".into(),
            });
        }

        if self.fetch_concurrency == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "fetch_concurrency",
                reason: "must be at least 1".into(),
            });
        }

        if !self.depth_penalty_per_level.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "depth_penalty_per_level",
                reason: "must be finite".into(),
            });
        }

        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_pages, 200);
        assert_eq!(config.max_children_per_page, 100);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.depth_penalty_per_level, 75.0);
        assert_eq!(config.admission, AdmissionPolicy::Streaming);
        assert!(config.count_failed_fetches);
    }

    #[test]
    fn test_validate_rejects_bad_seed() {
        let config = SearchConfig::new("not a url", "phrase");
        assert!(config.validate().is_err());

        let config = SearchConfig::new("ftp://example.com/", "phrase");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_phrase() {
        let config = SearchConfig::new("https://example.com/", "   ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyTargetPhrase)
        ));
    }

    #[test]
    fn test_validate_ok() {
        let config = SearchConfig::new("https://example.com/", "alumni news")
            .with_max_pages(30)
            .with_admission(AdmissionPolicy::RankThenCap);
        let seed = config.validate().unwrap();
        assert_eq!(seed.host_str(), Some("example.com"));
    }
}
