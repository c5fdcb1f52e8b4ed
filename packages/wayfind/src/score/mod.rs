//! Relevance scoring for candidate links.
//!
//! Scorers estimate how promising a link is from its local context alone.
//! The search loop is generic over [`RelevanceScorer`], so lexical and
//! classifier-based variants (or anything else) swap in without touching
//! the loop.

pub mod artifact;
pub mod classifier;
pub mod lexical;

pub use artifact::BayesArtifact;
pub use classifier::{ClassifierScorer, TextClassifier};
pub use lexical::{tokenize, BlendedScorer, LexicalScorer};

use crate::types::LinkContext;

/// Capability: turn a link's local context into a relevance value.
///
/// Implementations must be pure functions of their input: deterministic,
/// and never failing; a scorer that cannot produce a value returns 0.
pub trait RelevanceScorer: Send + Sync {
    /// Score one link.
    ///
    /// `page_links` is every link on the page (the scored link included),
    /// used for sibling evidence; `page_body` is the page's visible text
    /// when available.
    fn score(&self, link: &LinkContext, page_links: &[LinkContext], page_body: Option<&str>)
        -> f64;
}

impl<S: RelevanceScorer + ?Sized> RelevanceScorer for &S {
    fn score(
        &self,
        link: &LinkContext,
        page_links: &[LinkContext],
        page_body: Option<&str>,
    ) -> f64 {
        (**self).score(link, page_links, page_body)
    }
}

impl<S: RelevanceScorer + ?Sized> RelevanceScorer for Box<S> {
    fn score(
        &self,
        link: &LinkContext,
        page_links: &[LinkContext],
        page_body: Option<&str>,
    ) -> f64 {
        (**self).score(link, page_links, page_body)
    }
}

/// Weights over the four lexical features.
///
/// Neither named preset is canonical; pick one explicitly or supply a
/// custom vector.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureWeights {
    /// Occurrences in the anchor's own text
    pub link_text: f64,

    /// Occurrences in the enclosing paragraph/block text
    pub paragraph: f64,

    /// Occurrences in the full page body (feature skipped when 0)
    pub body: f64,

    /// Sibling links on the same page containing any keyword
    pub siblings: f64,
}

impl FeatureWeights {
    /// `{4, 2, 0, 1}`: anchor-weighted, no body term.
    pub const ANCHOR_HEAVY: Self = Self {
        link_text: 4.0,
        paragraph: 2.0,
        body: 0.0,
        siblings: 1.0,
    };

    /// `{5, 3, 2, 1}`: includes the page-body term.
    pub const WITH_BODY: Self = Self {
        link_text: 5.0,
        paragraph: 3.0,
        body: 2.0,
        siblings: 1.0,
    };
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self::ANCHOR_HEAVY
    }
}
