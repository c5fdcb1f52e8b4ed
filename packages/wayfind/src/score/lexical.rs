//! Lexical multi-factor relevance scoring.

use regex::Regex;

use super::{FeatureWeights, RelevanceScorer};
use crate::types::LinkContext;

/// Split text into lowercase tokens.
///
/// Token characters are ASCII alphanumerics and the Arabic block
/// U+0600–U+06FF; everything else separates.
pub fn tokenize(text: &str) -> Vec<String> {
    let separator = Regex::new(r"[^0-9A-Za-z\u{0600}-\u{06FF}]+").unwrap();
    separator
        .split(text)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Weighted keyword scorer over a link's local context.
///
/// Counts case-insensitive keyword occurrences in the anchor text, the
/// enclosing paragraph and (optionally) the page body, plus the number of
/// sibling links whose own text mentions any keyword, and combines them
/// with a [`FeatureWeights`] vector. Missing or empty context contributes
/// zero, never an error.
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    keywords: Vec<String>,
    weights: FeatureWeights,
}

impl LexicalScorer {
    /// Create a scorer from pre-tokenized keywords.
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>, weights: FeatureWeights) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            weights,
        }
    }

    /// Create a scorer by tokenizing free text (a topic description or a
    /// target phrase).
    pub fn from_text(text: &str, weights: FeatureWeights) -> Self {
        Self {
            keywords: tokenize(text),
            weights,
        }
    }

    /// The keyword set in use.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn occurrences(&self, text: &str) -> usize {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .map(|kw| haystack.matches(kw.as_str()).count())
            .sum()
    }

    fn mentions_any(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.keywords.iter().any(|kw| haystack.contains(kw.as_str()))
    }
}

impl RelevanceScorer for LexicalScorer {
    fn score(
        &self,
        link: &LinkContext,
        page_links: &[LinkContext],
        page_body: Option<&str>,
    ) -> f64 {
        if self.keywords.is_empty() {
            return 0.0;
        }

        let link_matches = self.occurrences(&link.text) as f64;
        let paragraph_matches = self.occurrences(&link.paragraph) as f64;

        let body_matches = if self.weights.body != 0.0 {
            page_body.map_or(0.0, |body| self.occurrences(body) as f64)
        } else {
            0.0
        };

        // Siblings: links on the same page, other than this one, whose own
        // text mentions any keyword.
        let mut sibling_hits = page_links
            .iter()
            .filter(|other| self.mentions_any(&other.text))
            .count();
        if sibling_hits > 0 && self.mentions_any(&link.text) {
            sibling_hits -= 1;
        }

        self.weights.link_text * link_matches
            + self.weights.paragraph * paragraph_matches
            + self.weights.body * body_matches
            + self.weights.siblings * sibling_hits as f64
    }
}

/// Blend of a topic-description score and a target-phrase score.
///
/// The two scores are computed independently over their own token sets and
/// combined as `0.3 * topic + 0.7 * phrase`.
#[derive(Debug, Clone)]
pub struct BlendedScorer {
    topic: LexicalScorer,
    phrase: LexicalScorer,
}

impl BlendedScorer {
    const TOPIC_WEIGHT: f64 = 0.3;
    const PHRASE_WEIGHT: f64 = 0.7;

    /// Create a blended scorer from a topic description and target phrase.
    pub fn new(topic_description: &str, target_phrase: &str, weights: FeatureWeights) -> Self {
        Self {
            topic: LexicalScorer::from_text(topic_description, weights),
            phrase: LexicalScorer::from_text(target_phrase, weights),
        }
    }
}

impl RelevanceScorer for BlendedScorer {
    fn score(
        &self,
        link: &LinkContext,
        page_links: &[LinkContext],
        page_body: Option<&str>,
    ) -> f64 {
        let topic_score = self.topic.score(link, page_links, page_body);
        let phrase_score = self.phrase.score(link, page_links, page_body);

        Self::TOPIC_WEIGHT * topic_score + Self::PHRASE_WEIGHT * phrase_score
    }
}
