//! Classifier-backed relevance scoring.

use tracing::warn;

use super::RelevanceScorer;
use crate::error::ClassifierResult;
use crate::types::LinkContext;

/// A pretrained text classifier collaborator.
///
/// Implementations are loaded from a persisted artifact at startup (see
/// [`BayesArtifact`](super::BayesArtifact)) and injected into the scorer,
/// which makes them substitutable in tests.
pub trait TextClassifier: Send + Sync {
    /// Probability in `[0, 1]` that the text is relevant to the trained
    /// topic. Label-only classifiers return `0.0` or `1.0`.
    fn predict_probability(&self, text: &str) -> ClassifierResult<f64>;
}

impl<C: TextClassifier + ?Sized> TextClassifier for &C {
    fn predict_probability(&self, text: &str) -> ClassifierResult<f64> {
        (**self).predict_probability(text)
    }
}

impl<C: TextClassifier + ?Sized> TextClassifier for Box<C> {
    fn predict_probability(&self, text: &str) -> ClassifierResult<f64> {
        (**self).predict_probability(text)
    }
}

/// Scores a link by classifying its local textual context.
///
/// The anchor text and enclosing block text are concatenated, lowercased
/// and submitted to the classifier; the class probability is scaled to
/// stay numerically comparable to the lexical scale. Empty context scores
/// 0, and classifier failures are mapped to 0 with a logged diagnostic;
/// they never reach the search loop.
pub struct ClassifierScorer<C: TextClassifier> {
    classifier: C,
    scale: f64,
}

impl<C: TextClassifier> ClassifierScorer<C> {
    /// Default scale factor keeping probabilities comparable to lexical
    /// scores.
    pub const DEFAULT_SCALE: f64 = 1000.0;

    /// Create a scorer around an injected classifier.
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            scale: Self::DEFAULT_SCALE,
        }
    }

    /// Override the probability scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl<C: TextClassifier> RelevanceScorer for ClassifierScorer<C> {
    fn score(
        &self,
        link: &LinkContext,
        _page_links: &[LinkContext],
        _page_body: Option<&str>,
    ) -> f64 {
        let mut pieces: Vec<&str> = Vec::with_capacity(2);
        if !link.text.trim().is_empty() {
            pieces.push(link.text.trim());
        }
        if !link.paragraph.trim().is_empty() {
            pieces.push(link.paragraph.trim());
        }

        let combined = pieces.join(" ").to_lowercase();
        if combined.is_empty() {
            return 0.0;
        }

        match self.classifier.predict_probability(&combined) {
            Ok(probability) => self.scale * probability.clamp(0.0, 1.0),
            Err(e) => {
                warn!(url = %link.url, error = %e, "classifier failed; scoring 0");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifierError;
    use url::Url;

    struct FixedClassifier(f64);

    impl TextClassifier for FixedClassifier {
        fn predict_probability(&self, _text: &str) -> ClassifierResult<f64> {
            Ok(self.0)
        }
    }

    struct BrokenClassifier;

    impl TextClassifier for BrokenClassifier {
        fn predict_probability(&self, _text: &str) -> ClassifierResult<f64> {
            Err(ClassifierError::Prediction {
                reason: "model artifact corrupt".into(),
            })
        }
    }

    fn link(text: &str, paragraph: &str) -> LinkContext {
        LinkContext::new(Url::parse("https://example.com/x").unwrap(), text)
            .with_paragraph(paragraph)
    }

    #[test]
    fn test_scales_probability() {
        let scorer = ClassifierScorer::new(FixedClassifier(0.85));
        assert_eq!(scorer.score(&link("AI lab", ""), &[], None), 850.0);
    }

    #[test]
    fn test_empty_context_scores_zero() {
        let scorer = ClassifierScorer::new(FixedClassifier(0.99));
        assert_eq!(scorer.score(&link("", "   "), &[], None), 0.0);
    }

    #[test]
    fn test_failure_maps_to_zero() {
        let scorer = ClassifierScorer::new(BrokenClassifier);
        assert_eq!(scorer.score(&link("AI lab", ""), &[], None), 0.0);
    }

    #[test]
    fn test_out_of_range_probability_clamped() {
        let scorer = ClassifierScorer::new(FixedClassifier(1.7));
        assert_eq!(scorer.score(&link("AI lab", ""), &[], None), 1000.0);
    }
}
