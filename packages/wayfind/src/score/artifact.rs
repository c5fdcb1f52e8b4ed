//! Persisted classifier artifact.
//!
//! Inference-only: the artifact is produced by an external training
//! pipeline (vectorizer fit + model fit) and persisted as JSON. Here it is
//! loaded once at startup and queried through [`TextClassifier`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::TextClassifier;
use super::lexical::tokenize;
use crate::error::{ClassifierError, ClassifierResult};

/// A tf-idf vectorizer plus multinomial naive-bayes parameters.
///
/// `feature_log_prob[c][j]` is the log-likelihood of vocabulary feature `j`
/// under class `c`; class 1 is the relevant class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayesArtifact {
    /// Token → feature index
    pub vocabulary: HashMap<String, usize>,

    /// Per-feature inverse document frequency
    pub idf: Vec<f64>,

    /// Log prior per class
    pub class_log_prior: Vec<f64>,

    /// Log feature likelihood per class
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl BayesArtifact {
    /// Load an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ClassifierResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ClassifierError::Artifact(Box::new(e)))?;
        let artifact: Self =
            serde_json::from_str(&raw).map_err(|e| ClassifierError::Artifact(Box::new(e)))?;
        artifact.check()?;
        Ok(artifact)
    }

    /// Validate internal dimensions.
    fn check(&self) -> ClassifierResult<()> {
        let features = self.idf.len();
        let classes = self.class_log_prior.len();

        if classes != 2 {
            return Err(ClassifierError::Prediction {
                reason: format!("expected 2 classes, artifact has {classes}"),
            });
        }
        if self.feature_log_prob.len() != classes
            || self.feature_log_prob.iter().any(|row| row.len() != features)
            || self.vocabulary.values().any(|&idx| idx >= features)
        {
            return Err(ClassifierError::Prediction {
                reason: "inconsistent artifact dimensions".into(),
            });
        }

        Ok(())
    }

    /// Tf-idf weights for the known tokens of `text`, sparse.
    fn vectorize(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect()
    }
}

impl TextClassifier for BayesArtifact {
    fn predict_probability(&self, text: &str) -> ClassifierResult<f64> {
        self.check()?;

        let features = self.vectorize(text);

        // Joint log-likelihood per class; unknown-only text falls back to
        // the priors.
        let mut joint = self.class_log_prior.clone();
        for (idx, weight) in &features {
            for (c, j) in joint.iter_mut().enumerate() {
                *j += weight * self.feature_log_prob[c][*idx];
            }
        }

        // Two-class softmax, stabilized against overflow
        let max = joint[0].max(joint[1]);
        let exp0 = (joint[0] - max).exp();
        let exp1 = (joint[1] - max).exp();

        Ok(exp1 / (exp0 + exp1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tiny two-word artifact: "robotics" indicates the relevant class,
    /// "cafeteria" the other one.
    fn toy_artifact() -> BayesArtifact {
        BayesArtifact {
            vocabulary: [("robotics".to_string(), 0), ("cafeteria".to_string(), 1)]
                .into_iter()
                .collect(),
            idf: vec![1.0, 1.0],
            class_log_prior: vec![(0.5f64).ln(), (0.5f64).ln()],
            feature_log_prob: vec![
                vec![(0.1f64).ln(), (0.9f64).ln()],
                vec![(0.9f64).ln(), (0.1f64).ln()],
            ],
        }
    }

    #[test]
    fn test_relevant_token_raises_probability() {
        let artifact = toy_artifact();
        let relevant = artifact.predict_probability("robotics research").unwrap();
        let irrelevant = artifact.predict_probability("cafeteria menu").unwrap();

        assert!(relevant > 0.5, "got {relevant}");
        assert!(irrelevant < 0.5, "got {irrelevant}");
    }

    #[test]
    fn test_unknown_text_falls_back_to_prior() {
        let artifact = toy_artifact();
        let p = artifact.predict_probability("completely unseen words").unwrap();
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_inconsistent_artifact() {
        let mut artifact = toy_artifact();
        artifact.idf.pop();
        assert!(artifact.predict_probability("robotics").is_err());
    }
}
