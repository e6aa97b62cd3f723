//! Pretrained linear classifiers loaded from a JSON artifact.

use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;
use crate::vectorizer::SparseVector;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierArtifact {
    Linear {
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    MultinomialNb {
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

/// Weights of a logistic-regression / linear-SVM style model.
///
/// A single weight row is the binary case: a positive decision value selects
/// `classes[1]`, anything else `classes[0]`.
#[derive(Debug, Clone)]
pub struct LinearModel {
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

/// Multinomial naive Bayes, which is linear in log space.
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    classes: Vec<i64>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub enum Classifier {
    Linear(LinearModel),
    MultinomialNb(NaiveBayesModel),
}

impl Classifier {
    /// Load a classifier artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read, or the errors of
    /// [`Classifier::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a classifier artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] for malformed JSON and
    /// [`ModelError::InvalidArtifact`] when class, weight and intercept
    /// shapes disagree.
    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        let artifact: ClassifierArtifact =
            serde_json::from_str(raw).map_err(|source| ModelError::Json {
                context: "classifier artifact".to_string(),
                source,
            })?;

        match artifact {
            ClassifierArtifact::Linear {
                classes,
                coef,
                intercept,
            } => {
                check_classes(&classes)?;
                let binary = coef.len() == 1 && classes.len() == 2;
                if !binary && coef.len() != classes.len() {
                    return Err(invalid(format!(
                        "{} weight rows do not fit {} classes",
                        coef.len(),
                        classes.len()
                    )));
                }
                if intercept.len() != coef.len() {
                    return Err(invalid(format!(
                        "{} intercepts for {} weight rows",
                        intercept.len(),
                        coef.len()
                    )));
                }
                check_rows(&coef)?;
                Ok(Classifier::Linear(LinearModel {
                    classes,
                    coef,
                    intercept,
                }))
            }
            ClassifierArtifact::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                check_classes(&classes)?;
                if class_log_prior.len() != classes.len()
                    || feature_log_prob.len() != classes.len()
                {
                    return Err(invalid(format!(
                        "expected {} priors and probability rows, got {} and {}",
                        classes.len(),
                        class_log_prior.len(),
                        feature_log_prob.len()
                    )));
                }
                check_rows(&feature_log_prob)?;
                Ok(Classifier::MultinomialNb(NaiveBayesModel {
                    classes,
                    class_log_prior,
                    feature_log_prob,
                }))
            }
        }
    }

    /// Number of input features the weights expect.
    #[must_use]
    pub fn n_features(&self) -> usize {
        let rows = match self {
            Classifier::Linear(m) => &m.coef,
            Classifier::MultinomialNb(m) => &m.feature_log_prob,
        };
        rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::Linear(m) => &m.classes,
            Classifier::MultinomialNb(m) => &m.classes,
        }
    }

    /// Predict the raw class for a feature vector.
    ///
    /// Ties between classes resolve to the one listed first.
    #[must_use]
    pub fn predict(&self, features: &SparseVector) -> i64 {
        match self {
            Classifier::Linear(m) if m.coef.len() == 1 => {
                let decision = features.dot(&m.coef[0]) + m.intercept[0];
                if decision > 0.0 {
                    m.classes[1]
                } else {
                    m.classes[0]
                }
            }
            Classifier::Linear(m) => {
                let scores = m
                    .coef
                    .iter()
                    .zip(&m.intercept)
                    .map(|(row, b)| features.dot(row) + b);
                m.classes[argmax(scores)]
            }
            Classifier::MultinomialNb(m) => {
                let scores = m
                    .feature_log_prob
                    .iter()
                    .zip(&m.class_log_prior)
                    .map(|(row, prior)| features.dot(row) + prior);
                m.classes[argmax(scores)]
            }
        }
    }
}

fn invalid(reason: String) -> ModelError {
    ModelError::InvalidArtifact {
        artifact: "classifier",
        reason,
    }
}

fn check_classes(classes: &[i64]) -> Result<(), ModelError> {
    if classes.len() < 2 {
        return Err(invalid(format!(
            "need at least 2 classes, got {}",
            classes.len()
        )));
    }
    Ok(())
}

fn check_rows(rows: &[Vec<f64>]) -> Result<(), ModelError> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(invalid(format!(
            "weight row {i} has {} columns, expected {width}",
            row.len()
        )));
    }
    Ok(())
}

/// Index of the first maximum. Empty input maps to 0.
fn argmax(scores: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, score) in scores.enumerate() {
        if score > best_score {
            best = i;
            best_score = score;
        }
    }
    best
}
