//! Bag-of-words vectorizer loaded from a JSON artifact.
//!
//! Reproduces the count / tf-idf transform the classifier was trained
//! against: regex tokenization, optional n-grams, vocabulary lookup, term
//! weighting and row normalization. Terms outside the vocabulary are ignored.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// A sparse feature vector with entries sorted by feature index.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension.
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Non-zero `(index, value)` pairs in ascending index order.
    #[must_use]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product with a dense weight row. Indices beyond `weights` contribute nothing.
    #[must_use]
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(i, v)| weights.get(i).map(|w| w * v))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    Count,
    Tfidf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    kind: Weighting,
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    #[serde(default)]
    token_pattern: Option<String>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    binary: bool,
    #[serde(default)]
    sublinear_tf: bool,
    // Absent means "default for this kind"; an explicit null disables normalization.
    #[serde(default, deserialize_with = "present")]
    norm: Option<Option<Norm>>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A fitted text → feature-vector transform.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    weighting: Weighting,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    lowercase: bool,
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl Vectorizer {
    /// Load a vectorizer artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read, or the errors of
    /// [`Vectorizer::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a vectorizer artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] for malformed JSON and
    /// [`ModelError::InvalidArtifact`] when the vocabulary, idf weights,
    /// n-gram range or token pattern are inconsistent.
    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        let artifact: VectorizerArtifact =
            serde_json::from_str(raw).map_err(|source| ModelError::Json {
                context: "vectorizer artifact".to_string(),
                source,
            })?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ModelError> {
        let invalid = |reason: String| ModelError::InvalidArtifact {
            artifact: "vectorizer",
            reason,
        };

        let n_features = artifact.vocabulary.len();
        let mut seen = HashSet::with_capacity(n_features);
        for (term, &index) in &artifact.vocabulary {
            if index >= n_features {
                return Err(invalid(format!(
                    "term '{term}' has index {index}, vocabulary size is {n_features}"
                )));
            }
            if !seen.insert(index) {
                return Err(invalid(format!("index {index} is assigned to more than one term")));
            }
        }

        match (artifact.kind, &artifact.idf) {
            (Weighting::Tfidf, None) => {
                return Err(invalid("tfidf vectorizer requires idf weights".to_string()));
            }
            (Weighting::Tfidf, Some(idf)) if idf.len() != n_features => {
                return Err(invalid(format!(
                    "idf has {} weights, vocabulary size is {n_features}",
                    idf.len()
                )));
            }
            (Weighting::Count, Some(_)) => {
                return Err(invalid("idf weights are only valid for tfidf".to_string()));
            }
            _ => {}
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(invalid(format!(
                "ngram_range ({min_n}, {max_n}) must satisfy 1 <= min <= max"
            )));
        }

        let pattern = artifact
            .token_pattern
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_PATTERN);
        let token_pattern = Regex::new(pattern)
            .map_err(|e| invalid(format!("token_pattern does not compile: {e}")))?;

        let norm = artifact.norm.unwrap_or(match artifact.kind {
            Weighting::Tfidf => Some(Norm::L2),
            Weighting::Count => None,
        });

        Ok(Self {
            weighting: artifact.kind,
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            token_pattern,
            ngram_range: artifact.ngram_range,
            lowercase: artifact.lowercase,
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            norm,
        })
    }

    /// Dimension of every vector this vectorizer produces.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Map text to its feature vector. Never fails; empty text gives the zero vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        let lowered;
        let text = if self.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .collect();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, self.weight(index, tf)))
            .filter(|&(_, v)| v != 0.0)
            .collect();

        if let Some(norm) = self.norm {
            let magnitude = match norm {
                Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
                Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            };
            if magnitude > 0.0 {
                for (_, v) in &mut entries {
                    *v /= magnitude;
                }
            }
        }

        SparseVector {
            dim: self.n_features(),
            entries,
        }
    }

    fn weight(&self, index: usize, tf: f64) -> f64 {
        let tf = if self.binary {
            1.0
        } else if self.sublinear_tf {
            1.0 + tf.ln()
        } else {
            tf
        };
        match (&self.weighting, &self.idf) {
            (Weighting::Tfidf, Some(idf)) => tf * idf[index],
            _ => tf,
        }
    }
}
