//! Loading the immutable inference context.

use std::path::PathBuf;

use tweetsense_core::AppConfig;

use crate::classifier::Classifier;
use crate::error::ModelError;
use crate::stopwords::Stopwords;
use crate::vectorizer::Vectorizer;

/// Where the pretrained artifacts live on disk.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
    /// Custom stopword list; `None` uses the built-in English list.
    pub stopwords: Option<PathBuf>,
}

impl ArtifactPaths {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model_path.clone(),
            vectorizer: config.vectorizer_path.clone(),
            stopwords: config.stopwords_path.clone(),
        }
    }
}

/// Everything a prediction needs, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    stopwords: Stopwords,
    vectorizer: Vectorizer,
    classifier: Classifier,
}

impl InferenceContext {
    /// Assemble a context from already-loaded parts.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DimensionMismatch`] if the classifier weights do
    /// not match the vectorizer's feature count.
    pub fn new(
        stopwords: Stopwords,
        vectorizer: Vectorizer,
        classifier: Classifier,
    ) -> Result<Self, ModelError> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(ModelError::DimensionMismatch {
                vectorizer: vectorizer.n_features(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Self {
            stopwords,
            vectorizer,
            classifier,
        })
    }

    /// Read, parse and cross-check all artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if any artifact is missing, malformed, or
    /// inconsistent with the others.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ModelError> {
        let stopwords = match &paths.stopwords {
            Some(path) => Stopwords::from_file(path)?,
            None => Stopwords::english(),
        };
        let vectorizer = Vectorizer::from_path(&paths.vectorizer)?;
        let classifier = Classifier::from_path(&paths.model)?;
        let context = Self::new(stopwords, vectorizer, classifier)?;

        tracing::info!(
            model = %paths.model.display(),
            vectorizer = %paths.vectorizer.display(),
            features = context.vectorizer.n_features(),
            stopwords = context.stopwords.len(),
            "loaded inference artifacts"
        );

        Ok(context)
    }

    #[must_use]
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    #[must_use]
    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

/// Context built from the JSON fixtures shared with the integration tests.
#[cfg(test)]
pub(crate) fn test_context() -> InferenceContext {
    InferenceContext::new(
        Stopwords::english(),
        Vectorizer::from_json_str(include_str!("../tests/fixtures/vectorizer.json"))
            .expect("fixture vectorizer"),
        Classifier::from_json_str(include_str!("../tests/fixtures/model.json"))
            .expect("fixture model"),
    )
    .expect("fixture dimensions agree")
}
