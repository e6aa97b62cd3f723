//! Text → label inference.

use crate::context::InferenceContext;
use crate::normalize::normalize;
use crate::types::{Label, Prediction};

/// Classify one text.
///
/// 1. Normalize the text against the context's stopwords.
/// 2. Vectorize the normalized string.
/// 3. Ask the classifier for a raw class.
/// 4. Map class `1` to [`Label::Positive`] and anything else to [`Label::Negative`].
///
/// Total over all inputs: empty or symbol-only text classifies the zero vector.
#[must_use]
pub fn predict_sentiment(context: &InferenceContext, text: &str) -> Prediction {
    let normalized = normalize(text, context.stopwords());
    let features = context.vectorizer().transform(&normalized);
    let class = context.classifier().predict(&features);
    let label = Label::from_class(class);

    tracing::debug!(
        class,
        label = %label,
        known_terms = features.nnz(),
        "classified text"
    );

    Prediction {
        label,
        class,
        normalized,
    }
}
