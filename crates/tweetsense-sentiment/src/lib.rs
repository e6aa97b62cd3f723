//! Sentiment inference for short texts and recent social-media posts.
//!
//! Raw text is normalized (ASCII letters only, lowercased, stopwords removed),
//! turned into a sparse bag-of-words vector by a pretrained vectorizer, and
//! labelled by a pretrained linear classifier. Artifacts are loaded once into
//! an immutable [`InferenceContext`] that every call borrows.

pub mod analysis;
pub mod classifier;
pub mod context;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod sources;
pub mod stopwords;
pub mod types;
pub mod vectorizer;

pub use analysis::{analyze_text, analyze_user, UserAnalysis};
pub use classifier::Classifier;
pub use context::{ArtifactPaths, InferenceContext};
pub use error::{AnalysisError, ModelError, SourceError, UnavailableReason};
pub use normalize::normalize;
pub use pipeline::predict_sentiment;
pub use sources::{clean_username, BirdClient, NitterClient, PostSource};
pub use stopwords::Stopwords;
pub use types::{Label, Post, PostVerdict, Prediction, UserPosts};
pub use vectorizer::{SparseVector, Vectorizer, Weighting};
