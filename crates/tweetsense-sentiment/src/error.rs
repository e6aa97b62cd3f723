use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating the vectorizer/classifier artifacts.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact} artifact: {reason}")]
    InvalidArtifact {
        artifact: &'static str,
        reason: String,
    },

    #[error("vectorizer produces {vectorizer} features but classifier expects {classifier}")]
    DimensionMismatch { vectorizer: usize, classifier: usize },
}

/// Failures while fetching a user's posts.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("response is not an RSS feed")]
    NotAFeed,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bird error: {0}")]
    Process(String),

    #[error("all {attempts} Nitter instances failed; last error: {last}")]
    AllInstancesFailed {
        attempts: usize,
        last: Box<SourceError>,
    },

    #[error("invalid source configuration: {0}")]
    InvalidConfig(String),
}

/// Why a user's posts could not be analyzed.
///
/// Both reasons render the same message to the user; the distinction is kept
/// for logging.
#[derive(Debug)]
pub enum UnavailableReason {
    NoPosts,
    FetchFailed(SourceError),
}

/// Outcomes of the user-facing analysis operations that are not a label.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please enter some text.")]
    EmptyText,

    #[error("Please enter a Twitter username.")]
    EmptyUsername,

    #[error(
        "Twitter data could not be fetched at the moment. \
         Please try again later or use custom text mode."
    )]
    Unavailable(UnavailableReason),
}

impl AnalysisError {
    /// `true` for input the user should correct rather than retry.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::EmptyText | Self::EmptyUsername)
    }
}
