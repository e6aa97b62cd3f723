//! User-facing analysis operations.
//!
//! Wraps the pipeline with the input checks and fetch handling the CLI and
//! HTTP surfaces share: blank input is a usage warning, and any fetch failure
//! or empty timeline collapses into a single "unavailable" outcome.

use serde::Serialize;

use crate::context::InferenceContext;
use crate::error::{AnalysisError, UnavailableReason};
use crate::pipeline::predict_sentiment;
use crate::sources::{clean_username, PostSource};
use crate::types::{PostVerdict, Prediction, UserPosts};

/// Per-post labels for one user.
#[derive(Debug, Clone, Serialize)]
pub struct UserAnalysis {
    pub username: String,
    pub posts: Vec<PostVerdict>,
}

/// Classify free-form text.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyText`] for empty or whitespace-only input;
/// the pipeline is not invoked.
pub fn analyze_text(context: &InferenceContext, text: &str) -> Result<Prediction, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyText);
    }
    Ok(predict_sentiment(context, text))
}

/// Fetch a user's recent posts and classify each one.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyUsername`] for a blank username (no fetch
/// is attempted) and [`AnalysisError::Unavailable`] when the source fails
/// or finds nothing.
pub async fn analyze_user(
    context: &InferenceContext,
    source: &PostSource,
    username: &str,
) -> Result<UserAnalysis, AnalysisError> {
    let username = clean_username(username).ok_or(AnalysisError::EmptyUsername)?;

    let posts = match source.fetch_user_posts(username).await {
        Ok(UserPosts::Found(posts)) => posts,
        Ok(UserPosts::NoPosts) => {
            tracing::info!(username, source = source.name(), "no posts found");
            return Err(AnalysisError::Unavailable(UnavailableReason::NoPosts));
        }
        Err(e) => {
            tracing::warn!(
                username,
                source = source.name(),
                error = %e,
                "post fetch failed"
            );
            return Err(AnalysisError::Unavailable(UnavailableReason::FetchFailed(e)));
        }
    };

    let posts: Vec<PostVerdict> = posts
        .into_iter()
        .map(|post| {
            let label = predict_sentiment(context, &post.text).label;
            PostVerdict {
                text: post.text,
                url: post.url,
                label,
            }
        })
        .collect();

    tracing::info!(
        username,
        source = source.name(),
        count = posts.len(),
        "analyzed user posts"
    );

    Ok(UserAnalysis {
        username: username.to_string(),
        posts,
    })
}
