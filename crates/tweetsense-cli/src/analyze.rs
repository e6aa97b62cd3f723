//! Command handlers for classifying text and user timelines.

use tweetsense_core::AppConfig;
use tweetsense_sentiment::{
    analyze_text, analyze_user, normalize, AnalysisError, ArtifactPaths, InferenceContext,
    PostSource, PostVerdict, Stopwords,
};

/// Load the vectorizer, classifier and stopwords named in the config.
///
/// # Errors
///
/// Returns an error if any artifact is missing or malformed.
pub(crate) fn load_context(config: &AppConfig) -> anyhow::Result<InferenceContext> {
    let paths = ArtifactPaths::from_config(config);
    InferenceContext::load(&paths)
        .map_err(|e| anyhow::anyhow!("failed to load model artifacts: {e}"))
}

/// Classify `text` and print the label.
///
/// # Errors
///
/// Returns a `warning:` error for blank input.
pub(crate) fn run_text(context: &InferenceContext, text: &str) -> anyhow::Result<()> {
    let prediction = analyze_text(context, text).map_err(into_cli_error)?;
    println!("Prediction Result: {}", prediction.label);
    Ok(())
}

/// Fetch and classify a user's recent posts, one line per post.
///
/// # Errors
///
/// Returns a `warning:` error for a blank username, or the generic
/// unavailability message when posts cannot be fetched.
pub(crate) async fn run_user(
    context: &InferenceContext,
    source: &PostSource,
    username: &str,
) -> anyhow::Result<()> {
    let analysis = analyze_user(context, source, username)
        .await
        .map_err(into_cli_error)?;

    for verdict in &analysis.posts {
        println!("{}", format_verdict(verdict));
    }
    Ok(())
}

/// Print the normalized form of `text`.
///
/// # Errors
///
/// Returns an error if a custom stopword file is configured but unreadable.
pub(crate) fn run_normalize(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let stopwords = match &config.stopwords_path {
        Some(path) => Stopwords::from_file(path)?,
        None => Stopwords::english(),
    };
    println!("{}", normalize(text, &stopwords));
    Ok(())
}

pub(crate) fn parse_limit(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// One output line: `[Label] text (url)`, with the text folded onto one line.
pub(crate) fn format_verdict(verdict: &PostVerdict) -> String {
    let text = verdict.text.split_whitespace().collect::<Vec<_>>().join(" ");
    match &verdict.url {
        Some(url) => format!("[{}] {text} ({url})", verdict.label),
        None => format!("[{}] {text}", verdict.label),
    }
}

pub(crate) fn into_cli_error(err: AnalysisError) -> anyhow::Error {
    if err.is_usage_error() {
        anyhow::anyhow!("warning: {err}")
    } else {
        anyhow::anyhow!("{err}")
    }
}
