//! Text normalization applied before vectorization.

use crate::stopwords::Stopwords;

/// Normalize raw text into the space-separated token string the vectorizer
/// was trained on.
///
/// Every character outside `[A-Za-z]` becomes a space, the result is
/// lowercased and split on whitespace, stopwords are dropped, and the
/// survivors are joined with single spaces. Input made only of symbols or
/// stopwords yields `""`.
#[must_use]
pub fn normalize(text: &str, stopwords: &Stopwords) -> String {
    let letters: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    letters
        .split_whitespace()
        .filter(|token| !stopwords.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}
