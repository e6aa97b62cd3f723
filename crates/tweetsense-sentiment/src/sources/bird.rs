//! Twitter/X post source via the `bird` CLI.
//!
//! Invokes `bird user-tweets {username} --json -n {limit} --auth-token ... --ct0 ...`
//! as a subprocess and reads the JSON array it prints.

use serde::Deserialize;

use crate::error::SourceError;
use crate::types::{Post, UserPosts};

#[derive(Deserialize)]
struct BirdTweet {
    id: String,
    text: String,
    author: BirdAuthor,
}

#[derive(Deserialize)]
struct BirdAuthor {
    username: String,
}

pub struct BirdClient {
    program: String,
    auth_token: String,
    ct0: String,
    limit: usize,
}

impl std::fmt::Debug for BirdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BirdClient")
            .field("program", &self.program)
            .field("auth_token", &"[redacted]")
            .field("ct0", &"[redacted]")
            .field("limit", &self.limit)
            .finish()
    }
}

impl BirdClient {
    #[must_use]
    pub fn new(auth_token: &str, ct0: &str, limit: usize) -> Self {
        Self::with_program("bird", auth_token, ct0, limit)
    }

    /// Use a specific executable instead of `bird` from `PATH`.
    #[must_use]
    pub fn with_program(program: &str, auth_token: &str, ct0: &str, limit: usize) -> Self {
        Self {
            program: program.to_string(),
            auth_token: auth_token.to_string(),
            ct0: ct0.to_string(),
            limit,
        }
    }

    /// Fetch the user's most recent posts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Process`] if `bird` cannot be spawned or exits
    /// non-zero, and [`SourceError::Json`] if its output is not the expected
    /// JSON array.
    pub async fn fetch_user_posts(&self, username: &str) -> Result<UserPosts, SourceError> {
        let limit = self.limit.to_string();
        let output = tokio::process::Command::new(&self.program)
            .args([
                "user-tweets",
                username,
                "--json",
                "-n",
                limit.as_str(),
                "--auth-token",
                self.auth_token.as_str(),
                "--ct0",
                self.ct0.as_str(),
            ])
            .output()
            .await
            .map_err(|e| SourceError::Process(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                username,
                status = %output.status,
                stderr = %stderr.trim(),
                "bird user-tweets non-zero exit"
            );
            return Err(SourceError::Process(format!(
                "user-tweets exited with {}",
                output.status
            )));
        }

        let posts = parse_bird_output(&output.stdout, self.limit)?;
        tracing::debug!(username, count = posts.len(), "fetched bird timeline");
        Ok(UserPosts::from_posts(posts))
    }
}

/// Parse `bird --json` output into posts, keeping at most `limit`.
pub(crate) fn parse_bird_output(stdout: &[u8], limit: usize) -> Result<Vec<Post>, SourceError> {
    let tweets: Vec<BirdTweet> = serde_json::from_slice(stdout)?;
    Ok(tweets
        .into_iter()
        .filter(|t| !t.text.trim().is_empty())
        .take(limit)
        .map(|t| Post {
            url: Some(format!(
                "https://x.com/{}/status/{}",
                t.author.username, t.id
            )),
            text: t.text,
        })
        .collect())
}
