//! Post sources: where a user's recent posts come from.

mod bird;
mod nitter;

pub use bird::BirdClient;
pub use nitter::NitterClient;

use tweetsense_core::{AppConfig, PostSourceKind};

use crate::error::SourceError;
use crate::types::UserPosts;

/// The configured backend for fetching a user's posts.
#[derive(Debug)]
pub enum PostSource {
    Nitter(NitterClient),
    Bird(BirdClient),
}

impl PostSource {
    /// Build the source selected by `TWEETSENSE_POST_SOURCE`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidConfig`] if the bird source lacks
    /// credentials or no Nitter instance is configured, or
    /// [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        match config.post_source {
            PostSourceKind::Nitter => Ok(PostSource::Nitter(NitterClient::new(
                &config.nitter_urls,
                config.post_limit,
                config.request_timeout_secs,
                &config.user_agent,
            )?)),
            PostSourceKind::Bird => {
                let (Some(auth_token), Some(ct0)) = (&config.twitter_auth_token, &config.twitter_ct0)
                else {
                    return Err(SourceError::InvalidConfig(
                        "bird source requires TWITTER_AUTH_TOKEN and TWITTER_CT0".to_string(),
                    ));
                };
                Ok(PostSource::Bird(BirdClient::new(
                    auth_token,
                    ct0,
                    config.post_limit,
                )))
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PostSource::Nitter(_) => "nitter",
            PostSource::Bird(_) => "bird",
        }
    }

    /// Fetch recent posts for an already-cleaned username (see [`clean_username`]).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the backend could not be reached or its
    /// response could not be read. "No posts" is not an error.
    pub async fn fetch_user_posts(&self, username: &str) -> Result<UserPosts, SourceError> {
        match self {
            PostSource::Nitter(client) => client.fetch_user_posts(username).await,
            PostSource::Bird(client) => client.fetch_user_posts(username).await,
        }
    }
}

/// Trim whitespace and one leading `@` from a username.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn clean_username(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let name = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    (!name.is_empty()).then_some(name)
}
