use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which backend fetches a user's recent posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSourceKind {
    /// RSS feeds served by Nitter instances.
    Nitter,
    /// The `bird` CLI, authenticated with browser session cookies.
    Bird,
}

impl std::fmt::Display for PostSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostSourceKind::Nitter => write!(f, "nitter"),
            PostSourceKind::Bird => write!(f, "bird"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub stopwords_path: Option<PathBuf>,
    pub post_source: PostSourceKind,
    pub nitter_urls: Vec<String>,
    pub post_limit: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub rate_limit_per_minute: usize,
    pub twitter_auth_token: Option<String>,
    pub twitter_ct0: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("model_path", &self.model_path)
            .field("vectorizer_path", &self.vectorizer_path)
            .field("stopwords_path", &self.stopwords_path)
            .field("post_source", &self.post_source)
            .field("nitter_urls", &self.nitter_urls)
            .field("post_limit", &self.post_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field(
                "twitter_auth_token",
                &self.twitter_auth_token.as_ref().map(|_| "[redacted]"),
            )
            .field("twitter_ct0", &self.twitter_ct0.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
