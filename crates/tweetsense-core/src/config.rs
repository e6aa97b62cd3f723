use crate::app_config::{AppConfig, Environment, PostSourceKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the process environment so tests can drive it
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("TWEETSENSE_ENV", "development"))?;

    let bind_addr = or_default("TWEETSENSE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TWEETSENSE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TWEETSENSE_LOG_LEVEL", "info");

    let model_path = PathBuf::from(or_default(
        "TWEETSENSE_MODEL_PATH",
        "./artifacts/model.json",
    ));
    let vectorizer_path = PathBuf::from(or_default(
        "TWEETSENSE_VECTORIZER_PATH",
        "./artifacts/vectorizer.json",
    ));
    let stopwords_path = optional("TWEETSENSE_STOPWORDS_PATH").map(PathBuf::from);

    let post_source = parse_post_source(&or_default("TWEETSENSE_POST_SOURCE", "nitter"))?;
    let nitter_urls = parse_url_list(
        "TWEETSENSE_NITTER_URLS",
        &or_default("TWEETSENSE_NITTER_URLS", "https://nitter.net"),
    )?;
    let post_limit = parse_positive_usize("TWEETSENSE_POST_LIMIT", "5")?;
    let request_timeout_secs = parse_u64("TWEETSENSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "TWEETSENSE_USER_AGENT",
        "tweetsense/0.1 (sentiment-analysis)",
    );
    let rate_limit_per_minute = parse_positive_usize("TWEETSENSE_RATE_LIMIT_PER_MINUTE", "120")?;

    let twitter_auth_token = optional("TWITTER_AUTH_TOKEN");
    let twitter_ct0 = optional("TWITTER_CT0");

    if post_source == PostSourceKind::Bird {
        if twitter_auth_token.is_none() {
            return Err(ConfigError::MissingEnvVar("TWITTER_AUTH_TOKEN".to_string()));
        }
        if twitter_ct0.is_none() {
            return Err(ConfigError::MissingEnvVar("TWITTER_CT0".to_string()));
        }
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        model_path,
        vectorizer_path,
        stopwords_path,
        post_source,
        nitter_urls,
        post_limit,
        request_timeout_secs,
        user_agent,
        rate_limit_per_minute,
        twitter_auth_token,
        twitter_ct0,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TWEETSENSE_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_post_source(s: &str) -> Result<PostSourceKind, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "nitter" => Ok(PostSourceKind::Nitter),
        "bird" => Ok(PostSourceKind::Bird),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TWEETSENSE_POST_SOURCE".to_string(),
            reason: format!("expected nitter or bird; got '{other}'"),
        }),
    }
}

/// Split a comma-separated list of base URLs, dropping blanks and trailing slashes.
fn parse_url_list(var: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let urls: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if let Some(bad) = urls
        .iter()
        .find(|u| !(u.starts_with("http://") || u.starts_with("https://")))
    {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{bad}' is not an http(s) URL"),
        });
    }
    if urls.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "at least one URL is required".to_string(),
        });
    }

    Ok(urls)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
