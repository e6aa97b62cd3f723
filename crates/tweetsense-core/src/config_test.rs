use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn bird_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("TWEETSENSE_POST_SOURCE", "bird");
    m.insert("TWITTER_AUTH_TOKEN", "auth-token");
    m.insert("TWITTER_CT0", "ct0-token");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "TWEETSENSE_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.model_path.to_str(), Some("./artifacts/model.json"));
    assert_eq!(
        cfg.vectorizer_path.to_str(),
        Some("./artifacts/vectorizer.json")
    );
    assert!(cfg.stopwords_path.is_none());
    assert_eq!(cfg.post_source, PostSourceKind::Nitter);
    assert_eq!(cfg.nitter_urls, vec!["https://nitter.net".to_string()]);
    assert_eq!(cfg.post_limit, 5);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "tweetsense/0.1 (sentiment-analysis)");
    assert_eq!(cfg.rate_limit_per_minute, 120);
    assert!(cfg.twitter_auth_token.is_none());
    assert!(cfg.twitter_ct0.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("TWEETSENSE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETSENSE_BIND_ADDR"),
        "expected InvalidEnvVar(TWEETSENSE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn nitter_urls_are_split_and_trimmed() {
    let mut map = HashMap::new();
    map.insert(
        "TWEETSENSE_NITTER_URLS",
        " https://nitter.one/ , ,https://nitter.two",
    );
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.nitter_urls,
        vec![
            "https://nitter.one".to_string(),
            "https://nitter.two".to_string()
        ]
    );
}

#[test]
fn nitter_urls_reject_non_http_entries() {
    let mut map = HashMap::new();
    map.insert("TWEETSENSE_NITTER_URLS", "nitter.net");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETSENSE_NITTER_URLS"),
        "expected InvalidEnvVar(TWEETSENSE_NITTER_URLS), got: {result:?}"
    );
}

#[test]
fn post_limit_override() {
    let mut map = HashMap::new();
    map.insert("TWEETSENSE_POST_LIMIT", "20");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.post_limit, 20);
}

#[test]
fn post_limit_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("TWEETSENSE_POST_LIMIT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETSENSE_POST_LIMIT"),
        "expected InvalidEnvVar(TWEETSENSE_POST_LIMIT), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("TWEETSENSE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETSENSE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TWEETSENSE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn unknown_post_source_fails() {
    let mut map = HashMap::new();
    map.insert("TWEETSENSE_POST_SOURCE", "mastodon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETSENSE_POST_SOURCE"),
        "expected InvalidEnvVar(TWEETSENSE_POST_SOURCE), got: {result:?}"
    );
}

#[test]
fn bird_source_with_credentials_succeeds() {
    let map = bird_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.post_source, PostSourceKind::Bird);
    assert_eq!(cfg.twitter_auth_token.as_deref(), Some("auth-token"));
    assert_eq!(cfg.twitter_ct0.as_deref(), Some("ct0-token"));
}

#[test]
fn bird_source_requires_auth_token() {
    let mut map = bird_env();
    map.remove("TWITTER_AUTH_TOKEN");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TWITTER_AUTH_TOKEN"),
        "expected MissingEnvVar(TWITTER_AUTH_TOKEN), got: {result:?}"
    );
}

#[test]
fn bird_source_requires_ct0() {
    let mut map = bird_env();
    map.insert("TWITTER_CT0", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TWITTER_CT0"),
        "expected MissingEnvVar(TWITTER_CT0), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_credentials() {
    let map = bird_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("auth-token"));
    assert!(!rendered.contains("ct0-token"));
    assert!(rendered.contains("[redacted]"));
}
