use clap::Parser;
use tweetsense_sentiment::{AnalysisError, Label, PostVerdict, UnavailableReason};

use super::*;

#[test]
fn parses_text_command() {
    let cli = Cli::try_parse_from(["tweetsense-cli", "text", "what a great day"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Text { ref text } if text == "what a great day"
    ));
}

#[test]
fn parses_user_command_defaults() {
    let cli = Cli::try_parse_from(["tweetsense-cli", "user", "@jack"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::User { ref username, limit: None } if username == "@jack"
    ));
}

#[test]
fn parses_user_command_with_limit() {
    let cli = Cli::try_parse_from(["tweetsense-cli", "user", "jack", "--limit", "10"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::User {
            limit: Some(10),
            ..
        }
    ));
}

#[test]
fn rejects_zero_limit() {
    let result = Cli::try_parse_from(["tweetsense-cli", "user", "jack", "--limit", "0"]);
    assert!(result.is_err());
}

#[test]
fn parses_normalize_command() {
    let cli = Cli::try_parse_from(["tweetsense-cli", "normalize", "Hello!!"]).unwrap();
    assert!(matches!(cli.command, Commands::Normalize { ref text } if text == "Hello!!"));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["tweetsense-cli"]).is_err());
}

#[test]
fn format_verdict_folds_text_and_appends_url() {
    let verdict = PostVerdict {
        text: "line one\nline   two".to_string(),
        url: Some("https://x.com/jack/status/20".to_string()),
        label: Label::Positive,
    };
    assert_eq!(
        analyze::format_verdict(&verdict),
        "[Positive] line one line two (https://x.com/jack/status/20)"
    );

    let verdict = PostVerdict {
        text: "meh".to_string(),
        url: None,
        label: Label::Negative,
    };
    assert_eq!(analyze::format_verdict(&verdict), "[Negative] meh");
}

#[test]
fn usage_errors_are_prefixed_as_warnings() {
    let err = analyze::into_cli_error(AnalysisError::EmptyText);
    assert_eq!(err.to_string(), "warning: Please enter some text.");

    let err = analyze::into_cli_error(AnalysisError::Unavailable(UnavailableReason::NoPosts));
    assert!(err.to_string().starts_with("Twitter data could not be fetched"));
}
