mod analyze;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tweetsense_core::AppConfig;
use tweetsense_sentiment::PostSource;

#[derive(Debug, Parser)]
#[command(name = "tweetsense-cli")]
#[command(about = "Classify text and recent posts as positive or negative")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a piece of text
    Text {
        /// The text to classify
        text: String,
    },
    /// Fetch a user's recent posts and classify each one
    User {
        /// Username, with or without a leading @
        username: String,

        /// Number of posts to fetch (overrides TWEETSENSE_POST_LIMIT)
        #[arg(long, value_parser = analyze::parse_limit)]
        limit: Option<usize>,
    },
    /// Print the normalized form of a text, as the vectorizer sees it
    Normalize {
        /// The text to normalize
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = tweetsense_core::load_app_config_from_env()?;

    // Logs go to stderr so stdout carries only results.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, mut config: AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Text { text } => {
            let context = analyze::load_context(&config)?;
            analyze::run_text(&context, &text)
        }
        Commands::User { username, limit } => {
            if let Some(limit) = limit {
                config.post_limit = limit;
            }
            let context = analyze::load_context(&config)?;
            let source = PostSource::from_config(&config)?;
            analyze::run_user(&context, &source, &username).await
        }
        Commands::Normalize { text } => analyze::run_normalize(&config, &text),
    }
}

#[cfg(test)]
mod tests;
