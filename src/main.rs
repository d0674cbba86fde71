//! Main entry point for the Google translate CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;

use cli::commands::Commands;

/// Google Translate v2 client with a persisted response cache
#[derive(Parser, Debug)]
#[command(name = "google-translator", version, about, long_about = None)]
struct Args {
    /// Google API key (optional, defaults to GOOGLE_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("GOOGLE_API_KEY", api_key);
    }

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Execute command
    match args.command {
        Some(Commands::Translate {
            text,
            source_lang,
            target_lang,
            no_detect,
            style,
            no_cache,
        }) => {
            cli::commands::handle_translate(
                text,
                source_lang,
                target_lang,
                no_detect,
                style,
                no_cache,
            )
            .await?;
        }
        Some(Commands::Detect { text }) => {
            cli::commands::handle_detect(text).await?;
        }
        Some(Commands::Cache) => {
            cli::commands::handle_cache().await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
