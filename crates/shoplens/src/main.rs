//! Shoplens CLI - segment retail customers from a photo.
//!
//! Each image is sent to a hosted multimodal model which answers with one
//! shopper segment label ("Deal Seeker", "Lost/Confused", ...).
//!
//! # Usage
//!
//! ```bash
//! # Segment a single photo (key from OPENROUTER_API_KEY)
//! shoplens classify customer.jpg
//!
//! # Segment a folder of photos and guess the segment first
//! shoplens classify ./aisle-cam/ --format jsonl --guess "Deal Seeker"
//!
//! # List the segment labels
//! shoplens segments
//!
//! # Guided mode
//! shoplens
//! ```

use clap::{CommandFactory, Parser, Subcommand};

mod cli;
mod logging;

/// Shoplens - real-time customer segmentation for retail.
#[derive(Parser, Debug)]
#[command(name = "shoplens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment the customer in one photo, or every photo in a directory
    Classify(cli::classify::ClassifyArgs),

    /// List the segment labels and what they mean
    Segments,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match shoplens_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `shoplens config path`."
            );
            shoplens_core::Config::default()
        }
    };
    logging::init_from_config(&config.logging, cli.verbose, cli.json_logs);

    tracing::debug!("Shoplens v{}", shoplens_core::VERSION);

    match cli.command {
        Some(Commands::Classify(args)) => cli::classify::execute(args, config).await,
        Some(Commands::Segments) => cli::segments::execute(&config),
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if console::Term::stderr().is_term() => cli::interactive::run(&config).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
