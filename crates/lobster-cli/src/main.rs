//! Lobster CLI - stream finder and player launcher
//!
//! Features:
//! - Source lookup for an episode/media pair
//! - Quality and subtitle language selection
//! - Player launch (mpv, IINA, VLC, Android intents)
//! - Dry runs and JSON output for scripting

use clap::{Args, Parser, Subcommand};
use lobster_core::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// Lobster - watch from the terminal
#[derive(Parser)]
#[command(name = "lobster")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Find a stream and play it in your local media player", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Config file (default: ~/.config/lobster/lobster_config.txt)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long, env = "LOBSTER_API_BASE", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

/// What to look up and how to pick from it
#[derive(Args, Debug, Clone)]
struct Target {
    /// Episode identifier
    episode_id: String,

    /// Media identifier
    media_id: String,

    /// Upstream server (overrides preferred_server)
    #[arg(short, long)]
    server: Option<String>,

    /// Video quality tag, e.g. 1080p (overrides video_quality)
    #[arg(short, long)]
    quality: Option<String>,

    /// Subtitle language tag (overrides subs_language)
    #[arg(short, long)]
    language: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch sources and launch the player
    Play {
        #[command(flatten)]
        target: Target,

        /// Player name or path (overrides player)
        #[arg(short, long)]
        player: Option<String>,

        /// Print the player command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch sources and show what was found
    Info {
        #[command(flatten)]
        target: Target,
    },

    /// Show the config file location and resolved preferences
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    lobster_core::init();

    let settings = commands::Settings {
        config: cli.config,
        base_url: cli.base_url,
        timeout: std::time::Duration::from_secs(cli.timeout),
    };

    match cli.command {
        Commands::Play { target, player, dry_run } => {
            let overrides = commands::Overrides {
                player,
                server: target.server,
                quality: target.quality,
                language: target.language,
            };
            commands::play(
                &settings,
                &target.episode_id,
                &target.media_id,
                overrides,
                dry_run,
                &cli.format,
            )
            .await?;
        }
        Commands::Info { target } => {
            let overrides = commands::Overrides {
                player: None,
                server: target.server,
                quality: target.quality,
                language: target.language,
            };
            commands::info(
                &settings,
                &target.episode_id,
                &target.media_id,
                overrides,
                &cli.format,
            )
            .await?;
        }
        Commands::Config => {
            commands::config(&settings, &cli.format)?;
        }
    }

    Ok(())
}
