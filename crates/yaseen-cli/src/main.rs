//! Yaseen CLI: entry point.
//!
//! # Commands
//!
//! - `yaseen onboard`: write the default config
//! - `yaseen status`: show configuration and session limits
//! - `yaseen replay FILE [--json] [--logs]`: drive the session store with a transcript

mod helpers;
mod onboard;
mod replay;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use yaseen_core::config::load_config;
use yaseen_core::session::{SessionStore, SessionSweeper};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Yaseen: conversation session store for a retrieval-augmented assistant
#[derive(Parser)]
#[command(name = "yaseen", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.yaseen/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Onboard,

    /// Show configuration and session limits
    Status,

    /// Replay a JSON transcript through the session store
    Replay {
        /// Transcript file: a JSON array of turns
        file: String,

        /// Print a machine-readable JSON report
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Onboard => onboard::run(config_path),
        Commands::Status => status::run(config_path),
        Commands::Replay { file, json, logs } => {
            init_logging(logs);
            run_replay(config_path, helpers::expand_tilde(&file), json).await
        }
    }
}

// ─────────────────────────────────────────────
// Replay command
// ─────────────────────────────────────────────

async fn run_replay(config_path: Option<PathBuf>, file: PathBuf, json: bool) -> Result<()> {
    let config = load_config(config_path.as_deref());

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read transcript: {}", file.display()))?;
    let turns = replay::parse_transcript(&content)
        .with_context(|| format!("invalid transcript: {}", file.display()))?;

    // One store per process, shared with every consumer.
    let store = Arc::new(SessionStore::new(&config.session));
    let sweeper = Arc::new(SessionSweeper::new(
        store.clone(),
        config.session.sweep_interval(),
    ));
    let sweeper_task = {
        let sweeper = sweeper.clone();
        tokio::spawn(async move { sweeper.start().await })
    };

    info!(turns = turns.len(), "replaying transcript");
    let report = replay::replay(&store, &turns);

    sweeper.stop();
    sweeper_task
        .await
        .context("session sweeper task panicked")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        helpers::print_report(&report);
    }

    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("yaseen=debug,yaseen_core=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
