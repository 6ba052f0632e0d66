//! `yaseen status`: show configuration and session limits.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use yaseen_core::config::{get_config_path, load_config};

/// Run the status command.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(get_config_path);
    let config = load_config(Some(config_path.as_path()));

    println!();
    println!("{}", "Yaseen Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );

    // Sessions
    let session = &config.session;
    println!();
    println!("  {}", "Sessions:".bold());
    println!("    {:<22} {}", "Max sessions", session.max_sessions);
    println!("    {:<22} {}", "Context window", session.max_context_messages);
    println!(
        "    {:<22} {} min",
        "Inactivity timeout", session.session_timeout_minutes
    );
    let sweeper = match session.sweep_interval() {
        Some(interval) => format!("every {}s", interval.as_secs()),
        None => format!("{}", "· on read only".dimmed()),
    };
    println!("    {:<22} {}", "Expiry sweep", sweeper);

    // Assistant
    let assistant = &config.assistant;
    println!();
    println!("  {}", "Assistant:".bold());
    println!("    {:<22} {}", "Name", assistant.name);
    let moderation = if assistant.moderation_enabled {
        format!("{}", "✓ enabled".green())
    } else {
        format!("{}", "· disabled".dimmed())
    };
    println!("    {:<22} {}", "Moderation", moderation);
    println!(
        "    {:<22} {}",
        "Confidence threshold", assistant.confidence_threshold
    );

    println!();

    Ok(())
}
