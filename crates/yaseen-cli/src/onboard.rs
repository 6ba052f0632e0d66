//! `yaseen onboard`: write the default configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use yaseen_core::config::{get_config_path, save_config, Config};

/// Run the onboard command.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", "Yaseen setup".cyan().bold());
    println!();

    let config_path = config_path.unwrap_or_else(get_config_path);
    let created = write_default_config(&config_path)?;
    let verb = if created { "created config at" } else { "config already exists at" };
    println!("  {} {} {}", "✓".green(), verb, config_path.display());

    println!();
    println!(
        "{}",
        "  Setup complete! Run `yaseen status` to review the session limits.".green()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
///
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
