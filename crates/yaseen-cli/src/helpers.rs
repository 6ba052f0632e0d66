//! Shared CLI helpers: path expansion and report printing.

use std::path::PathBuf;

use colored::Colorize;

use crate::replay::ReplayReport;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print a replay report as a human-readable table.
pub fn print_report(report: &ReplayReport) {
    println!();
    println!("{}", "Yaseen replay".cyan().bold());
    println!();

    for (i, turn) in report.turns.iter().enumerate() {
        let label = turn.conversation.as_deref().unwrap_or("-");
        match (&turn.session_id, &turn.rejected) {
            (_, Some(reason)) => println!(
                "  {:>3}  {:<12} {} {}",
                i + 1,
                label,
                "✗".red(),
                reason.dimmed()
            ),
            (Some(id), None) => println!(
                "  {:>3}  {:<12} {} session {} · context {} messages",
                i + 1,
                label,
                "✓".green(),
                id.bold(),
                turn.context_messages
            ),
            (None, None) => println!("  {:>3}  {:<12} {}", i + 1, label, "?".yellow()),
        }
    }

    let stats = &report.stats;
    println!();
    println!(
        "  {:<18} {} total · {} active (max {})",
        "Sessions:".bold(),
        stats.total_sessions,
        stats.active_sessions,
        stats.max_sessions
    );
    println!(
        "  {:<18} {}",
        "Context window:".bold(),
        stats.max_context_messages
    );
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/foo/bar");
        assert!(result.ends_with("foo/bar"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn expand_tilde_relative() {
        let result = expand_tilde("relative/path");
        assert_eq!(result, PathBuf::from("relative/path"));
    }
}
