//! Config loader: reads `~/.yaseen/config.json`, merges env vars, and
//! applies legacy migrations.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.yaseen/config.json`
//! 3. Environment variables `YASEEN_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use super::schema::Config;

/// Keys that older configs kept at the top level instead of under `session`.
const LEGACY_SESSION_KEYS: &[&str] = &["maxContextMessages", "sessionTimeoutMinutes", "maxSessions"];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return finalize(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return finalize(Config::default());
        }
    };

    let mut raw: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return finalize(Config::default());
        }
    };

    migrate_config(&mut raw);

    let config: Config = match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to deserialize config: {}", e);
            return finalize(Config::default());
        }
    };

    finalize(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Env overrides, then range clamping.
fn finalize(config: Config) -> Config {
    normalize(apply_env_overrides(config))
}

/// Apply legacy config migrations.
///
/// Moves flat `maxContextMessages` / `sessionTimeoutMinutes` / `maxSessions`
/// into the `session` section. Values already under `session` win.
fn migrate_config(raw: &mut serde_json::Value) {
    let Some(root) = raw.as_object_mut() else {
        return;
    };

    for key in LEGACY_SESSION_KEYS {
        let Some(value) = root.remove(*key) else {
            continue;
        };
        let session = root
            .entry("session")
            .or_insert_with(|| serde_json::Value::Object(Default::default()));
        match session.as_object_mut() {
            Some(section) if !section.contains_key(*key) => {
                section.insert((*key).to_string(), value);
                debug!("Migrated {key} → session.{key}");
            }
            Some(_) => debug!("Ignoring legacy {key}: session.{key} already set"),
            None => warn!("Config `session` is not an object; dropping legacy {key}"),
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `YASEEN_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `YASEEN_SESSION__MAX_CONTEXT_MESSAGES` → `session.max_context_messages`
/// - `YASEEN_SESSION__SESSION_TIMEOUT_MINUTES` → `session.session_timeout_minutes`
/// - `YASEEN_SESSION__MAX_SESSIONS` → `session.max_sessions`
/// - `YASEEN_SESSION__SWEEP_INTERVAL_SECS` → `session.sweep_interval_secs`
/// - `YASEEN_ASSISTANT__NAME` → `assistant.name`
/// - `YASEEN_ASSISTANT__MODERATION_ENABLED` → `assistant.moderation_enabled`
/// - `YASEEN_ASSISTANT__CONFIDENCE_THRESHOLD` → `assistant.confidence_threshold`
fn apply_env_overrides(mut config: Config) -> Config {
    // Session limits
    override_parsed(
        "YASEEN_SESSION__MAX_CONTEXT_MESSAGES",
        &mut config.session.max_context_messages,
    );
    override_parsed(
        "YASEEN_SESSION__SESSION_TIMEOUT_MINUTES",
        &mut config.session.session_timeout_minutes,
    );
    override_parsed("YASEEN_SESSION__MAX_SESSIONS", &mut config.session.max_sessions);
    override_parsed(
        "YASEEN_SESSION__SWEEP_INTERVAL_SECS",
        &mut config.session.sweep_interval_secs,
    );

    // Assistant
    if let Ok(val) = std::env::var("YASEEN_ASSISTANT__NAME") {
        config.assistant.name = val;
    }
    if let Ok(val) = std::env::var("YASEEN_ASSISTANT__MODERATION_ENABLED") {
        config.assistant.moderation_enabled = val == "true" || val == "1";
    }
    override_parsed(
        "YASEEN_ASSISTANT__CONFIDENCE_THRESHOLD",
        &mut config.assistant.confidence_threshold,
    );

    config
}

/// Overwrite `target` with the parsed value of `var`; unparseable values are ignored.
fn override_parsed<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(val) = std::env::var(var) {
        match val.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!("Ignoring {var}={val:?}: not a valid value"),
        }
    }
}

/// Clamp values that have a fixed valid range.
fn normalize(mut config: Config) -> Config {
    let threshold = config.assistant.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        let clamped = if threshold.is_nan() { 0.25 } else { threshold.clamp(0.0, 1.0) };
        warn!("confidenceThreshold {threshold} out of range, using {clamped}");
        config.assistant.confidence_threshold = clamped;
    }
    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
