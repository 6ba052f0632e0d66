//! Configuration schema.
//!
//! Hierarchy: `Config` → `SessionConfig`, `AssistantConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.yaseen/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub session: SessionConfig,
    pub assistant: AssistantConfig,
}

// ─────────────────────────────────────────────
// Session store
// ─────────────────────────────────────────────

/// Limits for the in-memory session store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Size of the trimmed context window handed to the model.
    pub max_context_messages: usize,
    /// Minutes of inactivity before a session expires.
    pub session_timeout_minutes: u64,
    /// Capacity bound; the least-recently-used session is evicted beyond it.
    pub max_sessions: usize,
    /// Background sweep period in seconds. `0` leaves expiry to the read path.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_context_messages: 8,
            session_timeout_minutes: 60,
            max_sessions: 1000,
            sweep_interval_secs: 0,
        }
    }
}

impl SessionConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_minutes.saturating_mul(60))
    }

    /// `None` when the background sweeper is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

// ─────────────────────────────────────────────
// Assistant
// ─────────────────────────────────────────────

/// Behaviour toggles for the assistant front-end.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantConfig {
    /// Display name of the assistant.
    pub name: String,
    /// Run input/output through the moderation service.
    pub moderation_enabled: bool,
    /// Retrieval confidence below which the assistant declines to answer (0.0 – 1.0).
    pub confidence_threshold: f64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "Yaseen".to_string(),
            moderation_enabled: true,
            confidence_threshold: 0.25,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.session.max_context_messages, 8);
        assert_eq!(config.session.session_timeout_minutes, 60);
        assert_eq!(config.session.max_sessions, 1000);
        assert_eq!(config.assistant.name, "Yaseen");
        assert!(config.assistant.moderation_enabled);
    }

    #[test]
    fn test_session_timeout_duration() {
        let cfg = SessionConfig {
            session_timeout_minutes: 2,
            ..Default::default()
        };
        assert_eq!(cfg.session_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_sweep_interval_disabled_by_default() {
        assert!(SessionConfig::default().sweep_interval().is_none());
        let cfg = SessionConfig {
            sweep_interval_secs: 30,
            ..Default::default()
        };
        assert_eq!(cfg.sweep_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"session":{"maxSessions":5}}"#).unwrap();
        assert_eq!(config.session.max_sessions, 5);
        assert_eq!(config.session.max_context_messages, 8);
        assert_eq!(config.assistant.confidence_threshold, 0.25);
    }

    #[test]
    fn test_serializes_camel_case() {
        let raw = serde_json::to_value(Config::default()).unwrap();
        assert!(raw["session"].get("maxContextMessages").is_some());
        assert!(raw["assistant"].get("moderationEnabled").is_some());
        assert!(raw["session"].get("max_context_messages").is_none());
    }
}
