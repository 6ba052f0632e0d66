//! `yaseen replay`: push a recorded transcript through the session store.
//!
//! Each turn is handled the way the chat endpoint handles a request: resolve
//! the context window first, then record the completed exchange.
//!
//! A turn continues a session either by naming its `sessionId` directly or by
//! naming a `conversation` label. The first turn of a label starts a new
//! session and later turns with that label reuse the generated id. An explicit
//! `sessionId` wins over the label.
//!
//! ```json
//! [
//!   { "sessionId": "abc12345", "user": "What is sabr?", "assistant": "Patience..." },
//!   { "sessionId": "abc12345", "user": "Give an example", "assistant": "..." },
//!   { "conversation": "alice", "user": "Another thread", "assistant": "..." },
//!   { "user": "One-off question", "assistant": "...", "messages": [] }
//! ]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use yaseen_core::session::{SessionStats, SessionStore};
use yaseen_core::{ChatRequest, Message};

/// One recorded turn of a transcript.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Turn {
    /// Session to continue. Unknown ids are adopted by the store.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Local label mapped to the session generated for its first turn.
    #[serde(default)]
    pub conversation: Option<String>,
    pub user: String,
    pub assistant: String,
    /// Caller-supplied history that overrides the stored session.
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

/// Outcome of one replayed turn.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub conversation: Option<String>,
    /// `None` when the turn was rejected.
    pub session_id: Option<String>,
    pub context_messages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub turns: Vec<TurnReport>,
    pub stats: SessionStats,
}

pub fn parse_transcript(content: &str) -> serde_json::Result<Vec<Turn>> {
    serde_json::from_str(content)
}

/// Replay `turns` against `store` in order.
pub fn replay(store: &SessionStore, turns: &[Turn]) -> ReplayReport {
    let mut sessions: HashMap<String, String> = HashMap::new();
    let mut reports = Vec::with_capacity(turns.len());

    for turn in turns {
        let known_id = turn.session_id.clone().or_else(|| {
            turn.conversation
                .as_ref()
                .and_then(|label| sessions.get(label).cloned())
        });

        let mut request = ChatRequest {
            query: turn.user.clone(),
            messages: turn.messages.clone(),
            session_id: known_id,
        };

        let context = match store.resolve_request(&mut request) {
            Ok(context) => context,
            Err(e) => {
                warn!(conversation = ?turn.conversation, "skipping turn: {e}");
                reports.push(TurnReport {
                    conversation: turn.conversation.clone(),
                    session_id: None,
                    context_messages: 0,
                    rejected: Some(e.to_string()),
                });
                continue;
            }
        };

        let session_id = store.record_exchange(
            context.session_id.as_deref(),
            request.query.as_str(),
            turn.assistant.as_str(),
        );
        if let Some(label) = &turn.conversation {
            sessions.insert(label.clone(), session_id.clone());
        }

        reports.push(TurnReport {
            conversation: turn.conversation.clone(),
            session_id: Some(session_id),
            context_messages: context.messages.len(),
            rejected: None,
        });
    }

    ReplayReport {
        turns: reports,
        stats: store.stats(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use yaseen_core::config::SessionConfig;

    fn make_store(max_sessions: usize, max_context_messages: usize) -> SessionStore {
        SessionStore::new(&SessionConfig {
            max_sessions,
            max_context_messages,
            ..Default::default()
        })
    }

    fn turn(conversation: Option<&str>, user: &str) -> Turn {
        Turn {
            session_id: None,
            conversation: conversation.map(str::to_string),
            user: user.to_string(),
            assistant: format!("answer to {user}"),
            messages: None,
        }
    }

    #[test]
    fn parse_minimal_transcript() {
        let turns = parse_transcript(
            r#"[{"user": "what is sabr?", "assistant": "patience"},
                {"conversation": "a", "user": "more", "assistant": "x",
                 "messages": [{"role": "user", "content": "earlier"}]}]"#,
        )
        .unwrap();
        assert_eq!(turns.len(), 2);
        assert!(turns[0].conversation.is_none());
        assert_eq!(turns[1].messages.as_ref().unwrap()[0], Message::user("earlier"));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(parse_transcript(r#"[{"user": "only a question"}]"#).is_err());
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let err = parse_transcript(
            r#"[{"sesionId": "abc", "user": "question", "assistant": "x"}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn session_id_transcript_shares_history() {
        let store = make_store(10, 8);
        let turns = parse_transcript(
            r#"[{"sessionId": "abc12345", "user": "what is sabr?", "assistant": "patience"},
                {"sessionId": "abc12345", "user": "give an example", "assistant": "..."}]"#,
        )
        .unwrap();

        let report = replay(&store, &turns);
        let ids: Vec<_> = report.turns.iter().map(|t| t.session_id.clone()).collect();
        assert_eq!(
            ids,
            vec![Some("abc12345".to_string()), Some("abc12345".to_string())]
        );
        let sizes: Vec<usize> = report.turns.iter().map(|t| t.context_messages).collect();
        assert_eq!(sizes, vec![0, 2]);
        assert_eq!(report.stats.total_sessions, 1);
    }

    #[test]
    fn session_id_wins_over_label() {
        let store = make_store(10, 8);
        let mut pinned = turn(Some("alice"), "second question");
        pinned.session_id = Some("fixed-id".to_string());

        let report = replay(&store, &[turn(Some("alice"), "first question"), pinned]);
        assert_eq!(report.turns[1].session_id.as_deref(), Some("fixed-id"));
        assert_eq!(report.turns[1].context_messages, 0);
        assert_eq!(report.stats.total_sessions, 2);
    }

    #[test]
    fn conversation_context_grows() {
        let store = make_store(10, 8);
        let turns = vec![
            turn(Some("alice"), "first question"),
            turn(Some("alice"), "second question"),
            turn(Some("alice"), "third question"),
        ];

        let report = replay(&store, &turns);
        let sizes: Vec<usize> = report.turns.iter().map(|t| t.context_messages).collect();
        assert_eq!(sizes, vec![0, 2, 4]);

        let ids: Vec<_> = report.turns.iter().map(|t| t.session_id.clone()).collect();
        assert!(ids.iter().all(|id| id == &ids[0]));
        assert_eq!(report.stats.total_sessions, 1);
    }

    #[test]
    fn unlabeled_turns_get_fresh_sessions() {
        let store = make_store(10, 8);
        let report = replay(&store, &[turn(None, "one-off"), turn(None, "another")]);
        assert_ne!(report.turns[0].session_id, report.turns[1].session_id);
        assert_eq!(report.stats.total_sessions, 2);
    }

    #[test]
    fn short_queries_are_rejected() {
        let store = make_store(10, 8);
        let report = replay(&store, &[turn(Some("bob"), "hi")]);
        assert!(report.turns[0].rejected.is_some());
        assert!(report.turns[0].session_id.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn explicit_messages_override_history() {
        let store = make_store(10, 8);
        let mut with_history = turn(Some("carol"), "follow-up");
        with_history.messages = Some(vec![
            Message::user("a"),
            Message::assistant("b"),
            Message::user("c"),
        ]);

        let report = replay(&store, &[turn(Some("carol"), "opening"), with_history]);
        assert_eq!(report.turns[1].context_messages, 3);
        assert_eq!(report.turns[0].session_id, report.turns[1].session_id);
    }

    #[test]
    fn capacity_respected() {
        let store = make_store(2, 8);
        let turns: Vec<Turn> = ["x", "y", "z"]
            .iter()
            .map(|label| turn(Some(*label), "question"))
            .collect();
        let report = replay(&store, &turns);
        assert_eq!(report.stats.total_sessions, 2);
    }
}
