//! Context window truncation.
//!
//! A window keeps the most recent `max` messages and then drops leading
//! assistant replies, so the model never sees an answer without the question
//! that prompted it. A non-empty window is never reduced to nothing by that
//! second step.

use tracing::debug;

use crate::types::Message;

/// Index of the first message that belongs in the window.
pub fn window_start(messages: &[Message], max: usize) -> usize {
    let len = messages.len();
    if len <= max {
        return 0;
    }

    let mut start = len - max;
    while start + 1 < len && messages[start].is_assistant() {
        start += 1;
    }
    start
}

/// Return the context window for `messages` without modifying them.
pub fn truncate_context(messages: &[Message], max: usize) -> Vec<Message> {
    let start = window_start(messages, max);
    if start > 0 {
        debug!(
            from = messages.len(),
            to = messages.len() - start,
            "truncated context window"
        );
    }
    messages[start..].to_vec()
}

/// Truncate `messages` in place, dropping everything before the window.
pub fn truncate_in_place(messages: &mut Vec<Message>, max: usize) {
    let start = window_start(messages, max);
    if start > 0 {
        debug!(
            from = messages.len(),
            to = messages.len() - start,
            "truncated stored history"
        );
        messages.drain(..start);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
