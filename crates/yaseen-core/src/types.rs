//! Core types for Yaseen: chat messages and incoming chat requests.
//!
//! Messages use the OpenAI chat completions shape (`{"role": ..., "content": ...}`)
//! so a context window can be handed to any provider without conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────

/// Author of a chat message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire name of the role (`"user"`, `"assistant"`, `"system"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known role names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown message role: {0:?}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// A single chat message. Has no identity beyond its position in a sequence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a message with an arbitrary role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::new(Role::Assistant, content)
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

// ─────────────────────────────────────────────
// Chat requests
// ─────────────────────────────────────────────

/// Minimum length of a query after trimming surrounding whitespace.
pub const MIN_QUERY_CHARS: usize = 3;

/// Reasons a chat request is rejected before it reaches the session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("query must be at least {min} characters after trimming (got {got})")]
    QueryTooShort { min: usize, got: usize },
}

/// An incoming question with optional conversation context.
///
/// Callers either send the whole history in `messages` or refer to a stored
/// conversation with `session_id`; `messages` wins when both are present.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(default, alias = "session_id", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        ChatRequest {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Trim the query in place and check its length.
    pub fn validate(&mut self) -> Result<(), RequestError> {
        let trimmed = self.query.trim();
        if trimmed.len() != self.query.len() {
            self.query = trimmed.to_string();
        }
        let got = self.query.chars().count();
        if got < MIN_QUERY_CHARS {
            return Err(RequestError::QueryTooShort {
                min: MIN_QUERY_CHARS,
                got,
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
