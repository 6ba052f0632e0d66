//! In-memory session store with LRU eviction and inactivity expiry.
//!
//! One mutex guards the whole store, so every operation is a single critical
//! section: no caller ever sees half of an appended exchange. Nothing in here
//! performs I/O; the longest hold is an expiry sweep over all sessions.
//!
//! Recency is tracked with a monotonically increasing touch counter. Each
//! entry remembers its counter, and `recency` maps counter → id, so the
//! least-recently-used session is always the first key of the ordered index.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::window::{truncate_context, truncate_in_place};
use crate::config::SessionConfig;
use crate::types::{ChatRequest, Message, RequestError};
use crate::utils::truncate_string;

// ─────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────

/// One conversation held by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Message history, oldest first.
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    /// Never moves backwards, even if the clock does.
    pub last_accessed: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: Vec::new(),
            created_at: now,
            last_accessed: now,
        }
    }
}

/// Context window chosen for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedContext {
    pub messages: Vec<Message>,
    /// The session id exactly as the caller supplied it.
    pub session_id: Option<String>,
}

/// Point-in-time counters for observability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    /// Sessions not yet past the inactivity timeout.
    pub active_sessions: usize,
    pub max_sessions: usize,
    pub max_context_messages: usize,
}

/// Generate a short session identifier (8 hex chars).
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

// ─────────────────────────────────────────────
// Internal state
// ─────────────────────────────────────────────

struct Entry {
    session: Session,
    tick: u64,
}

#[derive(Default)]
struct StoreState {
    entries: HashMap<String, Entry>,
    recency: BTreeMap<u64, String>,
    next_tick: u64,
}

impl StoreState {
    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    /// Mark `id` as most recently used, creating it if needed.
    fn touch_or_insert(&mut self, id: &str, now: DateTime<Utc>) -> &mut Session {
        let tick = self.bump();
        let entry = self.entries.entry(id.to_string()).or_insert_with(|| Entry {
            session: Session::new(now),
            tick,
        });
        if entry.tick != tick {
            self.recency.remove(&entry.tick);
            entry.tick = tick;
        }
        self.recency.insert(tick, id.to_string());
        entry.session.last_accessed = entry.session.last_accessed.max(now);
        &mut entry.session
    }

    fn touch(&mut self, id: &str, now: DateTime<Utc>) -> Option<&mut Session> {
        if !self.entries.contains_key(id) {
            return None;
        }
        Some(self.touch_or_insert(id, now))
    }

    fn remove(&mut self, id: &str) -> Option<Session> {
        let entry = self.entries.remove(id)?;
        self.recency.remove(&entry.tick);
        Some(entry.session)
    }

    fn pop_lru(&mut self) -> Option<(String, Session)> {
        let (_, id) = self.recency.pop_first()?;
        let entry = self.entries.remove(&id)?;
        Some((id, entry.session))
    }
}

// ─────────────────────────────────────────────
// SessionStore
// ─────────────────────────────────────────────

/// Bounded, recency-ordered conversation history.
///
/// Construct one per process at startup and share it behind an `Arc`.
pub struct SessionStore {
    max_context_messages: usize,
    max_sessions: usize,
    session_timeout: TimeDelta,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
}

impl SessionStore {
    /// Create a store that reads time from the system clock.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        let max_sessions = if config.max_sessions == 0 {
            warn!("maxSessions is 0; keeping at most one session");
            1
        } else {
            config.max_sessions
        };
        let session_timeout =
            TimeDelta::from_std(config.session_timeout()).unwrap_or(TimeDelta::MAX);

        Self {
            max_context_messages: config.max_context_messages,
            max_sessions,
            session_timeout,
            clock,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn max_context_messages(&self) -> usize {
        self.max_context_messages
    }

    pub fn session_timeout(&self) -> TimeDelta {
        self.session_timeout
    }

    /// Pick the context window for a request.
    ///
    /// Expired sessions are swept first. A non-empty `messages` list overrides
    /// stored history and leaves the referenced session untouched. Otherwise a
    /// known `session_id` is marked as recently used and its (truncated)
    /// history returned. Unknown or absent ids yield an empty context.
    /// `current_query` is only used for logging.
    pub fn resolve_context(
        &self,
        session_id: Option<&str>,
        messages: Option<&[Message]>,
        current_query: &str,
    ) -> ResolvedContext {
        let now = self.clock.now();
        let mut state = self.lock();
        self.sweep_expired(&mut state, now);

        let given_id = session_id.map(str::to_string);
        debug!(query = %truncate_string(current_query, 60), "resolving context");

        if let Some(explicit) = messages.filter(|m| !m.is_empty()) {
            let context = truncate_context(explicit, self.max_context_messages);
            debug!(messages = context.len(), "using caller-supplied context");
            return ResolvedContext {
                messages: context,
                session_id: given_id,
            };
        }

        if let Some(id) = session_id.filter(|id| !id.is_empty()) {
            if let Some(session) = state.touch(id, now) {
                let context = truncate_context(&session.messages, self.max_context_messages);
                debug!(session_id = %id, messages = context.len(), "resolved session context");
                return ResolvedContext {
                    messages: context,
                    session_id: given_id,
                };
            }
        }

        debug!("no conversation context available");
        ResolvedContext {
            messages: Vec::new(),
            session_id: given_id,
        }
    }

    /// Validate a chat request and resolve its context.
    pub fn resolve_request(
        &self,
        request: &mut ChatRequest,
    ) -> Result<ResolvedContext, RequestError> {
        request.validate()?;
        Ok(self.resolve_context(
            request.session_id.as_deref(),
            request.messages.as_deref(),
            &request.query,
        ))
    }

    /// Append a completed user/assistant exchange and return the session id.
    ///
    /// An absent or empty id starts a new session. Creating a session while the
    /// store is full evicts the least-recently-used one. Stored history is
    /// truncated to the context window afterwards. This does not sweep expired
    /// sessions; that happens on the read path.
    pub fn record_exchange(
        &self,
        session_id: Option<&str>,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) -> String {
        let id = match session_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => generate_session_id(),
        };

        let now = self.clock.now();
        let mut state = self.lock();

        if !state.entries.contains_key(&id) {
            while state.entries.len() >= self.max_sessions {
                match state.pop_lru() {
                    Some((evicted, _)) => {
                        info!(session_id = %evicted, "evicted least-recently-used session")
                    }
                    None => break,
                }
            }
            info!(session_id = %id, "created new session");
        }

        let session = state.touch_or_insert(&id, now);
        session.messages.push(Message::user(user_text));
        session.messages.push(Message::assistant(assistant_text));
        truncate_in_place(&mut session.messages, self.max_context_messages);

        debug!(session_id = %id, messages = session.messages.len(), "recorded exchange");
        id
    }

    /// Remove every session idle for longer than the timeout.
    ///
    /// Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock();
        self.sweep_expired(&mut state, now)
    }

    pub fn stats(&self) -> SessionStats {
        let now = self.clock.now();
        let state = self.lock();
        let active_sessions = state
            .entries
            .values()
            .filter(|e| !self.is_expired(&e.session, now))
            .count();

        SessionStats {
            total_sessions: state.entries.len(),
            active_sessions,
            max_sessions: self.max_sessions,
            max_context_messages: self.max_context_messages,
        }
    }

    /// Whether `id` is stored and not yet expired. Does not affect recency
    /// and does not remove anything.
    pub fn contains(&self, id: &str) -> bool {
        let now = self.clock.now();
        self.lock()
            .entries
            .get(id)
            .is_some_and(|e| !self.is_expired(&e.session, now))
    }

    /// Copy of a live session's record. Expired sessions read as absent even
    /// before a sweep removes them. Does not affect recency.
    pub fn peek(&self, id: &str) -> Option<Session> {
        let now = self.clock.now();
        self.lock()
            .entries
            .get(id)
            .filter(|e| !self.is_expired(&e.session, now))
            .map(|e| e.session.clone())
    }

    /// Delete a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            info!(session_id = %id, "removed session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.last_accessed > self.session_timeout
    }

    fn sweep_expired(&self, state: &mut StoreState, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, e)| self.is_expired(&e.session, now))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            state.remove(id);
            info!(session_id = %id, "cleaned up expired session");
        }
        expired.len()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
