//! Session store: bounded, in-memory conversation history.
//!
//! Sessions live only for the lifetime of the process. The store keeps at most
//! `maxSessions` conversations, evicting the least recently used one when a new
//! conversation would exceed that bound, and drops conversations idle longer
//! than `sessionTimeoutMinutes` whenever a context is resolved.

pub mod clock;
pub mod store;
pub mod sweeper;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{generate_session_id, ResolvedContext, Session, SessionStats, SessionStore};
pub use sweeper::SessionSweeper;
pub use window::truncate_context;
