//! Yaseen core: chat types, configuration, and the conversation session store.

pub mod config;
pub mod session;
pub mod types;
pub mod utils;

pub use session::{SessionStats, SessionStore};
pub use types::{ChatRequest, Message, Role};
