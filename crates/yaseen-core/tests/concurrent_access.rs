//! Concurrent use of one shared `SessionStore`.

use std::sync::Arc;
use std::thread;

use yaseen_core::config::SessionConfig;
use yaseen_core::{Role, SessionStore};

fn shared_store(max_sessions: usize, max_context_messages: usize) -> Arc<SessionStore> {
    let config = SessionConfig {
        max_sessions,
        max_context_messages,
        ..Default::default()
    };
    Arc::new(SessionStore::new(&config))
}

#[test]
fn capacity_holds_under_parallel_creation() {
    let store = shared_store(4, 8);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    store.record_exchange(None, format!("q{i}"), format!("a{i}"));
                    assert!(store.len() <= 4);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = store.stats();
    assert_eq!(stats.total_sessions, 4);
    assert_eq!(stats.max_sessions, 4);
}

#[test]
fn readers_never_see_half_an_exchange() {
    let store = shared_store(64, 6);
    let ids: Vec<String> = (0..8)
        .map(|t| store.record_exchange(Some(format!("conv-{t}").as_str()), "q", "a"))
        .collect();

    let writers: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    store.record_exchange(Some(id.as_str()), format!("q{i}"), format!("a{i}"));
                }
            })
        })
        .collect();

    let readers: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let ctx = store.resolve_context(Some(id.as_str()), None, "peek");
                    assert!(!ctx.messages.is_empty());
                    assert!(ctx.messages.len() <= 6);
                    assert_eq!(ctx.messages.len() % 2, 0);
                    for (i, msg) in ctx.messages.iter().enumerate() {
                        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
                        assert_eq!(msg.role, expected);
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    for id in &ids {
        let ctx = store.resolve_context(Some(id.as_str()), None, "final");
        assert_eq!(ctx.messages.len(), 6);
        assert_eq!(ctx.messages.last().unwrap().content, "a199");
    }
}
