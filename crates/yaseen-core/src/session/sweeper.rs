//! Background expiry sweeper.
//!
//! Expiry already runs on every context resolution. The sweeper is an optional
//! extra for deployments with long quiet periods, where idle sessions would
//! otherwise hold memory until the next read.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info};

use super::store::SessionStore;

/// Periodically removes expired sessions from a shared store.
pub struct SessionSweeper {
    store: Arc<SessionStore>,
    /// `None` disables sweeping; `start` then just waits for `stop`.
    interval: Option<Duration>,
    shutdown: Arc<Notify>,
}

impl SessionSweeper {
    pub fn new(store: Arc<SessionStore>, interval: Option<Duration>) -> Self {
        Self {
            store,
            interval: interval.filter(|d| !d.is_zero()),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Run the sweep loop until `stop()` is called.
    pub async fn start(&self) -> anyhow::Result<()> {
        let Some(interval) = self.interval else {
            info!("session sweeper disabled");
            self.shutdown.notified().await;
            return Ok(());
        };

        info!(interval_s = interval.as_secs_f64(), "session sweeper started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    self.tick();
                }
                _ = self.shutdown.notified() => {
                    info!("session sweeper shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Stop the sweep loop. Safe to call before `start` is polled.
    pub fn stop(&self) {
        info!("stopping session sweeper");
        self.shutdown.notify_one();
    }

    /// Run one sweep immediately. Returns the number of sessions removed.
    pub fn tick(&self) -> usize {
        let removed = self.store.cleanup_expired();
        if removed > 0 {
            info!(removed, remaining = self.store.len(), "sweep removed expired sessions");
        } else {
            debug!("sweep: nothing expired");
        }
        removed
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
