//! Per-client fixed window admission control.
//!
//! Each client gets a window that opens on its first request and admits up to
//! `per_minute` requests until it is 60 seconds old, at which point the next
//! request opens a fresh window. A background sweeper drops windows that have
//! aged out so idle clients do not accumulate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::constants::rate_limit::WINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allow,
    Reject { retry_after: Duration },
}

impl RateDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    started_at: Instant,
}

pub struct RateLimiter {
    per_minute: u32,
    window: Duration,
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(per_minute: u32) -> Self {
        Self::with_window(per_minute, WINDOW)
    }

    #[must_use]
    pub fn with_window(per_minute: u32, window: Duration) -> Self {
        Self {
            per_minute: per_minute.max(1),
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request for `client_id` and decides whether to admit it.
    pub fn check(&self, client_id: &str) -> RateDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(window) = windows.get_mut(client_id) else {
            windows.insert(
                client_id.to_string(),
                RateWindow {
                    count: 1,
                    started_at: now,
                },
            );
            return RateDecision::Allow;
        };

        let age = now.duration_since(window.started_at);
        if age >= self.window {
            *window = RateWindow {
                count: 1,
                started_at: now,
            };
            return RateDecision::Allow;
        }

        if window.count < self.per_minute {
            window.count += 1;
            return RateDecision::Allow;
        }

        RateDecision::Reject {
            retry_after: self.window - age,
        }
    }

    /// Removes every window that has aged out. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);
        before - windows.len()
    }

    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Starts the periodic sweep on the current runtime.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let limiter = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            info!("Rate limit sweeper started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let removed = limiter.sweep();
                        if removed > 0 {
                            debug!("Rate limit sweep dropped {} idle clients", removed);
                        }
                    }
                }
            }

            info!("Rate limit sweeper stopped");
        });

        SweeperHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Owner of the background sweep task. Dropping the handle also stops the
/// task, but only [`SweeperHandle::shutdown`] waits for it to finish.
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Err(e) = self.task.await {
            warn!("Rate limit sweeper ended abnormally: {}", e);
        }
    }
}
