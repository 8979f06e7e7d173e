//! Crawl-wide request rate limiting
//!
//! A single ticker releases one permit per interval. Every outbound request,
//! whether a page fetch, a link probe or an asset fetch, waits for a permit.
//! Permits are not banked: a tick that nobody claims is dropped, so a quiet
//! period never turns into a burst.

use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shared rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// `None` when rate limiting is disabled
    ticks: Option<Mutex<mpsc::Receiver<()>>>,
    delay: Duration,
}

impl RateLimiter {
    /// Creates a limiter releasing one permit every `delay`
    ///
    /// A zero delay disables limiting. The ticker task stops when `cancel`
    /// fires or the limiter is dropped. Must be called within a tokio runtime
    /// when `delay` is non-zero.
    pub fn new(delay: Duration, cancel: &CancellationToken) -> Self {
        if delay.is_zero() {
            return Self { ticks: None, delay };
        }

        let (tx, rx) = mpsc::channel(1);
        let cancel = cancel.clone();

        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + delay, delay);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        match tx.try_send(()) {
                            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                            Err(mpsc::error::TrySendError::Closed(())) => break,
                        }
                    }
                }
            }
            tracing::trace!("Rate limiter ticker stopped");
        });

        Self {
            ticks: Some(Mutex::new(rx)),
            delay,
        }
    }

    /// Creates a limiter that never blocks
    pub fn unlimited() -> Self {
        Self {
            ticks: None,
            delay: Duration::ZERO,
        }
    }

    /// Returns the configured interval between permits
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits for the next permit
    ///
    /// Returns `false` if `cancel` fired first or the ticker has stopped, in
    /// which case the caller must not issue its request. An unlimited
    /// limiter always returns `true` at once.
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        let Some(ticks) = &self.ticks else {
            return true;
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            received = async {
                let mut rx = ticks.lock().await;
                rx.recv().await
            } => received.is_some(),
        }
    }
}
