//! Polling loop with explicit cancellation.
//!
//! The daemon runs a fixed-period tick (fetch, build, render) until a
//! shutdown token flips or a tick fails. Using a watch channel as the token
//! lets tests cancel the loop deterministically, and tokio's paused clock
//! drives the cadence without real sleeps.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::Result;

/// Create a shutdown token pair. Send `true` to stop the loop.
pub fn shutdown_token() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Fixed-period tick driver
pub struct Scheduler {
    period: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Scheduler {
    pub fn new(period: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self { period, shutdown }
    }

    /// Run `tick` immediately and then every period, until cancellation or
    /// the first tick error. The error is not swallowed: recoverability
    /// decisions belong to the caller.
    pub async fn run<F, Fut>(mut self, mut tick: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    debug!("Scheduler tick");
                    tick().await?;
                }
                changed = self.shutdown.changed() => {
                    // A dropped sender counts as shutdown too
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("Scheduler stopping");
                        return Ok(());
                    }
                }
            }
        }
    }
}
