//! Expired token cleanup
//!
//! This module provides a background task that periodically deletes token
//! rows whose expiry has passed. Lookup already treats expired tokens as
//! absent, so the task only bounds storage growth.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::database::Database;

use super::manager::AuthManager;

/// Periodic purger for expired tokens
pub struct TokenPurger<D: Database> {
    auth: Arc<AuthManager<D>>,
    interval: Duration,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<D: Database + 'static> TokenPurger<D> {
    /// Create a new purger
    ///
    /// An interval of zero disables purging entirely.
    pub fn new(
        auth: Arc<AuthManager<D>>,
        interval: Duration,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            auth,
            interval,
            shutdown_rx,
        }
    }

    /// Run the purge loop until shutdown is signaled
    pub async fn run(mut self) {
        if self.interval.is_zero() {
            info!("Token purging disabled");
            return;
        }

        info!(
            interval_secs = self.interval.as_secs(),
            "Starting token purge task"
        );

        let mut interval_timer = interval_at(Instant::now() + self.interval, self.interval);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("Shutdown signal received, stopping token purge task");
                    break;
                }
                _ = interval_timer.tick() => {
                    match self.auth.purge_expired().await {
                        Ok(0) => debug!("No expired tokens to purge"),
                        Ok(removed) => info!(count = removed, "Purged expired tokens"),
                        Err(err) => warn!(error = %err, "Token purge failed"),
                    }
                }
            }
        }
    }
}
