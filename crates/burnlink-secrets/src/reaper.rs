//! Background removal of expired, never-redeemed shares.
//!
//! Expiry is already enforced lazily by [`SecretStore::consume`]; the reaper
//! only bounds how long dead ciphertext and keys sit in the backend. It never
//! logs which shares it removed, only how many.

use std::sync::Arc;
use std::time::Duration;

use burnlink_core::config::ReaperConfig;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::SecretStore;

/// Periodic sweeper over a [`SecretStore`].
pub struct ExpiryReaper {
    store: Arc<dyn SecretStore>,
    interval: Duration,
}

/// Shortest interval the sweep loop will run at.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

impl ExpiryReaper {
    /// An interval below one second is raised to one second.
    pub fn new(store: Arc<dyn SecretStore>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn from_config(store: Arc<dyn SecretStore>, config: &ReaperConfig) -> Self {
        Self::new(store, config.interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single sweep. Returns the number of shares removed.
    pub async fn sweep_once(&self) -> Result<usize> {
        let removed = self.store.sweep_expired().await?;
        if removed > 0 {
            debug!(removed, "reaped expired shares");
        }
        Ok(removed)
    }

    /// Spawn the sweep loop on the current Tokio runtime.
    ///
    /// The first sweep happens one full interval after spawning. Errors from a
    /// sweep are logged and the loop keeps going.
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "expiry reaper started");
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // skip first immediate tick

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        info!("expiry reaper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = self.sweep_once().await {
                            warn!(error = %e, "expiry sweep failed");
                        }
                    }
                }
            }
        });

        ReaperHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to a running reaper. Dropping it also stops the loop, but without
/// waiting for the task to finish.
pub struct ReaperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Stop the loop and wait for the task to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "expiry reaper task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
