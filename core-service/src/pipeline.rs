//! Update boundary between the debouncer and the reconciler.
//!
//! Every per-update failure stops here as a log line so the watch loop keeps
//! running.

use std::path::Path;

use async_trait::async_trait;
use core_metadata::now_playing::{read_state, NowPlayingState};
use core_presence::Reconciler;
use core_watch::StateHandler;
use tracing::{debug, error, info, warn};

/// Feeds parsed states into a [`Reconciler`]
pub struct PresencePipeline {
    reconciler: Reconciler,
}

impl PresencePipeline {
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Publish whatever the file holds right now
    ///
    /// An unreadable file counts as "not playing" without touching the
    /// presence service.
    pub async fn sync_startup(&mut self, path: &Path) {
        match read_state(path).await {
            Ok(state) => self.apply(state).await,
            Err(e) => {
                debug!(path = %path.display(), "Initial read failed: {}", e);
                self.reconciler.prime(NowPlayingState::not_playing());
            }
        }
    }

    pub async fn apply(&mut self, state: NowPlayingState) {
        match self.reconciler.reconcile(state).await {
            Ok(true) => debug!("Presence reconciled"),
            Ok(false) => {}
            Err(e) => error!("Error updating presence: {}", e),
        }
    }

    /// Close the presence session, logging failures
    pub async fn shutdown(&mut self) {
        info!("Shutting down presence");
        if let Err(e) = self.reconciler.shutdown().await {
            warn!("Failed to close presence session: {}", e);
        }
    }
}

#[async_trait]
impl StateHandler for PresencePipeline {
    async fn on_state(&mut self, state: NowPlayingState) {
        self.apply(state).await;
    }
}
