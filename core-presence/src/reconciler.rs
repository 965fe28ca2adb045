//! Presence Reconciler
//!
//! Drives a [`PresenceTransport`] from successive [`NowPlayingState`]s.
//!
//! ## Connection state machine
//!
//! ```text
//!              playing, connect ok
//! Disconnected ─────────────────────▶ Connected ──┐ playing: set_activity
//!      ▲                                  │  ◀────┘
//!      └──────── NOT_PLAYING: close ──────┘
//! ```
//!
//! Connect and set-activity failures are returned to the caller and never
//! retried here; the next distinct state is the retry. Only a set-activity
//! failure that lost the connection moves back to `Disconnected`; a rejected
//! payload leaves the session and the remembered artwork in place.

use std::sync::Arc;

use bridge_traits::presence::{Activity, ActivityAssets, PresenceTransport};
use core_metadata::{ArtworkStore, NowPlayingState};
use tracing::{debug, info, warn};

use crate::error::{PresenceError, Result};

/// Mutable session owned by a [`Reconciler`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilerSession {
    /// Last state handed to [`Reconciler::reconcile`], `None` before the first
    pub last_state: Option<NowPlayingState>,
    pub connected: bool,
    /// Most recent artwork URL that resolved to a real image
    pub current_art: Option<String>,
}

/// Publishes now-playing state to the presence service
pub struct Reconciler {
    transport: Arc<dyn PresenceTransport>,
    artwork: ArtworkStore,
    session: ReconcilerSession,
    small_image_text: String,
}

impl Reconciler {
    pub fn new(
        transport: Arc<dyn PresenceTransport>,
        artwork: ArtworkStore,
        small_image_text: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            artwork,
            session: ReconcilerSession::default(),
            small_image_text: small_image_text.into(),
        }
    }

    pub fn session(&self) -> &ReconcilerSession {
        &self.session
    }

    pub fn artwork(&self) -> &ArtworkStore {
        &self.artwork
    }

    /// Record `state` as last known without publishing anything
    pub fn prime(&mut self, state: NowPlayingState) {
        self.session.last_state = Some(state);
    }

    /// Publish `state` if it differs from the last known state
    ///
    /// The last known state is replaced before publishing, so a failed attempt
    /// is not repeated until the file changes again.
    ///
    /// Returns `Ok(false)` when the state was unchanged and nothing was sent.
    pub async fn reconcile(&mut self, state: NowPlayingState) -> Result<bool> {
        if self.session.last_state.as_ref() == Some(&state) {
            debug!("State unchanged, skipping update");
            return Ok(false);
        }

        self.session.last_state = Some(state.clone());
        self.update(&state).await?;
        Ok(true)
    }

    /// Apply `state` to the presence service unconditionally
    ///
    /// # Errors
    ///
    /// [`PresenceError::ConnectFailed`] when the session could not be opened,
    /// [`PresenceError::ActivityFailed`] when the service rejected the update.
    pub async fn update(&mut self, state: &NowPlayingState) -> Result<()> {
        if !state.is_playing() {
            self.hide().await;
            return Ok(());
        }

        if !self.session.connected {
            info!("Connecting to presence service");
            self.transport
                .connect()
                .await
                .map_err(PresenceError::ConnectFailed)?;
            self.session.connected = true;
            info!("Connected to presence service");
        }

        let activity = self.build_activity(state).await;

        if let Err(e) = self.transport.set_activity(&activity).await {
            // The transport has already discarded a lost channel
            if e.is_connection_lost() {
                self.session.connected = false;
            }
            return Err(PresenceError::ActivityFailed(e));
        }

        info!(details = %activity.details, state = %activity.state, "Activity updated");
        Ok(())
    }

    /// Build the outward payload for a playing state
    ///
    /// Resolves artwork through the store. When the artwork was supplied but
    /// only the placeholder came back, the last good URL is reused instead.
    pub async fn build_activity(&mut self, state: &NowPlayingState) -> Activity {
        let details = if state.album.is_empty() {
            state.title.clone()
        } else {
            format!("{}: {}", state.album, state.title)
        };

        let mut large_image = self.artwork.default_image().to_string();
        if state.has_artwork() {
            let resolved = self.artwork.resolve(&state.artwork).await;
            if !self.artwork.is_placeholder(&resolved) {
                self.session.current_art = Some(resolved.clone());
                large_image = resolved;
            } else if let Some(previous) = &self.session.current_art {
                debug!("Artwork unresolved, keeping previous image");
                large_image = previous.clone();
            }
        }

        Activity {
            details,
            state: state.artist.clone(),
            assets: Some(ActivityAssets {
                large_image,
                large_text: format!("On {}", state.album),
                small_image: self.artwork.default_image().to_string(),
                small_text: self.small_image_text.clone(),
            }),
        }
    }

    /// Close the presence session if one is open
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.session.connected {
            return Ok(());
        }

        self.session.connected = false;
        self.session.current_art = None;
        self.transport.close().await?;
        info!("Presence session closed");
        Ok(())
    }

    async fn hide(&mut self) {
        if !self.session.connected {
            return;
        }

        self.session.connected = false;
        self.session.current_art = None;
        if let Err(e) = self.transport.close().await {
            warn!("Failed to close presence session: {}", e);
        }
        info!("Playback stopped, activity hidden");
    }
}
