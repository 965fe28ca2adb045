//! Change Debouncer
//!
//! A single pending timer is re-armed by every content write. When it fires
//! without being re-armed, the file is read and parsed once.
//!
//! ```text
//! events:  W  W W   W                      W
//! timer:   |--|-|---|--------fire          |--------fire
//! ```
//!
//! Event consumption, timer expiry and cancellation are selected together in
//! one loop, so at most one read-and-handle sequence is in flight.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bridge_traits::watch::WatchStream;
use core_async::sync::CancellationToken;
use core_async::time::{self, Duration, Instant};
use core_metadata::now_playing::{read_state, NowPlayingState};
use tracing::{debug, trace, warn};

use crate::error::{Result, WatchError};

/// Quiet interval used when none is configured
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(50);

/// Receives each state read after a burst settles
#[async_trait]
pub trait StateHandler: Send {
    async fn on_state(&mut self, state: NowPlayingState);
}

/// Debounces change events for one file
#[derive(Debug, Clone)]
pub struct ChangeDebouncer {
    path: PathBuf,
    quiet: Duration,
}

impl ChangeDebouncer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quiet: DEFAULT_QUIET_INTERVAL,
        }
    }

    pub fn with_quiet_interval(mut self, quiet: Duration) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Consume `events` until `cancel` fires
    ///
    /// Only content writes arm the timer. Error items from the stream are
    /// logged and skipped. A pending timer is abandoned on cancellation.
    ///
    /// # Errors
    ///
    /// [`WatchError::StreamClosed`] when the event stream ends before
    /// cancellation. A timer pending at that point still fires first.
    pub async fn run<H>(
        &self,
        mut events: WatchStream,
        handler: &mut H,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        H: StateHandler + ?Sized,
    {
        let timer = time::sleep(self.quiet);
        tokio::pin!(timer);
        let mut armed = false;
        let mut open = true;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!(pending = armed, "Debouncer cancelled");
                    return Ok(());
                }

                _ = timer.as_mut(), if armed => {
                    armed = false;
                    self.fire(handler).await;
                    if !open {
                        return Err(WatchError::StreamClosed);
                    }
                }

                event = events.next(), if open => match event {
                    Some(Ok(event)) if event.kind.is_content_write() => {
                        trace!("Content write, re-arming timer");
                        timer.as_mut().reset(Instant::now() + self.quiet);
                        armed = true;
                    }
                    Some(Ok(event)) => {
                        trace!(kind = ?event.kind, "Ignoring change event");
                    }
                    Some(Err(e)) => {
                        warn!("Watcher error: {}", e);
                    }
                    None => {
                        open = false;
                        if !armed {
                            return Err(WatchError::StreamClosed);
                        }
                    }
                },
            }
        }
    }

    async fn fire<H>(&self, handler: &mut H)
    where
        H: StateHandler + ?Sized,
    {
        match read_state(&self.path).await {
            Ok(state) => handler.on_state(state).await,
            // The writer may be mid-write again; its next event retries
            Err(e) => debug!("Skipping unreadable file: {}", e),
        }
    }
}
