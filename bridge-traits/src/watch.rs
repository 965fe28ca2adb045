//! File Change Notification Abstraction
//!
//! A watcher turns one path into a lazy, non-restartable stream of raw change
//! events. The stream owns whatever OS resources back the watch; dropping it
//! stops watching.

use std::fmt;
use std::path::{Path, PathBuf};

use core_async::sync::mpsc;

use crate::error::Result;

/// Coarse classification of a raw change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File contents were written
    ContentWrite,
    /// Permissions, timestamps, or other metadata changed
    Metadata,
    Create,
    Remove,
    Rename,
    Other,
}

impl ChangeKind {
    pub fn is_content_write(self) -> bool {
        matches!(self, ChangeKind::ContentWrite)
    }
}

/// A single raw change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub paths: Vec<PathBuf>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind) -> Self {
        Self {
            kind,
            paths: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }
}

/// Producer half of a [`WatchStream`]
pub type WatchSender = mpsc::UnboundedSender<Result<ChangeEvent>>;

/// Stream of change events for one watched path
///
/// Error items report watcher-level failures; they do not end the stream.
/// The stream ends when the producer side is dropped.
pub struct WatchStream {
    rx: mpsc::UnboundedReceiver<Result<ChangeEvent>>,
    _guard: Option<Box<dyn Send>>,
}

impl WatchStream {
    /// Create a connected sender/stream pair with nothing keeping an OS watch alive
    pub fn channel() -> (WatchSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx, _guard: None })
    }

    /// Wrap a receiver and keep `guard` alive for as long as the stream exists
    pub fn with_guard(
        rx: mpsc::UnboundedReceiver<Result<ChangeEvent>>,
        guard: impl Send + 'static,
    ) -> Self {
        Self {
            rx,
            _guard: Some(Box::new(guard)),
        }
    }

    /// Wait for the next event; `None` once the producer is gone
    pub async fn next(&mut self) -> Option<Result<ChangeEvent>> {
        self.rx.recv().await
    }
}

impl fmt::Debug for WatchStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchStream")
            .field("guarded", &self._guard.is_some())
            .finish()
    }
}

/// File change notification source
pub trait FileWatcher: Send + Sync {
    /// Start watching a single path
    ///
    /// # Errors
    ///
    /// Fails when the path does not exist or the OS refuses the watch.
    fn watch(&self, path: &Path) -> Result<WatchStream>;
}
