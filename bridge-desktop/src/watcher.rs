//! File Watcher Implementation using notify

use bridge_traits::{
    error::{BridgeError, Result},
    watch::{ChangeEvent, ChangeKind, FileWatcher, WatchStream},
};
use core_async::sync::mpsc;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use tracing::{debug, trace};

/// notify-based file watcher
///
/// Uses the platform's recommended backend (inotify, FSEvents,
/// ReadDirectoryChangesW). The returned stream owns the OS watcher, so
/// dropping the stream stops watching.
#[derive(Debug, Default)]
pub struct NotifyFileWatcher;

impl NotifyFileWatcher {
    pub fn new() -> Self {
        Self
    }
}

impl FileWatcher for NotifyFileWatcher {
    fn watch(&self, path: &Path) -> Result<WatchStream> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let item = match res {
                Ok(event) => {
                    trace!(kind = ?event.kind, "Raw file event");
                    Ok(classify(&event))
                }
                Err(e) => Err(BridgeError::OperationFailed(e.to_string())),
            };
            // Receiver gone means the stream was dropped; nothing to do
            let _ = tx.send(item);
        })
        .map_err(|e| BridgeError::NotAvailable(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to watch {}: {}", path.display(), e))
            })?;

        debug!(path = %path.display(), "Watching file");
        Ok(WatchStream::with_guard(rx, watcher))
    }
}

/// Map a notify event onto the bridge's coarse event kinds
pub fn classify(event: &Event) -> ChangeEvent {
    let kind = match event.kind {
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::ContentWrite
        }
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => ChangeKind::ContentWrite,
        EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Metadata,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
        EventKind::Create(_) => ChangeKind::Create,
        EventKind::Remove(_) => ChangeKind::Remove,
        _ => ChangeKind::Other,
    };

    ChangeEvent {
        kind,
        paths: event.paths.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};
    use std::path::PathBuf;
    use std::time::Duration;

    fn kind_of(kind: EventKind) -> ChangeKind {
        classify(&Event::new(kind)).kind
    }

    #[test]
    fn test_content_writes() {
        assert_eq!(
            kind_of(EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            ChangeKind::ContentWrite
        );
        assert_eq!(
            kind_of(EventKind::Modify(ModifyKind::Data(DataChange::Any))),
            ChangeKind::ContentWrite
        );
        assert_eq!(
            kind_of(EventKind::Modify(ModifyKind::Any)),
            ChangeKind::ContentWrite
        );
        assert_eq!(
            kind_of(EventKind::Access(AccessKind::Close(AccessMode::Write))),
            ChangeKind::ContentWrite
        );
    }

    #[test]
    fn test_other_kinds() {
        assert_eq!(
            kind_of(EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))),
            ChangeKind::Metadata
        );
        assert_eq!(
            kind_of(EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            ChangeKind::Rename
        );
        assert_eq!(kind_of(EventKind::Create(CreateKind::File)), ChangeKind::Create);
        assert_eq!(kind_of(EventKind::Remove(RemoveKind::File)), ChangeKind::Remove);
        assert_eq!(
            kind_of(EventKind::Access(AccessKind::Close(AccessMode::Read))),
            ChangeKind::Other
        );
        assert_eq!(kind_of(EventKind::Any), ChangeKind::Other);
    }

    #[test]
    fn test_paths_are_carried_over() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/now_playing.txt"));

        assert_eq!(
            classify(&event).paths,
            vec![PathBuf::from("/tmp/now_playing.txt")]
        );
    }

    #[test]
    fn test_watch_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = NotifyFileWatcher::new().watch(&dir.path().join("missing.txt"));

        assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
    }

    #[tokio::test]
    async fn test_write_produces_content_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("now_playing.txt");
        std::fs::write(&path, "NOT_PLAYING\n").unwrap();

        let mut stream = NotifyFileWatcher::new().watch(&path).unwrap();
        std::fs::write(&path, "PLAYING\nA\nT\nR\n").unwrap();

        let saw_write = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(item) = stream.next().await {
                if matches!(item, Ok(ref event) if event.kind.is_content_write()) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        assert!(saw_write);
    }
}
