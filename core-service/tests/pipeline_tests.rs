//! End-to-end pipeline tests: scripted watch events, a real file on disk,
//! and mocked HTTP and presence bridges.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::presence::{Activity, PresenceTransport};
use bridge_traits::watch::{ChangeEvent, ChangeKind, FileWatcher, WatchSender, WatchStream};
use bytes::Bytes;
use core_async::sync::CancellationToken;
use core_runtime::config::PresenceConfig;
use core_service::{CoreDependencies, CoreError, PresenceService};
use mockall::mock;

mock! {
    pub Transport {}

    #[async_trait]
    impl PresenceTransport for Transport {
        async fn connect(&self) -> BridgeResult<()>;
        async fn set_activity(&self, activity: &Activity) -> BridgeResult<()>;
        async fn close(&self) -> BridgeResult<()>;
    }
}

mock! {
    pub Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

/// Hands out one pre-built stream; later calls fail like a missing file
struct ScriptedWatcher {
    stream: Mutex<Option<WatchStream>>,
}

impl ScriptedWatcher {
    fn new() -> (WatchSender, Self) {
        let (tx, stream) = WatchStream::channel();
        (
            tx,
            Self {
                stream: Mutex::new(Some(stream)),
            },
        )
    }
}

impl FileWatcher for ScriptedWatcher {
    fn watch(&self, _path: &Path) -> BridgeResult<WatchStream> {
        self.stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::NotAvailable("no such file".to_string()))
    }
}

const QUIET: Duration = Duration::from_millis(20);
const SETTLE: Duration = Duration::from_millis(250);

fn config(path: &Path) -> PresenceConfig {
    PresenceConfig::builder()
        .watch_path(path)
        .debounce(QUIET)
        .build()
        .unwrap()
}

fn large_image(activity: &Activity) -> String {
    activity
        .assets
        .as_ref()
        .map(|a| a.large_image.clone())
        .unwrap_or_default()
}

fn no_http() -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute().never();
    http
}

fn write_event(tx: &WatchSender) {
    tx.send(Ok(ChangeEvent::new(ChangeKind::ContentWrite))).unwrap();
}

#[tokio::test]
async fn test_startup_publishes_then_stop_hides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");
    std::fs::write(&path, "PLAYING\nMyAlbum\nMySong\nMyArtist\n").unwrap();

    let mut transport = MockTransport::new();
    transport.expect_connect().times(1).returning(|| Ok(()));
    transport
        .expect_set_activity()
        .withf(|a| {
            a.details == "MyAlbum: MySong" && a.state == "MyArtist" && large_image(a) == "vlc"
        })
        .times(1)
        .returning(|_| Ok(()));
    transport.expect_close().times(1).returning(|| Ok(()));

    let (tx, watcher) = ScriptedWatcher::new();
    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(no_http()), Arc::new(transport), Arc::new(watcher)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { service.run(cancel).await }
    });

    tokio::time::sleep(SETTLE).await;

    std::fs::write(&path, "NOT_PLAYING\n\n\n\n").unwrap();
    write_event(&tx);
    tokio::time::sleep(SETTLE).await;

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unchanged_content_is_not_republished() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");
    std::fs::write(&path, "PLAYING\nA\nT\nR\n").unwrap();

    let mut transport = MockTransport::new();
    transport.expect_connect().times(1).returning(|| Ok(()));
    transport.expect_set_activity().times(1).returning(|_| Ok(()));
    // Closed on shutdown because the session is still open
    transport.expect_close().times(1).returning(|| Ok(()));

    let (tx, watcher) = ScriptedWatcher::new();
    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(no_http()), Arc::new(transport), Arc::new(watcher)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { service.run(cancel).await }
    });

    tokio::time::sleep(SETTLE).await;

    // Same bytes rewritten, plus a metadata-only event
    std::fs::write(&path, "PLAYING\nA\nT\nR\n").unwrap();
    write_event(&tx);
    tx.send(Ok(ChangeEvent::new(ChangeKind::Metadata))).unwrap();
    tokio::time::sleep(SETTLE).await;

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_missing_file_at_startup_counts_as_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");

    let mut transport = MockTransport::new();
    transport.expect_connect().never();
    transport.expect_set_activity().never();
    transport.expect_close().never();

    let (tx, watcher) = ScriptedWatcher::new();
    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(no_http()), Arc::new(transport), Arc::new(watcher)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { service.run(cancel).await }
    });

    tokio::time::sleep(SETTLE).await;
    std::fs::write(&path, "NOT_PLAYING\n\n\n\n").unwrap();
    write_event(&tx);
    tokio::time::sleep(SETTLE).await;

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_artwork_uploaded_once_across_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");
    // "Y292ZXI=" is base64 for "cover"
    std::fs::write(&path, "PLAYING\nAlbum\nFirst\nArtist\nY292ZXI=\n").unwrap();

    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(|request| {
            request.url == "https://catbox.moe/user/api.php"
                && request
                    .form
                    .as_ref()
                    .and_then(|f| f.text_value("reqtype"))
                    == Some("fileupload")
        })
        .times(1)
        .returning(|_| {
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(b"https://files.catbox.moe/cover.jpg"),
            })
        });

    let published = Arc::new(Mutex::new(Vec::new()));
    let mut transport = MockTransport::new();
    transport.expect_connect().times(1).returning(|| Ok(()));
    transport.expect_set_activity().times(2).returning({
        let published = Arc::clone(&published);
        move |a| {
            published.lock().unwrap().push(a.clone());
            Ok(())
        }
    });
    transport.expect_close().times(1).returning(|| Ok(()));

    let (tx, watcher) = ScriptedWatcher::new();
    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(http), Arc::new(transport), Arc::new(watcher)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { service.run(cancel).await }
    });

    tokio::time::sleep(SETTLE).await;
    std::fs::write(&path, "PLAYING\nAlbum\nSecond\nArtist\nY292ZXI=\n").unwrap();
    write_event(&tx);
    tokio::time::sleep(SETTLE).await;

    cancel.cancel();
    handle.await.unwrap().unwrap();

    let published = published.lock().unwrap();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].details, "Album: First");
    assert_eq!(published[1].details, "Album: Second");
    for activity in published.iter() {
        assert_eq!(large_image(activity), "https://files.catbox.moe/cover.jpg");
    }
}

#[tokio::test]
async fn test_connect_failure_is_logged_and_next_change_retries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");
    std::fs::write(&path, "PLAYING\nA\nFirst\nR\n").unwrap();

    let mut transport = MockTransport::new();
    let mut seq = mockall::Sequence::new();
    transport
        .expect_connect()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(BridgeError::NotAvailable("Discord is not running".to_string())));
    transport
        .expect_connect()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    transport
        .expect_set_activity()
        .withf(|a| a.details == "A: Second")
        .times(1)
        .returning(|_| Ok(()));
    transport.expect_close().times(1).returning(|| Ok(()));

    let (tx, watcher) = ScriptedWatcher::new();
    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(no_http()), Arc::new(transport), Arc::new(watcher)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { service.run(cancel).await }
    });

    tokio::time::sleep(SETTLE).await;
    std::fs::write(&path, "PLAYING\nA\nSecond\nR\n").unwrap();
    write_event(&tx);
    tokio::time::sleep(SETTLE).await;

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_watch_attach_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");

    let mut transport = MockTransport::new();
    transport.expect_connect().never();

    let (_tx, watcher) = ScriptedWatcher::new();
    // Consume the only stream so the service's attach fails
    watcher.watch(&path).unwrap();

    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(no_http()), Arc::new(transport), Arc::new(watcher)),
    );

    let result = service.run(CancellationToken::new()).await;
    assert!(matches!(result, Err(CoreError::WatchAttach { .. })));
}

#[tokio::test]
async fn test_closed_watch_stream_ends_run_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("now_playing.txt");

    let transport = MockTransport::new();
    let (tx, watcher) = ScriptedWatcher::new();
    drop(tx);

    let service = PresenceService::new(
        config(&path),
        CoreDependencies::new(Arc::new(no_http()), Arc::new(transport), Arc::new(watcher)),
    );

    let result = service.run(CancellationToken::new()).await;
    assert!(matches!(result, Err(CoreError::Watch(_))));
}
