//! Integration tests for the core-async facade.

use core_async::sync::{mpsc, CancellationToken};
use core_async::{task, time};

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_sleep() {
    let start = time::Instant::now();
    time::sleep(time::Duration::from_millis(50)).await;
    assert!(start.elapsed() >= time::Duration::from_millis(50));
}

#[tokio::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(200)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_cancellation_token_wakes_waiters() {
    let token = CancellationToken::new();
    let child = token.clone();

    let handle = task::spawn(async move {
        child.cancelled().await;
        "stopped"
    });

    time::sleep(time::Duration::from_millis(10)).await;
    assert!(!handle.is_finished());

    token.cancel();
    assert_eq!(handle.await.unwrap(), "stopped");
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_sleep_reset_replaces_deadline() {
    let sleep = time::sleep(time::Duration::from_millis(20));
    tokio::pin!(sleep);

    let start = time::Instant::now();
    sleep
        .as_mut()
        .reset(time::Instant::now() + time::Duration::from_millis(60));
    sleep.as_mut().await;

    assert!(start.elapsed() >= time::Duration::from_millis(60));
}

#[tokio::test]
async fn test_unbounded_channel_preserves_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();

    for i in 0..5 {
        tx.send(i).unwrap();
    }
    drop(tx);

    let mut received = Vec::new();
    while let Some(value) = rx.recv().await {
        received.push(value);
    }
    assert_eq!(received, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_runtime_build_runs_futures() {
    let runtime = core_async::runtime::build().unwrap();
    let value = runtime.block_on(async { task::spawn(async { 7 }).await.unwrap() });
    assert_eq!(value, 7);
}
