//! Synchronization primitives.
//!
//! Tokio's async-aware locks and channels, plus `CancellationToken` from
//! `tokio-util` for cooperative shutdown.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::Mutex;
//!
//! async fn example() {
//!     let mutex = Mutex::new(42);
//!     let mut guard = mutex.lock().await;
//!     *guard += 1;
//! }
//! ```

pub use tokio::sync::{mpsc, oneshot, Mutex, MutexGuard, Notify, RwLock};
pub use tokio_util::sync::CancellationToken;
