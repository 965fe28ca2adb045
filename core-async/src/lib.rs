//! Async runtime facade for the presence pipeline.
//!
//! Core crates depend on this crate instead of naming Tokio directly, so the
//! executor choice stays in one place. Everything here is a thin re-export or
//! wrapper over Tokio.
//!
//! # Modules
//!
//! - `task`: Task spawning
//! - `time`: Sleep, timeouts, instants
//! - `sync`: Channels, locks, and cooperative cancellation
//! - `fs`: Async file reads
//! - `runtime`: Runtime construction for binaries
//! - `signal`: Process termination signals
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let token = CancellationToken::new();
//!     let child = token.clone();
//!
//!     let handle = core_async::spawn(async move {
//!         child.cancelled().await;
//!     });
//!
//!     sleep(Duration::from_millis(10)).await;
//!     token.cancel();
//!     handle.await.unwrap();
//! }
//! ```

pub mod fs;
pub mod runtime;
pub mod signal;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
