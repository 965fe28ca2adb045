//! Time-related operations.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(5)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(5));
//! }
//! ```

pub use tokio::time::{sleep, timeout, Instant, Sleep};

pub use std::time::Duration;

/// Error returned by [`timeout`] when the deadline passes first.
pub use tokio::time::error::Elapsed;
