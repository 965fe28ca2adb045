//! # File Change Debouncing
//!
//! Collapses bursts of raw file-change events into single re-reads of the
//! now-playing file.
//!
//! ## Overview
//!
//! The media player may flush the file in several small writes. The
//! [`ChangeDebouncer`] waits for a quiet interval after the last content write
//! before reading, then hands the parsed state to a [`StateHandler`].

pub mod debouncer;
pub mod error;

pub use debouncer::{ChangeDebouncer, StateHandler, DEFAULT_QUIET_INTERVAL};
pub use error::{Result, WatchError};
