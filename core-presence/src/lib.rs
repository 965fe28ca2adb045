//! # Presence Reconciliation Module
//!
//! Keeps the external presence display in step with the now-playing file.
//!
//! ## Overview
//!
//! The [`Reconciler`] owns the whole presence session: whether a connection is
//! open, the last state it was asked to publish, and the last artwork URL that
//! resolved successfully. It connects on demand when playback starts, hides the
//! activity when playback stops, and suppresses updates for unchanged states.

pub mod error;
pub mod reconciler;

pub use error::{PresenceError, Result};
pub use reconciler::{Reconciler, ReconcilerSession};
