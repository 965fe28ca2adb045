//! # Now-Playing Metadata Module
//!
//! Turns the media player's now-playing file into structured state and
//! resolves its embedded artwork to a publicly reachable image.
//!
//! ## Overview
//!
//! This module handles:
//! - Tolerant parsing of the line-oriented now-playing format
//! - Content-addressed artwork deduplication (SHA-256 keyed, in-memory)
//! - Uploading artwork to an image host through the HTTP bridge

pub mod artwork;
pub mod error;
pub mod now_playing;
pub mod providers;

pub use artwork::{ArtworkStore, ArtworkUploader};
pub use error::{MetadataError, Result};
pub use now_playing::{NowPlayingState, NOT_PLAYING};
