//! Now-Playing File Parsing
//!
//! The player overwrites a small text file on every change:
//!
//! ```text
//! PLAYING          <- status token, NOT_PLAYING when stopped
//! Album name
//! Track title
//! Artist name
//! /9j/4AAQSkZJ...  <- optional base64 artwork
//! ```
//!
//! Parsing never fails. Anything that does not look like a complete record
//! (empty file, partial write, fewer than four lines) is the stopped state.

use std::path::Path;

use crate::error::Result;

/// Status token the writer uses when nothing is playing
pub const NOT_PLAYING: &str = "NOT_PLAYING";

const MIN_LINES: usize = 4;

/// One playback snapshot read from the now-playing file
///
/// Equality is structural over every field, including the artwork payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingState {
    pub status: String,
    pub album: String,
    pub title: String,
    pub artist: String,
    /// Base64 image bytes, empty when the player supplied none
    pub artwork: String,
}

impl NowPlayingState {
    /// The stopped sentinel; all other fields are empty
    pub fn not_playing() -> Self {
        Self {
            status: NOT_PLAYING.to_string(),
            album: String::new(),
            title: String::new(),
            artist: String::new(),
            artwork: String::new(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status != NOT_PLAYING
    }

    pub fn has_artwork(&self) -> bool {
        !self.artwork.is_empty()
    }

    /// Parse raw file contents
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the artwork line is
    /// ASCII and the text fields are display-only.
    pub fn parse(raw: &[u8]) -> Self {
        if raw.is_empty() {
            return Self::not_playing();
        }

        let content = String::from_utf8_lossy(raw);
        let mut lines: Vec<&str> = content.split('\n').collect();

        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        if lines.len() < MIN_LINES {
            return Self::not_playing();
        }

        Self {
            status: lines[0].trim().to_string(),
            album: lines[1].trim().to_string(),
            title: lines[2].trim().to_string(),
            artist: lines[3].trim().to_string(),
            artwork: lines
                .get(4)
                .map(|line| line.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

impl Default for NowPlayingState {
    fn default() -> Self {
        Self::not_playing()
    }
}

/// Read and parse the now-playing file
///
/// # Errors
///
/// Only I/O failures are reported; malformed content parses to the stopped
/// state.
pub async fn read_state(path: &Path) -> Result<NowPlayingState> {
    let raw = core_async::fs::read(path).await?;
    Ok(NowPlayingState::parse(&raw))
}
