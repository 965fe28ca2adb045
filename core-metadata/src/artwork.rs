//! Artwork Resolution - Decode, Deduplicate, and Upload Album Artwork
//!
//! The presence service can only show images by URL, while the player embeds
//! artwork as base64 in the now-playing file. [`ArtworkStore`] bridges the two:
//! - Decodes the payload and hashes the raw image bytes (SHA-256)
//! - Returns the cached URL when those bytes were uploaded before
//! - Otherwise uploads them through an [`ArtworkUploader`] and caches the URL
//!
//! Resolution is best-effort. Every failure is logged and answered with the
//! placeholder image key, and failures are never cached, so the next update
//! carrying the same artwork tries again.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::artwork::ArtworkStore;
//! use core_metadata::providers::CatboxUploader;
//! use std::sync::Arc;
//!
//! let uploader = Arc::new(CatboxUploader::new(http_client, upload_url, timeout));
//! let mut store = ArtworkStore::new(uploader, "vlc");
//!
//! let image_key = store.resolve(&state.artwork).await;
//! ```

use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Image host capability
#[async_trait]
pub trait ArtworkUploader: Send + Sync {
    /// Upload raw image bytes and return the public URL
    ///
    /// # Errors
    ///
    /// Network failures, non-2xx responses and empty response bodies are all
    /// errors.
    async fn upload(&self, data: Bytes) -> Result<String>;
}

/// Content-addressed artwork cache in front of an [`ArtworkUploader`]
///
/// Owned by a single actor; `resolve` takes `&mut self` so the cache needs no
/// locking. Entries live for the lifetime of the store and are never evicted.
pub struct ArtworkStore {
    uploader: Arc<dyn ArtworkUploader>,
    cache: HashMap<String, String>,
    default_image: String,
}

impl ArtworkStore {
    /// Creates a new artwork store
    ///
    /// # Arguments
    ///
    /// * `uploader` - Image host used on cache misses
    /// * `default_image` - Placeholder key returned whenever resolution fails
    pub fn new(uploader: Arc<dyn ArtworkUploader>, default_image: impl Into<String>) -> Self {
        Self {
            uploader,
            cache: HashMap::new(),
            default_image: default_image.into(),
        }
    }

    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// Whether `image` is the placeholder key rather than a resolved URL
    pub fn is_placeholder(&self, image: &str) -> bool {
        image == self.default_image
    }

    /// Number of uploaded images remembered
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a base64 artwork payload to a displayable image key
    ///
    /// Returns the uploaded URL on success and the placeholder key for an empty
    /// payload or any decode/upload failure.
    pub async fn resolve(&mut self, payload: &str) -> String {
        if payload.is_empty() {
            return self.default_image.clone();
        }

        let data = match decode_payload(payload) {
            Ok(data) => data,
            Err(e) => {
                warn!("{}", e);
                return self.default_image.clone();
            }
        };

        let hash = calculate_hash(&data);

        if let Some(url) = self.cache.get(&hash) {
            debug!(hash = %hash, "Artwork cache hit");
            return url.clone();
        }

        info!(bytes = data.len(), "Uploading artwork");
        match self.uploader.upload(data).await {
            Ok(url) => {
                info!(url = %url, "Uploaded artwork");
                self.cache.insert(hash, url.clone());
                url
            }
            Err(e) => {
                warn!(error = %e, "Falling back to placeholder artwork");
                self.default_image.clone()
            }
        }
    }
}

fn decode_payload(payload: &str) -> Result<Bytes> {
    STANDARD
        .decode(payload)
        .map(Bytes::from)
        .map_err(|e| MetadataError::ArtworkDecode(e.to_string()))
}

/// Calculate SHA-256 hash of artwork data
pub fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Detects the image type from its magic bytes
///
/// Returns the MIME type and the conventional file extension.
pub fn detect_image_type(data: &[u8]) -> Option<(&'static str, &'static str)> {
    if data.len() < 12 {
        return None;
    }

    match &data[0..4] {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, _] => Some(("image/jpeg", "jpg")),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47] => Some(("image/png", "png")),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38] => Some(("image/gif", "gif")),
        // WEBP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46] if &data[8..12] == b"WEBP" => Some(("image/webp", "webp")),
        // BMP: 42 4D
        [0x42, 0x4D, _, _] => Some(("image/bmp", "bmp")),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
