//! Artwork Hosting Providers
//!
//! Clients for image hosts that accept anonymous uploads and answer with a
//! public URL:
//! - catbox.moe - multipart `fileupload` endpoint

pub mod catbox;

pub use catbox::CatboxUploader;
