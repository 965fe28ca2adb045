//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `FileWatcher` using `notify`
//! - `PresenceTransport` speaking Discord's local IPC protocol over a Unix
//!   socket or Windows named pipe
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DiscordIpcTransport, NotifyFileWatcher, ReqwestHttpClient};
//! use std::time::Duration;
//!
//! let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//! let presence = DiscordIpcTransport::new("1396439427106078720", Duration::from_secs(30));
//! let watcher = NotifyFileWatcher::new();
//! ```

pub mod discord;
mod http;
mod watcher;

pub use discord::DiscordIpcTransport;
pub use http::ReqwestHttpClient;
pub use watcher::{classify, NotifyFileWatcher};
