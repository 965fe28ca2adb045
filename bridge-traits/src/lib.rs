//! # Host Bridge Traits
//!
//! Capability traits the presence pipeline depends on but does not implement.
//!
//! ## Overview
//!
//! The core crates (`core-metadata`, `core-presence`, `core-watch`) never talk to
//! the network, the presence service, or the OS file-notification APIs directly.
//! Each of those is expressed as a trait here and implemented per platform
//! (`bridge-desktop` for macOS, Windows, and Linux). Tests substitute mocks.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP requests, including multipart uploads
//! - [`PresenceTransport`](presence::PresenceTransport) - Connect, publish an activity, disconnect
//! - [`FileWatcher`](watch::FileWatcher) - Stream of raw change events for a single path
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., socket paths, HTTP status)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared as
//! `Arc<dyn Trait>` across async tasks.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod presence;
pub mod watch;

pub use error::BridgeError;

pub use http::{FormPart, HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
pub use presence::{Activity, ActivityAssets, PresenceTransport};
pub use watch::{ChangeEvent, ChangeKind, FileWatcher, WatchSender, WatchStream};
