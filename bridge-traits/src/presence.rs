//! Presence Transport Abstraction
//!
//! The "currently doing X" display service. The desktop implementation talks
//! to the local Discord client; tests inject mocks that record calls.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Image slots shown next to an activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityAssets {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub large_image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub large_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub small_image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub small_text: String,
}

/// Activity payload published through a [`PresenceTransport`]
///
/// Serializes to the shape the Discord RPC `SET_ACTIVITY` command expects.
/// Empty strings are omitted rather than sent, because the service rejects
/// empty text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Activity {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<ActivityAssets>,
}

/// Presence display transport
///
/// Calls are made by a single logical actor, one at a time. Implementations
/// still need interior mutability since the trait takes `&self`.
#[async_trait]
pub trait PresenceTransport: Send + Sync {
    /// Open a session with the presence service
    async fn connect(&self) -> Result<()>;

    /// Publish (or replace) the current activity
    ///
    /// # Errors
    ///
    /// Fails when no session is open or the service rejects the payload.
    async fn set_activity(&self, activity: &Activity) -> Result<()>;

    /// Close the session, hiding the activity
    async fn close(&self) -> Result<()>;
}
