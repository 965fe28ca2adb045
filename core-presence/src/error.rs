use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("Connection failed: {0}")]
    ConnectFailed(#[source] BridgeError),

    #[error("Failed to set activity: {0}")]
    ActivityFailed(#[source] BridgeError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, PresenceError>;
