use std::path::PathBuf;

use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Cannot watch {}: {source}", path.display())]
    WatchAttach {
        path: PathBuf,
        #[source]
        source: BridgeError,
    },

    #[error("Watch error: {0}")]
    Watch(#[from] core_watch::WatchError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
