use thiserror::Error;

/// Failure reported by a host capability (HTTP, presence IPC, file watching)
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The capability or its peer is absent, e.g. no Discord client running
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    /// The peer answered, but refused or garbled the request
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Bridge operation timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether the underlying channel can no longer be trusted.
    ///
    /// `OperationFailed` leaves the channel usable; every other variant
    /// means the peer went away or stopped answering.
    pub fn is_connection_lost(&self) -> bool {
        !matches!(self, BridgeError::OperationFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_lost_classification() {
        assert!(BridgeError::NotAvailable("gone".into()).is_connection_lost());
        assert!(BridgeError::Timeout("slow".into()).is_connection_lost());
        assert!(BridgeError::Io(std::io::ErrorKind::BrokenPipe.into()).is_connection_lost());
        assert!(!BridgeError::OperationFailed("bad payload".into()).is_connection_lost());
    }
}
