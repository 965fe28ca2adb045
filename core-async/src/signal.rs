//! Process termination signals.

use std::io;

/// Resolves once the process is asked to stop.
///
/// Listens for Ctrl+C everywhere and additionally for `SIGTERM` on Unix.
/// Returns an error only if the signal handlers could not be installed.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
