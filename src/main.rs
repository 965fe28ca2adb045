//! Mirrors a media player's now-playing file to Discord Rich Presence.
//!
//! Configuration comes from the environment (see `core_runtime::config`);
//! logging honours `LOG_FORMAT`, `LOG_LEVEL` and `RUST_LOG`.

use std::process::ExitCode;

use anyhow::{Context, Result};
use core_async::sync::CancellationToken;
use core_runtime::config::PresenceConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let logging = LoggingConfig::from_env().and_then(init_logging);
    if let Err(e) = logging {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = PresenceConfig::from_env().context("Invalid configuration")?;
    let service =
        core_service::bootstrap_desktop(config).context("Failed to create presence service")?;
    let runtime = core_async::runtime::build().context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let cancel = CancellationToken::new();

        core_async::spawn({
            let cancel = cancel.clone();
            async move {
                if let Err(e) = core_async::signal::shutdown_signal().await {
                    warn!("Cannot listen for shutdown signals: {}", e);
                    return;
                }
                info!("Shutting down");
                cancel.cancel();
            }
        });

        info!(
            path = %service.config().watch_path.display(),
            client_id = %service.config().client_id,
            "Now-playing presence started"
        );

        service.run(cancel).await?;
        info!("Stopped");
        Ok(())
    })
}
