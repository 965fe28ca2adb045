//! Core service façade and bootstrap helpers.
//!
//! This crate wires bridge implementations (HTTP, presence transport, file
//! watcher) into the now-playing pipeline. Desktop builds enable the
//! `desktop-shims` feature, which pulls in `bridge-desktop` and exposes
//! [`bootstrap_desktop`].

pub mod error;
pub mod pipeline;

pub use error::{CoreError, Result};
pub use pipeline::PresencePipeline;

use std::sync::Arc;

use bridge_traits::{http::HttpClient, presence::PresenceTransport, watch::FileWatcher};
use core_async::sync::CancellationToken;
use core_metadata::{providers::CatboxUploader, ArtworkStore};
use core_presence::Reconciler;
use core_runtime::config::PresenceConfig;
use core_watch::ChangeDebouncer;
use tracing::info;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub presence: Arc<dyn PresenceTransport>,
    pub watcher: Arc<dyn FileWatcher>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        presence: Arc<dyn PresenceTransport>,
        watcher: Arc<dyn FileWatcher>,
    ) -> Self {
        Self {
            http_client,
            presence,
            watcher,
        }
    }
}

/// Watches the now-playing file and mirrors it to the presence service.
#[derive(Clone)]
pub struct PresenceService {
    config: PresenceConfig,
    deps: Arc<CoreDependencies>,
}

impl PresenceService {
    /// Create a new service from the provided configuration and dependencies.
    pub fn new(config: PresenceConfig, deps: CoreDependencies) -> Self {
        Self {
            config,
            deps: Arc::new(deps),
        }
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    fn build_pipeline(&self) -> PresencePipeline {
        let uploader = CatboxUploader::new(
            Arc::clone(&self.deps.http_client),
            self.config.upload_url.clone(),
            self.config.http_timeout,
        );
        let artwork = ArtworkStore::new(Arc::new(uploader), self.config.default_image.clone());
        let reconciler = Reconciler::new(
            Arc::clone(&self.deps.presence),
            artwork,
            self.config.small_image_text.clone(),
        );
        PresencePipeline::new(reconciler)
    }

    /// Run until `cancel` fires.
    ///
    /// Attaches the watch, publishes the file's current contents, then
    /// follows changes. The presence session is closed on the way out.
    ///
    /// # Errors
    ///
    /// [`CoreError::WatchAttach`] when the file cannot be watched, and
    /// [`CoreError::Watch`] when the change stream ends unexpectedly.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let path = &self.config.watch_path;

        let events = self
            .deps
            .watcher
            .watch(path)
            .map_err(|source| CoreError::WatchAttach {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "Watching now-playing file");

        let mut pipeline = self.build_pipeline();
        pipeline.sync_startup(path).await;

        let debouncer =
            ChangeDebouncer::new(path.clone()).with_quiet_interval(self.config.debounce);
        let outcome = debouncer.run(events, &mut pipeline, &cancel).await;

        pipeline.shutdown().await;
        outcome.map_err(CoreError::from)
    }
}

/// Build a [`PresenceService`] backed by the desktop bridges.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_runtime::config::PresenceConfig;
///
/// let config = PresenceConfig::from_env()?;
/// let service = core_service::bootstrap_desktop(config)?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(config: PresenceConfig) -> Result<PresenceService> {
    use bridge_desktop::{DiscordIpcTransport, NotifyFileWatcher, ReqwestHttpClient};

    config.validate()?;

    let http_client = ReqwestHttpClient::with_timeout(config.http_timeout)
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;
    let presence = DiscordIpcTransport::new(config.client_id.clone(), config.http_timeout);

    let deps = CoreDependencies::new(
        Arc::new(http_client),
        Arc::new(presence),
        Arc::new(NotifyFileWatcher::new()),
    );

    Ok(PresenceService::new(config, deps))
}

#[cfg(all(test, feature = "desktop-shims"))]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_desktop_uses_config() {
        let config = PresenceConfig::builder()
            .watch_path("/tmp/now_playing.txt")
            .build()
            .unwrap();

        let service = bootstrap_desktop(config.clone()).unwrap();
        assert_eq!(service.config(), &config);
    }

    #[test]
    fn test_bootstrap_desktop_rejects_invalid_config() {
        let mut config = PresenceConfig::builder().build().unwrap();
        config.client_id = "not-a-number".to_string();

        assert!(matches!(
            bootstrap_desktop(config),
            Err(CoreError::Config(_))
        ));
    }
}
