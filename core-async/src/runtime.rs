//! Runtime construction for binaries and blocking entry points.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Build the multi-threaded runtime the presence daemon runs on.
pub fn build() -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .enable_all()
        .thread_name("nowplaying-worker")
        .build()
}
