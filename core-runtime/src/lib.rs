//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the presence pipeline:
//! - Configuration management (builder + environment loading)
//! - Logging and tracing setup
//!
//! ## Overview
//!
//! Nothing in here performs I/O beyond reading environment variables and
//! installing the global `tracing` subscriber. Bridges and pipeline components
//! are wired together in `core-service`.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
