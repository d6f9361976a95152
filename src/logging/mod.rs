//! Logging and observability
//!
//! Structured logging with configurable levels, console output, and an
//! optional JSON file layer with rotation.
//!
//! ```no_run
//! use karya::config::LoggingConfig;
//! use karya::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Export tool started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
