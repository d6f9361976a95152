//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`KARYA_*` prefix)
//! - Default values for optional settings
//! - Secret-wrapped API token
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://karya.sekolah.sch.id"
//! token = "${KARYA_API_TOKEN}"
//! timeout_seconds = 30
//!
//! [api.retry]
//! max_retries = 3
//! initial_delay_ms = 500
//!
//! [export]
//! output_dir = "exports"
//! branding_url = "https://karya.sekolah.sch.id/static/branding.png"
//! profile_url_template = "https://karya.sekolah.sch.id/u/{username}"
//!
//! [logging]
//! local_enabled = false
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, ExportConfig, KaryaConfig, LoggingConfig, RetryConfig,
    USERNAME_PLACEHOLDER,
};
pub use secret::{secret_from, SecretString, SecretValue};
