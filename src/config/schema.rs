//! Configuration schema types
//!
//! This module defines the configuration structure for the export tool.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Placeholder the profile URL template must contain
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Root configuration, mapping to the TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KaryaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Backend API connection
    pub api: ApiConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KaryaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode: compose the document but skip rendering and delivery
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Karya backend, e.g. `https://karya.sekolah.sch.id`
    pub base_url: String,

    /// Bearer token for authenticated endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry behavior for backend calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }
        self.retry.validate()
    }

    /// Base URL without a trailing slash
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Retry configuration with exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("api.retry.max_retries must be at least 1".to_string());
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err("api.retry.max_delay_ms must be >= initial_delay_ms".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("api.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the finished artifact is written into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Fixed branding image embedded into every document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding_url: Option<String>,

    /// Template for per-user profile URLs; must contain `{username}`
    pub profile_url_template: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if !self.profile_url_template.contains(USERNAME_PLACEHOLDER) {
            return Err(format!(
                "export.profile_url_template must contain the literal '{USERNAME_PLACEHOLDER}'"
            ));
        }
        if let Some(url) = &self.branding_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "export.branding_url must start with http:// or https://, got '{url}'"
                ));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging with rotation
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_output_dir() -> String {
    "exports".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> KaryaConfig {
        KaryaConfig {
            application: ApplicationConfig::default(),
            api: ApiConfig {
                base_url: "https://karya.example".to_string(),
                token: None,
                timeout_seconds: default_timeout_seconds(),
                retry: RetryConfig::default(),
            },
            export: ExportConfig {
                output_dir: default_output_dir(),
                branding_url: None,
                profile_url_template: "https://karya.example/u/{username}".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = minimal_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_scheme_required() {
        let mut config = minimal_config();
        config.api.base_url = "karya.example".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_profile_template_placeholder_required() {
        let mut config = minimal_config();
        config.export.profile_url_template = "https://karya.example/u/".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("{username}"));
    }

    #[test]
    fn test_retry_bounds() {
        let mut config = minimal_config();
        config.api.retry.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = minimal_config();
        config.api.retry.max_delay_ms = 10;
        config.api.retry.initial_delay_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rotation_policy_validated() {
        let mut config = minimal_config();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_applied_from_minimal_toml() {
        let toml_content = r#"
[api]
base_url = "https://karya.example"

[export]
profile_url_template = "https://karya.example/u/{username}"
"#;
        let config: KaryaConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.api.retry.max_retries, 3);
        assert_eq!(config.export.output_dir, "exports");
        assert!(!config.logging.local_enabled);
    }
}
