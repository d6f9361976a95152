//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid.");
                println!("  Backend: {}", config.api.trimmed_base_url());
                println!("  Output directory: {}", config.export.output_dir);
                println!(
                    "  Branding: {}",
                    config.export.branding_url.as_deref().unwrap_or("(none)")
                );
                Ok(0)
            }
            Err(e) => {
                eprintln!("Configuration validation failed: {e}");
                Ok(2) // Configuration error exit code
            }
        }
    }
}
