//! Init command implementation
//!
//! Writes a commented starter configuration file.

use clap::Args;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Karya series export configuration

[application]
log_level = "info"
dry_run = false

[api]
base_url = "https://karya.sekolah.sch.id"
# Bearer token for authenticated endpoints.
# Uncomment and export KARYA_API_TOKEN to enable:
# token = "${KARYA_API_TOKEN}"
timeout_seconds = 30

[api.retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

[export]
output_dir = "exports"
# Fixed branding image embedded into every document:
# branding_url = "https://karya.sekolah.sch.id/static/branding.png"
profile_url_template = "https://karya.sekolah.sch.id/u/{username}"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path of the configuration file to create
    #[arg(short, long, default_value = "karya.toml")]
    pub output: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);

        if path.exists() && !self.force {
            eprintln!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
            return Ok(2);
        }

        tokio::fs::write(path, DEFAULT_CONFIG).await?;
        println!("Wrote starter configuration to {}", path.display());
        println!("Edit api.base_url and export.profile_url_template before the first run.");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_template_parses_and_validates() {
        let config: crate::config::KaryaConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.export.output_dir, "exports");
    }
}
