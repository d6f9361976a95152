//! Preview command implementation
//!
//! Shows the externally computed counts for a scope without starting a run.

use crate::adapters::api::{HttpPortfolioApi, PortfolioApi};
use crate::cli::commands::scope_from_args;
use crate::config::load_config;
use crate::domain::{JurusanId, KelasId, SeriesId};
use clap::Args;

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Series to preview
    #[arg(long)]
    pub series_id: SeriesId,

    /// Restrict to one jurusan (major)
    #[arg(long)]
    pub jurusan_id: Option<JurusanId>,

    /// Restrict to one kelas (class)
    #[arg(long)]
    pub kelas_id: Option<KelasId>,
}

impl PreviewArgs {
    /// Execute the preview command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;
        let api = HttpPortfolioApi::new(&config.api)?;
        let scope = scope_from_args(self.jurusan_id, self.kelas_id);

        let preview = match api.get_export_preview(self.series_id, &scope).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch export preview");
                eprintln!("Failed to fetch export preview: {e}");
                return Ok(4);
            }
        };

        println!("Preview for series {}:", self.series_id);
        println!("  Portfolios: {}", preview.portfolio_count);
        println!("  Students: {}", preview.user_count);
        println!("  Estimated pages: {}", preview.estimated_pages);

        if !preview.allows_export() {
            println!();
            println!("The current scope matches no published portfolios.");
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_preview_args() {
        let args = PreviewArgs {
            series_id: SeriesId::from_str("7").unwrap(),
            jurusan_id: None,
            kelas_id: Some(KelasId::from_str("2").unwrap()),
        };
        assert_eq!(args.series_id.value(), 7);
        assert!(args.kelas_id.is_some());
    }
}
