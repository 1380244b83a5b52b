//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_config::SiteConfig;
use folio_static::{BuildConfig, StaticBuilder};

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let loaded = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    tracing::info!("Loaded config from {}", loaded.config_path.display());

    let mut config = BuildConfig::from_loaded(&loaded);
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = StaticBuilder::new(config).build().await?;

    if result.dead_links > 0 {
        tracing::warn!("{} dead link(s) ignored", result.dead_links);
    }

    tracing::info!(
        "Built {} pages and copied {} files in {}ms",
        result.pages,
        result.files,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
