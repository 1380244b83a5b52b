//! Preview server command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_config::SiteConfig;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let (dir, base) = match (SiteConfig::load(config_path), dir) {
        (Ok(loaded), dir) => (
            dir.unwrap_or_else(|| loaded.output_dir()),
            loaded.config.site.base,
        ),
        // Without a descriptor the directory is served at the root
        (Err(e), Some(dir)) => {
            tracing::debug!("Serving without site config: {}", e);
            (dir, "/".to_string())
        }
        (Err(e), None) => {
            return Err(e).context("Pass --dir or run from a folio project");
        }
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    tracing::info!("Serving {}", dir.display());

    folio_server::preview(&dir, &base, "127.0.0.1", port, open).await?;

    Ok(())
}
