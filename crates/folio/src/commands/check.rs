//! Config and link check command.

use std::path::Path;

use anyhow::{Context, Result};
use folio_static::StaticBuilder;

/// Run the check command.
pub async fn run(config_path: &Path) -> Result<()> {
    let builder = StaticBuilder::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let report = builder.check()?;

    for link in &report.dead_links {
        tracing::warn!("Dead link in {}", link);
    }

    if !report.dead_links.is_empty() && !builder.config().site.build.ignore_dead_links {
        anyhow::bail!(
            "{} dead link(s) in {} pages",
            report.dead_links.len(),
            report.pages
        );
    }

    tracing::info!("Checked {} pages, config is valid", report.pages);

    Ok(())
}
