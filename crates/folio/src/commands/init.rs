//! Scaffold a new documentation site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let docs_dir = root.join("docs");

    // Check if docs already exists
    if docs_dir.exists() && !yes {
        tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG),
        (docs_dir.join("index.md"), DEFAULT_INDEX),
        (
            docs_dir.join("guide").join("getting-started.md"),
            DEFAULT_GETTING_STARTED,
        ),
    ];

    for (path, content) in files {
        if path.exists() && !yes {
            tracing::info!("Keeping existing {}", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# folio site descriptor

nav = [
  { text = "Home", link = "/" },
  { text = "Guide", link = "/guide/getting-started" },
]

[site]
title = "My Documentation"
description = "Documentation built with folio"
lang = "en-US"
clean_urls = true

[docs]
# Markdown sources
dir = "docs"
# Build output
output = "dist"

[[sidebar]]
text = "Guide"
collapsed = false
items = [
  { text = "Getting Started", link = "/guide/getting-started" },
]

[footer]
message = "Released under the MIT License."

# Comment widget below every page
# [theme.comments]
# repo = "owner/repo"
# repo_id = "R_..."
# category = "General"
# category_id = "DIC_..."
"#;

const DEFAULT_INDEX: &str = r#"---
title: Home
outline: false
comments: false
---

# Welcome

This site is built with **folio** from Markdown files in `docs/`.

Start with the [Getting Started](./guide/getting-started.md) guide.
"#;

const DEFAULT_GETTING_STARTED: &str = r#"# Getting Started

## Project Structure

```text
your-site/
├── folio.toml          # Site descriptor
└── docs/
    ├── index.md        # Home page
    ├── public/         # Copied to the site root as-is
    └── guide/
        └── getting-started.md
```

## Navigation

The nav bar and sidebar are declared in `folio.toml`. Every internal link
must point at an existing page; `folio check` lists the ones that don't.

## Development

```bash:no-line-numbers
folio dev
```

## Building

```bash:no-line-numbers
folio build
```
"#;
