//! Development server command.

use std::path::Path;

use anyhow::Result;
use folio_server::{DevServer, DevServerConfig};

/// Run the dev server.
pub async fn run(config_path: &Path, host: String, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        config_path: config_path.to_path_buf(),
        port,
        host,
        open,
    };

    DevServer::new(config).start().await?;

    Ok(())
}
