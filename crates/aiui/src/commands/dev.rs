//! Development server command.

use std::path::PathBuf;

use aiui_server::{DevServer, DevServerConfig};
use anyhow::Result;

/// Run the dev server.
pub async fn run(config_path: PathBuf, port: u16, open: bool) -> Result<()> {
    if !config_path.exists() {
        anyhow::bail!(
            "Config not found: {}. Run 'aiui init' first.",
            config_path.display()
        );
    }

    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        config_path,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
