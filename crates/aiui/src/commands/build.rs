//! Static site build command.

use std::path::{Path, PathBuf};

use aiui_static::{BuildConfig, StaticBuilder};
use anyhow::{Context, Result};

use super::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: PathBuf, minify: bool) -> Result<()> {
    tracing::info!("Building static site...");

    let (config, base_dir) = load_config(config_path)?;

    let mut build_config = BuildConfig::new(config, base_dir, output);
    build_config.minify = minify;

    let result = StaticBuilder::new(build_config)
        .build()
        .await
        .context("Build failed")?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
