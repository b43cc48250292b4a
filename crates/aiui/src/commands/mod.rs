//! CLI subcommands.

use std::path::{Path, PathBuf};

use aiui_manifest::Config;
use anyhow::{Context, Result};

pub mod build;
pub mod dev;
pub mod init;
pub mod resolve;
pub mod serve;
pub mod validate;

/// Load the site config and the directory its relative paths resolve from.
pub fn load_config(path: &Path) -> Result<(Config, PathBuf)> {
    let config = Config::load(path)
        .with_context(|| format!("Failed to load {}. Run 'aiui init' to create one.", path.display()))?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((config, base_dir))
}
