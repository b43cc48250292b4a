//! Manifest loading.
//!
//! The three manifests are fetched concurrently and joined. The join is
//! all-or-nothing: if any document fails, no snapshot is produced.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::model::{NavTree, RouteManifest, UiConfig};

pub const UI_CONFIG: &str = "ui-config.json";
pub const DOCS_NAV: &str = "docs-nav.json";
pub const ROUTE_MANIFEST: &str = "route-manifest.json";

/// An immutable snapshot of all three manifests.
#[derive(Debug, Clone, Default)]
pub struct Manifests {
    pub ui: UiConfig,
    pub nav: NavTree,
    pub routes: RouteManifest,
}

/// Loads manifests from a directory.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    base: PathBuf,
}

impl ManifestLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Fetch all three manifests concurrently.
    pub async fn load(&self) -> Result<Manifests, LoadError> {
        let (ui, nav, routes) = tokio::try_join!(
            fetch_json::<UiConfig>(self.base.join(UI_CONFIG)),
            fetch_json::<NavTree>(self.base.join(DOCS_NAV)),
            fetch_json::<RouteManifest>(self.base.join(ROUTE_MANIFEST)),
        )?;

        tracing::debug!(
            "Loaded manifests from {}: {} templates, {} nav groups, {} routes",
            self.base.display(),
            ui.templates.len(),
            nav.items.len(),
            routes.routes.len()
        );

        Ok(Manifests { ui, nav, routes })
    }
}

async fn fetch_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, LoadError> {
    let source = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| LoadError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    serde_json::from_str(&source).map_err(|e| LoadError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Errors that can occur while loading manifests.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
