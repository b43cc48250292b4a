//! Authoring config (`aiui.yaml`).
//!
//! This is what site authors write by hand. The compiler turns it into the
//! three runtime manifests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{A11yConfig, I18nConfig, Props, SeoConfig, SlotMap, TemplateConfig, ThemeConfig};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    pub site: SiteConfig,

    #[serde(default)]
    pub content: Option<ContentConfig>,

    #[serde(default)]
    pub components: BTreeMap<String, ComponentConfig>,

    #[serde(default)]
    pub templates: BTreeMap<String, TemplateConfig>,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,

    #[serde(default)]
    pub seo: Option<SeoConfig>,

    #[serde(default)]
    pub i18n: Option<I18nConfig>,

    #[serde(default)]
    pub a11y: Option<A11yConfig>,
}

fn default_schema_version() -> u32 {
    1
}

/// Site-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// URL prefix for docs pages
    #[serde(default = "default_route_base_docs")]
    pub route_base_docs: String,

    #[serde(default)]
    pub theme: Option<ThemeConfig>,
}

fn default_route_base_docs() -> String {
    "/docs".to_string()
}

/// Content sources.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub docs: Option<ContentSourceConfig>,
}

/// A directory of Markdown pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSourceConfig {
    pub dir: String,

    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

fn default_include() -> Vec<String> {
    vec!["**/*.md".to_string(), "**/*.mdx".to_string()]
}

fn default_index_files() -> Vec<String> {
    vec!["index.md".to_string(), "README.md".to_string()]
}

impl ContentSourceConfig {
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            include: default_include(),
            exclude: Vec::new(),
            index_files: default_index_files(),
        }
    }
}

/// A named component instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub props: Props,
}

/// A route rule mapping a glob to a template.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    #[serde(rename = "match")]
    pub pattern: String,

    pub template: String,

    #[serde(default)]
    pub slots: Option<SlotMap>,
}

impl Config {
    /// Parse a config from YAML source.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::InvalidYaml(e.to_string()))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;

        let config = Self::from_yaml(&source)?;
        tracing::debug!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Docs content source, if configured.
    pub fn docs(&self) -> Option<&ContentSourceConfig> {
        self.content.as_ref().and_then(|c| c.docs.as_ref())
    }
}

/// Errors that can occur when loading the config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Read(String, String),

    #[error("Invalid YAML in config: {0}")]
    InvalidYaml(String),
}
