//! Manifest data model, site config and Markdown document parsing.
//!
//! This crate defines the three JSON manifests consumed at runtime
//! (`ui-config.json`, `docs-nav.json`, `route-manifest.json`), the YAML
//! authoring config they are compiled from, and the loader that fetches
//! them as one all-or-nothing snapshot.

pub mod config;
pub mod document;
pub mod frontmatter;
pub mod loader;
pub mod model;

pub use config::{
    ComponentConfig, Config, ConfigError, ContentConfig, ContentSourceConfig, RouteConfig,
    SiteConfig,
};
pub use document::{parse_document, slugify, Document, DocumentError, TocEntry};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use loader::{LoadError, ManifestLoader, Manifests, DOCS_NAV, ROUTE_MANIFEST, UI_CONFIG};
pub use model::{
    A11yConfig, ComponentEntry, I18nConfig, NavItem, NavTree, Props, RouteEntry, RouteManifest, SeoConfig, SiteInfo,
    SlotMap, SlotRef, TemplateConfig, ThemeConfig, UiConfig, WidgetConfig, ZonesConfig,
};
