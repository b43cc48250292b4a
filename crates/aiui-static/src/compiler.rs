//! Manifest compiler.
//!
//! Turns `aiui.yaml` plus the docs directory into the three runtime
//! manifests (`ui-config.json`, `docs-nav.json`, `route-manifest.json`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use aiui_manifest::{
    ComponentEntry, Config, NavTree, RouteEntry, RouteManifest, SiteInfo, SlotMap, SlotRef,
    TemplateConfig, UiConfig, DOCS_NAV, ROUTE_MANIFEST, UI_CONFIG,
};
use serde::Serialize;
use walkdir::WalkDir;

use crate::nav_builder::{page_path, NavBuilder};
use crate::plugins::PluginManager;
use crate::scanner::DocsScanner;
use crate::validate::validate_config;

/// Output of a successful compile.
#[derive(Debug, Clone, Default)]
pub struct CompileResult {
    /// Files written, relative to the output directory
    pub files: Vec<String>,

    /// Page path to its Markdown source
    pub pages: BTreeMap<String, PathBuf>,
}

/// Errors that can occur while compiling manifests.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Failed to read: {0}")]
    Read(String),

    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize {0}: {1}")]
    Serialize(String, String),
}

static NO_PLUGINS: PluginManager = PluginManager::new();

/// Compiles a config into manifests.
#[derive(Debug)]
pub struct Compiler<'a> {
    config: &'a Config,
    base_dir: &'a Path,
    plugins: &'a PluginManager,
}

impl<'a> Compiler<'a> {
    /// `base_dir` is where relative content paths are resolved, usually the
    /// directory containing `aiui.yaml`.
    pub fn new(config: &'a Config, base_dir: &'a Path) -> Self {
        Self {
            config,
            base_dir,
            plugins: &NO_PLUGINS,
        }
    }

    /// Run `plugins` hooks at each compile stage.
    pub fn with_plugins(mut self, plugins: &'a PluginManager) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn compile(&self, output_dir: &Path, minify: bool) -> Result<CompileResult, CompileError> {
        if self.plugins.is_empty() {
            return self.write_manifests(output_dir, minify);
        }

        let config = self.plugins.config_loaded(self.config.clone());
        let result = Compiler {
            config: &config,
            base_dir: self.base_dir,
            plugins: self.plugins,
        }
        .write_manifests(output_dir, minify)?;

        Ok(self.plugins.compile_complete(result))
    }

    fn write_manifests(
        &self,
        output_dir: &Path,
        minify: bool,
    ) -> Result<CompileResult, CompileError> {
        let report = validate_config(self.config, self.base_dir);
        if !report.is_valid() {
            return Err(CompileError::Validation(report.messages()));
        }

        fs::create_dir_all(output_dir).map_err(|e| CompileError::Write(e.to_string()))?;

        let mut result = CompileResult::default();

        write_json(&output_dir.join(UI_CONFIG), &self.ui_config(), minify)?;
        result.files.push(UI_CONFIG.to_string());

        let (nav, pages) = self.docs_nav()?;
        write_json(&output_dir.join(DOCS_NAV), &nav, minify)?;
        result.files.push(DOCS_NAV.to_string());
        result.pages = pages;

        write_json(&output_dir.join(ROUTE_MANIFEST), &self.route_manifest(), minify)?;
        result.files.push(ROUTE_MANIFEST.to_string());

        if let Some(docs) = self.config.docs() {
            let copied = copy_tree(&self.base_dir.join(&docs.dir), &output_dir.join("docs"))?;
            tracing::debug!("Copied {} docs files", copied);
            result.files.push("docs/".to_string());
        }

        tracing::info!(
            "Compiled {} routes, {} pages into {}",
            self.config.routes.len(),
            result.pages.len(),
            output_dir.display()
        );

        Ok(result)
    }

    /// The `ui-config.json` document.
    pub fn ui_config(&self) -> UiConfig {
        let site = &self.config.site;

        UiConfig {
            site: SiteInfo {
                title: site.title.clone(),
                description: site.description.clone(),
                route_base_docs: Some(site.route_base_docs.clone()),
                theme: site.theme.clone(),
            },
            components: self
                .config
                .components
                .iter()
                .map(|(name, c)| {
                    (
                        name.clone(),
                        ComponentEntry {
                            kind: Some(c.kind.clone()),
                            props: c.props.clone(),
                        },
                    )
                })
                .collect(),
            templates: self
                .config
                .templates
                .iter()
                .map(|(name, t)| {
                    (
                        name.clone(),
                        TemplateConfig {
                            layout: t.layout.clone(),
                            slots: normalize_slots(&t.slots),
                            zones: t.zones.clone(),
                        },
                    )
                })
                .collect(),
            seo: self.config.seo.clone(),
            i18n: self.config.i18n.clone(),
            a11y: self.config.a11y.clone(),
        }
    }

    /// The `route-manifest.json` document. Earlier routes get higher priority.
    pub fn route_manifest(&self) -> RouteManifest {
        let count = self.config.routes.len();

        RouteManifest {
            routes: self
                .config
                .routes
                .iter()
                .enumerate()
                .map(|(index, route)| RouteEntry {
                    pattern: route.pattern.clone(),
                    template: route.template.clone(),
                    priority: (count - index) as i64,
                    slot_overrides: route
                        .slots
                        .as_ref()
                        .filter(|s| !s.is_empty())
                        .map(normalize_slots),
                })
                .collect(),
        }
    }

    /// The `docs-nav.json` document and the page-to-source map.
    fn docs_nav(&self) -> Result<(NavTree, BTreeMap<String, PathBuf>), CompileError> {
        let Some(docs) = self.config.docs() else {
            return Ok((self.plugins.nav_built(NavTree::default()), BTreeMap::new()));
        };

        let scanner = DocsScanner::new(self.base_dir.join(&docs.dir), docs);
        let pages = self.plugins.scan_complete(scanner.scan()?);

        let route_base = &self.config.site.route_base_docs;
        let nav = self.plugins.nav_built(NavBuilder::new(&pages, route_base).build());
        let sources = pages
            .into_iter()
            .map(|p| (page_path(route_base, &p.slug), p.source))
            .collect();

        Ok((nav, sources))
    }
}

/// A slot keeps only its `ref` when it has one, else its `type`; a slot
/// with neither is empty.
fn normalize_slots(slots: &SlotMap) -> SlotMap {
    slots
        .iter()
        .map(|(name, slot)| {
            let normalized = slot.as_ref().and_then(|s| match (&s.reference, &s.kind) {
                (Some(reference), _) => Some(SlotRef::reference(reference.as_str())),
                (None, Some(kind)) => Some(SlotRef::kind(kind.as_str())),
                (None, None) => None,
            });
            (name.clone(), normalized)
        })
        .collect()
}

fn write_json<T: Serialize>(path: &Path, value: &T, minify: bool) -> Result<(), CompileError> {
    let name = path.display().to_string();
    let json = if minify {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| CompileError::Serialize(name.clone(), e.to_string()))?;

    fs::write(path, json).map_err(|e| CompileError::Write(format!("{}: {}", name, e)))
}

/// Replace `dest` with a copy of `src`. Returns the number of files copied.
fn copy_tree(src: &Path, dest: &Path) -> Result<usize, CompileError> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| CompileError::Write(e.to_string()))?;
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| CompileError::Write(e.to_string()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(|e| {
                CompileError::Write(format!("{}: {}", target.display(), e))
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
