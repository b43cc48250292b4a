//! The compiled site snapshot the dev server renders from.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use aiui_manifest::{Config, Document, ManifestLoader};
use aiui_runtime::{SlotRegistry, TemplateMatch};
use aiui_static::{read_document, BuildError, Compiler, PageRenderer};

use crate::server::ServerError;
use crate::websocket::HMR_SCRIPT_PATH;

/// Manifests compiled from the current config, plus where each page's
/// Markdown lives.
pub struct DevSite {
    renderer: PageRenderer,
    pages: BTreeMap<String, PathBuf>,
    sources: HashMap<PathBuf, String>,
    docs_dir: Option<PathBuf>,
    route_base_docs: String,
}

impl DevSite {
    /// Compile `config_path` into `work_dir` and load the result back.
    pub async fn load(
        config_path: &Path,
        work_dir: &Path,
        registry: SlotRegistry,
    ) -> Result<Self, ServerError> {
        let config = Config::load(config_path)?;
        let base_dir = base_dir(config_path);

        let compiled = Compiler::new(&config, base_dir).compile(work_dir, false)?;
        let manifests = ManifestLoader::new(work_dir).load().await?;

        let sources = compiled
            .pages
            .iter()
            .filter_map(|(path, source)| Some((fs::canonicalize(source).ok()?, path.clone())))
            .collect();

        tracing::info!("Loaded {} pages from {}", compiled.pages.len(), config_path.display());

        Ok(Self {
            renderer: PageRenderer::new(manifests, registry).with_live_reload(HMR_SCRIPT_PATH),
            pages: compiled.pages,
            sources,
            docs_dir: config.docs().map(|docs| base_dir.join(&docs.dir)),
            route_base_docs: config.site.route_base_docs,
        })
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// The docs directory, when the config declares one.
    pub fn docs_dir(&self) -> Option<&Path> {
        self.docs_dir.as_deref()
    }

    /// Markdown source for `path`. The landing page shows the docs index.
    pub fn source_for(&self, path: &str) -> Option<&Path> {
        self.pages
            .get(path)
            .or_else(|| (path == "/").then(|| self.pages.get(&self.route_base_docs)).flatten())
            .map(PathBuf::as_path)
    }

    /// Nav path of the page built from `source`.
    pub fn page_for_source(&self, source: &Path) -> Option<&str> {
        let canonical = fs::canonicalize(source).ok()?;
        self.sources.get(&canonical).map(String::as_str)
    }

    /// Render the full page at `path`, reading its Markdown fresh.
    pub fn render(&self, path: &str) -> Result<String, BuildError> {
        let document: Option<Document> = self.source_for(path).and_then(|source| {
            read_document(source)
                .map_err(|e| tracing::warn!("Rendering {} without content: {}", path, e))
                .ok()
        });

        self.renderer.render(path, document.as_ref())
    }

    pub fn resolve(&self, path: &str) -> Option<TemplateMatch> {
        self.renderer
            .resolver()
            .resolve(path, &self.renderer.manifests().ui.templates)
    }
}

/// Relative content paths resolve against the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// `/docs/intro/` and `/docs/intro` are the same page.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
site:
  title: Acme
content:
  docs:
    dir: docs
templates:
  docs:
    layout: ThreeColumnLayout
routes:
  - match: "/docs/**"
    template: docs
"#;

    fn project() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(temp.path().join("aiui.yaml"), CONFIG).unwrap();
        fs::write(docs.join("index.md"), "# Home\n\nWelcome home").unwrap();
        fs::write(docs.join("intro.md"), "# Intro\n\nFirst steps").unwrap();
        temp
    }

    async fn load(temp: &tempfile::TempDir) -> DevSite {
        DevSite::load(
            &temp.path().join("aiui.yaml"),
            &temp.path().join(".aiui"),
            SlotRegistry::new(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn renders_pages_with_live_reload() {
        let temp = project();
        let site = load(&temp).await;

        let html = site.render("/docs/intro").unwrap();

        assert!(html.contains("First steps"));
        assert!(html.contains("__hmr.js"));
        assert!(temp.path().join(".aiui").join("route-manifest.json").exists());
    }

    #[tokio::test]
    async fn landing_page_shows_docs_index() {
        let temp = project();
        let site = load(&temp).await;

        assert_eq!(
            site.source_for("/"),
            Some(temp.path().join("docs").join("index.md").as_path())
        );
        assert!(site.render("/").unwrap().contains("Welcome home"));
    }

    #[tokio::test]
    async fn maps_sources_back_to_pages() {
        let temp = project();
        let site = load(&temp).await;

        assert_eq!(
            site.page_for_source(&temp.path().join("docs").join("intro.md")),
            Some("/docs/intro")
        );
        assert_eq!(site.page_for_source(&temp.path().join("nope.md")), None);
        assert_eq!(site.docs_dir(), Some(temp.path().join("docs").as_path()));
    }

    #[tokio::test]
    async fn resolves_templates() {
        let temp = project();
        let site = load(&temp).await;

        assert_eq!(site.resolve("/docs/intro").unwrap().template, "docs");
        assert!(site.resolve("/blog").is_none());
    }

    #[tokio::test]
    async fn bad_config_fails_to_load() {
        let temp = project();
        fs::write(temp.path().join("aiui.yaml"), "site: [").unwrap();

        let result = DevSite::load(
            &temp.path().join("aiui.yaml"),
            &temp.path().join(".aiui"),
            SlotRegistry::new(),
        )
        .await;

        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn normalizes_request_paths() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/docs/intro/"), "/docs/intro");
        assert_eq!(normalize_path("docs"), "/docs");
    }

    #[test]
    fn base_dir_defaults_to_current_directory() {
        assert_eq!(base_dir(Path::new("aiui.yaml")), Path::new("."));
        assert_eq!(base_dir(Path::new("site/aiui.yaml")), Path::new("site"));
    }
}
