//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use aiui_manifest::{Config, Document, LoadError, ManifestLoader};
use aiui_runtime::{Resolver, SlotRegistry};
use rayon::prelude::*;

use crate::assets::AssetPipeline;
use crate::compiler::{CompileError, Compiler};
use crate::page::{read_document, PageRenderer};
use crate::plugins::PluginManager;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Parsed `aiui.yaml`
    pub config: Config,

    /// Directory relative content paths resolve against
    pub base_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify JSON and CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,
}

impl BuildConfig {
    pub fn new(config: Config, base_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
            output_dir: output_dir.into(),
            minify: true,
            base_url: "/".to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to parse Markdown: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// What the search index and sitemap need to know about a page.
#[derive(Debug)]
struct PageRecord {
    path: String,
    title: String,
    description: String,
    excerpt: String,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    registry: SlotRegistry,
    plugins: PluginManager,
}

impl StaticBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            registry: SlotRegistry::new(),
            plugins: PluginManager::new(),
        }
    }

    /// Run compile hooks from `plugins`.
    pub fn with_plugins(mut self, plugins: PluginManager) -> Self {
        self.plugins = plugins;
        self
    }

    /// Use a registry with custom widget renderers.
    pub fn with_registry(mut self, registry: SlotRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let out = &self.config.output_dir;

        fs::create_dir_all(out).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let compiled = Compiler::new(&self.config.config, &self.config.base_dir)
            .with_plugins(&self.plugins)
            .compile(out, self.config.minify)?;

        // Render from what was written, exactly as a client would load it.
        let manifests = ManifestLoader::new(out).load().await?;
        let renderer = PageRenderer::new(manifests, self.registry.clone())
            .with_base_url(self.config.base_url.clone());
        let resolver = renderer.resolver();

        let results: Vec<Result<PageRecord, BuildError>> = compiled
            .pages
            .par_iter()
            .map(|(path, source)| self.build_page(&renderer, &resolver, path, Some(source.as_path())))
            .collect();

        let mut records = Vec::with_capacity(results.len());
        for result in results {
            records.push(result?);
        }

        if !compiled.pages.contains_key("/") {
            let route_base = renderer.manifests().ui.site.route_base_docs.as_deref();
            let docs_index = compiled
                .pages
                .get(route_base.unwrap_or(&self.config.config.site.route_base_docs));
            records.push(self.build_page(&renderer, &resolver, "/", docs_index.map(PathBuf::as_path))?);
        }

        self.generate_assets()?;
        self.generate_search_index(&records)?;
        self.generate_sitemap(&records)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: records.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: out.clone(),
        })
    }

    fn build_page(
        &self,
        renderer: &PageRenderer,
        resolver: &Resolver<'_>,
        path: &str,
        source: Option<&Path>,
    ) -> Result<PageRecord, BuildError> {
        let document: Option<Document> = source.and_then(|source| match read_document(source) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!("Rendering {} without content: {}", path, e);
                None
            }
        });

        let html = renderer.render_with(resolver, path, document.as_ref())?;

        let output_path = page_output_path(&self.config.output_dir, path);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::write(&output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let title = document
            .as_ref()
            .and_then(|d| d.title())
            .unwrap_or(&renderer.manifests().ui.site.title)
            .to_string();

        Ok(PageRecord {
            path: path.to_string(),
            title,
            description: document
                .as_ref()
                .and_then(|d| d.description())
                .unwrap_or_default()
                .to_string(),
            excerpt: document.as_ref().map(|d| excerpt(&d.body)).unwrap_or_default(),
        })
    }

    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(
            assets_dir.join("main.css"),
            AssetPipeline::stylesheet(self.config.minify),
        )
        .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn generate_search_index(&self, records: &[PageRecord]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = records
            .iter()
            .map(|page| {
                serde_json::json!({
                    "title": page.title,
                    "description": page.description,
                    "url": page.path,
                    "content": page.excerpt,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn generate_sitemap(&self, records: &[PageRecord]) -> Result<(), BuildError> {
        let base = self.config.base_url.trim_end_matches('/');

        let urls: Vec<String> = records
            .iter()
            .map(|page| format!("  <url>\n    <loc>{}{}</loc>\n  </url>", base, page.path))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml",
            base
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// `/docs/intro` -> `<out>/docs/intro/index.html`, `/` -> `<out>/index.html`.
pub fn page_output_path(output_dir: &Path, path: &str) -> PathBuf {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(trimmed).join("index.html")
    }
}

/// Plain-ish text from the first lines of a page body.
fn excerpt(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("```"))
        .take(10)
        .collect::<Vec<_>>()
        .join(" ")
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
  home:
    layout: CenteredLayout
    zones:
      hero:
        - type: HeroBanner
          props: { title: Build faster }
routes:
  - match: "/"
    template: home
  - match: "/docs/**"
    template: docs
"#;

    fn setup() -> (tempfile::TempDir, BuildConfig) {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(docs.join("guide")).unwrap();
        fs::write(
            docs.join("index.md"),
            "---\ntitle: Home\ndescription: Start here\n---\n# Welcome\n\nSearchable content",
        )
        .unwrap();
        fs::write(docs.join("guide").join("01-intro.md"), "# Intro\n\n## Setup\n").unwrap();

        let config = BuildConfig::new(
            Config::from_yaml(CONFIG).unwrap(),
            temp.path(),
            temp.path().join("dist"),
        );
        (temp, config)
    }

    #[tokio::test]
    async fn builds_pages_and_landing() {
        let (_temp, config) = setup();
        let out = config.output_dir.clone();

        let result = StaticBuilder::new(config).build().await.unwrap();

        assert_eq!(result.pages, 3);
        assert!(out.join("docs").join("index.html").exists());
        assert!(out.join("docs/guide/intro/index.html").exists());

        let landing = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(landing.contains("Build faster"));
        assert!(landing.contains("layout-centered"));

        let intro = fs::read_to_string(out.join("docs/guide/intro/index.html")).unwrap();
        assert!(intro.contains("layout-three-column"));
        assert!(intro.contains("<title>Intro | Acme</title>"));
    }

    #[tokio::test]
    async fn writes_manifests_and_site_files() {
        let (_temp, config) = setup();
        let out = config.output_dir.clone();

        StaticBuilder::new(config).build().await.unwrap();

        for file in [
            "ui-config.json",
            "docs-nav.json",
            "route-manifest.json",
            "assets/main.css",
            "assets/main.js",
            "sitemap.xml",
            "robots.txt",
        ] {
            assert!(out.join(file).exists(), "missing {}", file);
        }

        let index = fs::read_to_string(out.join("search-index.json")).unwrap();
        assert!(index.contains("Start here"));
        assert!(index.contains("Searchable content"));

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>/docs/guide/intro</loc>"));
    }

    struct HideGuide;

    impl crate::plugins::Plugin for HideGuide {
        fn name(&self) -> &str {
            "hide-guide"
        }

        fn on_scan_complete(
            &self,
            pages: Vec<crate::scanner::DocPage>,
        ) -> Vec<crate::scanner::DocPage> {
            pages
                .into_iter()
                .filter(|p| !p.slug.starts_with("guide"))
                .collect()
        }
    }

    #[tokio::test]
    async fn plugins_shape_the_built_site() {
        let (_temp, config) = setup();
        let out = config.output_dir.clone();
        let mut plugins = PluginManager::new();
        plugins.register(HideGuide).unwrap();

        let result = StaticBuilder::new(config)
            .with_plugins(plugins)
            .build()
            .await
            .unwrap();

        assert_eq!(result.pages, 2);
        assert!(!out.join("docs/guide/intro/index.html").exists());
    }

    #[tokio::test]
    async fn fails_on_invalid_config() {
        let (temp, mut config) = setup();
        config.config.routes[0].template = "missing".to_string();

        let err = StaticBuilder::new(config).build().await.unwrap_err();

        assert!(matches!(err, BuildError::Compile(CompileError::Validation(_))));
        assert!(!temp.path().join("dist").join("index.html").exists());
    }

    #[test]
    fn maps_paths_to_output_files() {
        let out = Path::new("dist");
        assert_eq!(page_output_path(out, "/"), out.join("index.html"));
        assert_eq!(
            page_output_path(out, "/docs/intro/"),
            out.join("docs").join("intro").join("index.html")
        );
    }

    #[test]
    fn excerpt_skips_headings_and_fences() {
        assert_eq!(
            excerpt("# Title\n\nFirst line\n```rust\nlet x = 1;\n```\nSecond"),
            "First line let x = 1; Second"
        );
    }
}
