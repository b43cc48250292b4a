//! Page rendering: resolution, zone composition and layout templates.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use aiui_manifest::{parse_document, Document, Manifests};
use aiui_runtime::{
    compose_zones, find_by_path, LayoutKind, Resolver, SlotRegistry, TemplateMatch,
    WidgetDispatcher,
};

use crate::builder::BuildError;
use crate::slots::{register_defaults, render_slots};
use crate::templates::{A11yContext, NavLink, PageContext, TemplateEngine};

/// Template used when no route matches.
pub const FALLBACK_TEMPLATE: &str = "docs";

/// Read and parse a Markdown page.
pub fn read_document(path: &Path) -> Result<Document, BuildError> {
    let source = fs::read_to_string(path)
        .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

    parse_document(&source).map_err(|e| BuildError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Renders pages from a manifest snapshot.
pub struct PageRenderer {
    manifests: Manifests,
    registry: SlotRegistry,
    templates: TemplateEngine,
    base_url: String,
    live_reload: Option<String>,
}

impl PageRenderer {
    /// Default `Header` and `Footer` renderers are added to `registry`
    /// unless it already has them.
    pub fn new(manifests: Manifests, mut registry: SlotRegistry) -> Self {
        register_defaults(&mut registry, &manifests.ui.site.title);

        Self {
            manifests,
            registry,
            templates: TemplateEngine::new(),
            base_url: "/".to_string(),
            live_reload: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Inject a hot reload client script into every page.
    pub fn with_live_reload(mut self, script_url: impl Into<String>) -> Self {
        self.live_reload = Some(script_url.into());
        self
    }

    pub fn manifests(&self) -> &Manifests {
        &self.manifests
    }

    /// A resolver over this snapshot's routes, for rendering many pages.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.manifests.routes)
    }

    /// Resolve the template for `path`, falling back to the `docs`
    /// template and then to a bare three-column page.
    pub fn resolve(&self, resolver: &Resolver<'_>, path: &str) -> TemplateMatch {
        let templates = &self.manifests.ui.templates;

        if let Some(matched) = resolver.resolve(path, templates) {
            return matched;
        }

        match templates.get(FALLBACK_TEMPLATE) {
            Some(template) => TemplateMatch {
                template: FALLBACK_TEMPLATE.to_string(),
                layout: template.layout.clone(),
                slots: template.slots.clone(),
                slot_overrides: BTreeMap::new(),
            },
            None => TemplateMatch {
                template: String::new(),
                layout: LayoutKind::default().name().to_string(),
                slots: BTreeMap::new(),
                slot_overrides: BTreeMap::new(),
            },
        }
    }

    /// Render the page at `path`.
    pub fn render(&self, path: &str, document: Option<&Document>) -> Result<String, BuildError> {
        self.render_with(&self.resolver(), path, document)
    }

    pub fn render_with(
        &self,
        resolver: &Resolver<'_>,
        path: &str,
        document: Option<&Document>,
    ) -> Result<String, BuildError> {
        let ui = &self.manifests.ui;
        let site_title = ui.site.title.clone();

        // Root-level docs pages sit where groups do, which the lookup skips.
        let nav_item = find_by_path(&self.manifests.nav, path).or_else(|| {
            self.manifests
                .nav
                .items
                .iter()
                .find(|item| item.path.as_deref() == Some(path))
        });
        let active = nav_item.and_then(|item| item.path.as_deref());

        let page_title = document
            .and_then(|d| d.title())
            .or(nav_item.map(|item| item.title.as_str()))
            .unwrap_or(&site_title)
            .to_string();

        let matched = self.resolve(resolver, path);
        let layout = LayoutKind::from_name(&matched.layout);
        let zones = ui
            .templates
            .get(&matched.template)
            .and_then(|t| t.zones.as_ref());

        let dispatcher = WidgetDispatcher::new(&self.registry);
        let structure = compose_zones(zones, layout, &dispatcher);
        let slots = render_slots(&matched.merged_slots(), &ui.components, &dispatcher);

        let seo = ui.seo.clone().unwrap_or_default();
        let i18n = ui.i18n.clone().unwrap_or_default();
        let a11y = ui.a11y.clone().unwrap_or_default();
        let title = if page_title == site_title {
            site_title.clone()
        } else {
            format!("{} | {}", seo.format_title(&page_title), site_title)
        };

        let context = PageContext {
            title,
            page_title,
            site_title,
            description: document
                .and_then(|d| d.description())
                .map(str::to_string)
                .or_else(|| ui.site.description.clone()),
            image: seo.default_image.clone(),
            base_url: self.base_url.clone(),
            dir: i18n.direction(&i18n.default_locale),
            lang: i18n.default_locale.clone(),
            theme: ui.site.theme.clone().unwrap_or_default(),
            layout,
            nav: if structure.nav_sidebar {
                NavLink::from_tree(&self.manifests.nav, active)
            } else {
                Vec::new()
            },
            toc: document.map(|d| d.toc.clone()).unwrap_or_default(),
            content: document.map(|d| d.html.clone()),
            missing: document.is_none() && nav_item.is_some(),
            zones: structure
                .zones
                .into_iter()
                .map(|z| (z.zone.key(), z.widgets))
                .collect(),
            slots: slots.html,
            empty_slots: slots.empty,
            a11y: A11yContext::from(&a11y),
            live_reload: self.live_reload.clone(),
        };

        tracing::debug!(
            "Rendering '{}' with template '{}' ({})",
            path,
            matched.template,
            layout.name()
        );

        self.templates
            .render_page(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiui_manifest::{
        I18nConfig, NavItem, NavTree, RouteEntry, RouteManifest, SeoConfig, SiteInfo, SlotRef, TemplateConfig,
        UiConfig, WidgetConfig, ZonesConfig,
    };
    use aiui_manifest::Props;

    fn manifests() -> Manifests {
        let mut templates = BTreeMap::new();
        templates.insert(
            "docs".to_string(),
            TemplateConfig {
                layout: "ThreeColumnLayout".to_string(),
                slots: BTreeMap::new(),
                zones: Some(ZonesConfig {
                    right_sidebar: Some(vec![
                        WidgetConfig::new("Toc"),
                        WidgetConfig::new("StatsCard"),
                    ]),
                    ..Default::default()
                }),
            },
        );
        let mut home_slots = BTreeMap::new();
        home_slots.insert("header".to_string(), Some(SlotRef::kind("Banner")));
        templates.insert(
            "home".to_string(),
            TemplateConfig {
                layout: "CenteredLayout".to_string(),
                slots: home_slots,
                zones: Some(ZonesConfig {
                    hero: Some(vec![WidgetConfig::new("HeroBanner")]),
                    ..Default::default()
                }),
            },
        );

        Manifests {
            ui: UiConfig {
                site: SiteInfo {
                    title: "Acme".to_string(),
                    ..Default::default()
                },
                templates,
                seo: Some(SeoConfig {
                    title_template: "%s docs".to_string(),
                    default_image: None,
                }),
                ..Default::default()
            },
            nav: NavTree {
                items: vec![NavItem {
                    title: "Guide".to_string(),
                    path: None,
                    children: vec![NavItem::new("Intro", Some("/docs/intro".to_string()))],
                }],
            },
            routes: RouteManifest {
                routes: vec![
                    RouteEntry {
                        pattern: "/".to_string(),
                        template: "home".to_string(),
                        priority: 2,
                        slot_overrides: None,
                    },
                    RouteEntry {
                        pattern: "/docs/**".to_string(),
                        template: "docs".to_string(),
                        priority: 1,
                        slot_overrides: None,
                    },
                ],
            },
        }
    }

    fn doc(source: &str) -> Document {
        parse_document(source).unwrap()
    }

    #[test]
    fn renders_docs_page_with_sidebar_widgets() {
        let renderer = PageRenderer::new(manifests(), SlotRegistry::new());

        let html = renderer
            .render("/docs/intro", Some(&doc("# Intro\n\n## Usage\n\nText")))
            .unwrap();

        assert!(html.contains("<title>Intro docs | Acme</title>"));
        assert!(html.contains("Statistics"));
        assert!(html.contains(r##"href="#usage""##));
        assert!(html.contains(r#"<li class="nav-item active">"#));
    }

    #[test]
    fn missing_document_renders_fallback_content() {
        let renderer = PageRenderer::new(manifests(), SlotRegistry::new());

        let html = renderer.render("/docs/intro", None).unwrap();

        assert!(html.contains("Content for <strong>Intro</strong> not found."));
    }

    #[test]
    fn uses_registry_for_custom_slots() {
        let mut registry = SlotRegistry::new();
        registry.register("Banner", |_: &Props| "<div>custom banner</div>".to_string());
        let renderer = PageRenderer::new(manifests(), registry);

        let html = renderer.render("/", None).unwrap();

        assert!(html.contains("custom banner"));
        assert!(html.contains("Welcome"));
        assert!(!html.contains("site-header"));
        assert!(html.contains("<title>Acme</title>"));
    }

    #[test]
    fn unmatched_path_falls_back_to_docs_template() {
        let renderer = PageRenderer::new(manifests(), SlotRegistry::new());
        let resolver = renderer.resolver();

        let matched = renderer.resolve(&resolver, "/blog/post");

        assert_eq!(matched.template, "docs");
        assert_eq!(matched.layout, "ThreeColumnLayout");
    }

    #[test]
    fn falls_back_to_default_layout_without_docs_template() {
        let mut m = manifests();
        m.ui.templates.remove("docs");
        let renderer = PageRenderer::new(m, SlotRegistry::new());

        let matched = renderer.resolve(&renderer.resolver(), "/blog/post");
        assert_eq!(matched.layout, "ThreeColumnLayout");
        assert!(matched.slots.is_empty());

        let html = renderer.render("/blog/post", None).unwrap();
        assert!(html.contains("layout-three-column"));
    }

    #[test]
    fn root_level_pages_are_active() {
        let mut m = manifests();
        m.nav
            .items
            .insert(0, NavItem::new("Overview", Some("/docs".to_string())));
        let renderer = PageRenderer::new(m, SlotRegistry::new());

        let html = renderer.render("/docs", None).unwrap();

        assert!(html.contains(r#"<li class="nav-item active">"#));
        assert!(html.contains("Content for <strong>Overview</strong> not found."));
    }

    #[test]
    fn default_locale_sets_language_and_direction() {
        let mut m = manifests();
        m.ui.i18n = Some(I18nConfig {
            default_locale: "he".to_string(),
            rtl_locales: vec!["he".to_string()],
            ..Default::default()
        });
        let renderer = PageRenderer::new(m, SlotRegistry::new());

        let html = renderer.render("/docs/intro", None).unwrap();

        assert!(html.contains(r#"<html lang="he" dir="rtl""#));
        assert!(html.contains("skip-link"));
    }

    #[test]
    fn live_reload_script_is_injected() {
        let renderer =
            PageRenderer::new(manifests(), SlotRegistry::new()).with_live_reload("/__hmr.js");

        let html = renderer.render("/docs/intro", None).unwrap();

        assert!(html.contains("__hmr.js"));
    }

    #[test]
    fn reads_documents_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("page.md");
        fs::write(&path, "---\ntitle: From Disk\n---\n# Heading").unwrap();

        let document = read_document(&path).unwrap();
        assert_eq!(document.title(), Some("From Disk"));

        assert!(matches!(
            read_document(&temp.path().join("missing.md")),
            Err(BuildError::ReadError(_))
        ));
    }
}
