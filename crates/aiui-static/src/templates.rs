//! Page templates.
//!
//! Each layout is a template extending `base.html`. Zones, navigation and
//! the table of contents are shared partials.

use std::collections::BTreeMap;

use aiui_manifest::{A11yConfig, NavItem, NavTree, ThemeConfig, TocEntry};
use aiui_runtime::LayoutKind;
use minijinja::Environment;
use serde::Serialize;

/// A navigation link with its active state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub path: Option<String>,
    pub active: bool,
    pub children: Vec<NavLink>,
}

impl NavLink {
    /// Convert a nav tree, marking the item whose path is `active`.
    pub fn from_tree(tree: &NavTree, active: Option<&str>) -> Vec<NavLink> {
        tree.items.iter().map(|item| Self::from_item(item, active)).collect()
    }

    fn from_item(item: &NavItem, active: Option<&str>) -> NavLink {
        NavLink {
            title: item.title.clone(),
            path: item.path.clone(),
            active: active.is_some() && item.path.as_deref() == active,
            children: item
                .children
                .iter()
                .map(|c| Self::from_item(c, active))
                .collect(),
        }
    }
}

/// Everything a layout template can see.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    /// Full `<title>` text
    pub title: String,
    pub page_title: String,
    pub site_title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub base_url: String,
    /// Document language and text direction
    pub lang: String,
    pub dir: &'static str,
    pub theme: ThemeConfig,
    pub layout: LayoutKind,
    pub nav: Vec<NavLink>,
    pub toc: Vec<TocEntry>,
    /// Rendered page body, `None` when there is no document
    pub content: Option<String>,
    /// The path is a known page whose document is missing
    pub missing: bool,
    /// Rendered widgets per zone key; empty zones are absent
    pub zones: BTreeMap<&'static str, Vec<String>>,
    /// Rendered slots per slot name
    pub slots: BTreeMap<String, String>,
    /// Slots explicitly left empty
    pub empty_slots: Vec<String>,
    pub a11y: A11yContext,
    /// Hot reload client script URL
    pub live_reload: Option<String>,
}

/// Accessibility switches and landmark labels for the layout.
#[derive(Debug, Clone, Serialize)]
pub struct A11yContext {
    pub skip_link: bool,
    pub focus_visible: bool,
    pub reduce_motion: bool,
    pub nav_label: String,
    pub toc_label: String,
    pub menu_label: String,
}

impl From<&A11yConfig> for A11yContext {
    fn from(config: &A11yConfig) -> Self {
        Self {
            skip_link: config.skip_to_content,
            focus_visible: config.focus_visible,
            reduce_motion: config.reduce_motion,
            nav_label: config.label("navigation", "Documentation").to_string(),
            toc_label: config.label("toc", "On this page").to_string(),
            menu_label: config.label("menu", "Toggle navigation").to_string(),
        }
    }
}

/// The template file for a layout.
pub fn layout_template(layout: LayoutKind) -> &'static str {
    match layout {
        LayoutKind::ThreeColumn => "three_column.html",
        LayoutKind::TwoColumn => "two_column.html",
        LayoutKind::Centered => "centered.html",
        LayoutKind::FullWidth => "full_width.html",
        LayoutKind::Flexible => "flexible.html",
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .expect("Failed to add built-in template");
        }

        Self { env }
    }

    /// Render a page with its layout's template.
    pub fn render_page(&self, context: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(layout_template(context.layout))?;
        tmpl.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const TEMPLATES: [(&str, &str); 11] = [
    ("base.html", BASE_TEMPLATE),
    ("nav.html", NAV_TEMPLATE),
    ("toc.html", TOC_TEMPLATE),
    ("zone.html", ZONE_TEMPLATE),
    ("content.html", CONTENT_TEMPLATE),
    ("three_column.html", THREE_COLUMN_TEMPLATE),
    ("two_column.html", TWO_COLUMN_TEMPLATE),
    ("centered.html", CENTERED_TEMPLATE),
    ("full_width.html", FULL_WIDTH_TEMPLATE),
    ("flexible.html", FLEXIBLE_TEMPLATE),
    ("error.html", ERROR_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}" dir="{{ dir }}" class="{% if theme.darkMode %}dark{% endif %}{% if a11y.focus_visible %} focus-visible{% endif %}{% if a11y.reduce_motion %} reduce-motion{% endif %}" data-theme="{{ theme.preset }}" data-radius="{{ theme.radius }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">{% endif %}
  {% if image %}<meta property="og:image" content="{{ image }}">{% endif %}
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body data-layout="{{ layout }}">
  {% if a11y.skip_link %}<a class="skip-link" href="#content">Skip to content</a>{% endif %}
  {% if slots.header %}{{ slots.header | safe }}{% elif "header" not in empty_slots %}
  <header class="site-header">
    <a class="site-title" href="{{ base_url }}">{{ site_title }}</a>
    <button class="menu-btn" aria-label="{{ a11y.menu_label }}">&#9776;</button>
  </header>
  {% endif %}
  {% block body %}{% endblock %}
  {% if slots.footer %}{{ slots.footer | safe }}{% elif "footer" not in empty_slots %}
  <footer class="site-footer"><span>{{ site_title }}</span></footer>
  {% endif %}
  <script src="{{ base_url }}assets/main.js"></script>
  {% if live_reload %}<script src="{{ live_reload }}"></script>{% endif %}
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<nav class="docs-nav" aria-label="{{ a11y.nav_label }}">
  <ul class="nav-list">
  {% for item in nav recursive %}
    <li class="nav-item{% if item.active %} active{% endif %}">
      {% if item.path %}<a href="{{ item.path }}">{{ item.title }}</a>{% else %}<span class="nav-group">{{ item.title }}</span>{% endif %}
      {% if item.children %}<ul class="nav-children">{{ loop(item.children) }}</ul>{% endif %}
    </li>
  {% endfor %}
  </ul>
</nav>"##;

const TOC_TEMPLATE: &str = r##"<aside class="toc" aria-label="{{ a11y.toc_label }}">
  <h4>{{ a11y.toc_label }}</h4>
  {% if toc %}
  <ul>
  {% for entry in toc %}{% if entry.level > 1 %}
    <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
  {% endif %}{% endfor %}
  </ul>
  {% endif %}
  {% with name = "rightSidebar" %}{% include "zone.html" %}{% endwith %}
</aside>"##;

const ZONE_TEMPLATE: &str = r##"{% if zones[name] %}<div class="zone zone-{{ name }}">
{% for widget in zones[name] %}  <div class="widget">{{ widget | safe }}</div>
{% endfor %}</div>{% endif %}"##;

const CONTENT_TEMPLATE: &str = r##"{% for name, html in slots | items %}{% if name != "header" and name != "footer" %}
<div class="slot slot-{{ name }}">{{ html | safe }}</div>
{% endif %}{% endfor %}
<article class="doc" id="content">
{% if content %}{{ content | safe }}
{% elif missing %}<p><em>Content for <strong>{{ page_title }}</strong> not found.</em></p>
{% else %}<h1>{{ site_title }}</h1>{% if description %}<p class="lead">{{ description }}</p>{% endif %}
{% endif %}
</article>"##;

const THREE_COLUMN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block body %}
<div class="layout layout-three-column">
  <aside class="sidebar">{% include "nav.html" %}</aside>
  <main class="main">{% include "content.html" %}</main>
  {% include "toc.html" %}
</div>
{% endblock %}"##;

const TWO_COLUMN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block body %}
<div class="layout layout-two-column">
  <aside class="sidebar">{% include "nav.html" %}</aside>
  <main class="main">{% include "content.html" %}</main>
</div>
{% endblock %}"##;

const CENTERED_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block body %}
<div class="layout layout-centered">
  <main class="main centered">
    {% with name = "hero" %}{% include "zone.html" %}{% endwith %}
    {% include "content.html" %}
  </main>
</div>
{% endblock %}"##;

const FULL_WIDTH_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block body %}
<div class="layout layout-full-width">
  {% with name = "hero" %}{% include "zone.html" %}{% endwith %}
  <main class="main">{% include "content.html" %}</main>
</div>
{% endblock %}"##;

const FLEXIBLE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block body %}
<div class="layout layout-flexible">
  {% with name = "header" %}{% include "zone.html" %}{% endwith %}
  {% with name = "topNav" %}{% include "zone.html" %}{% endwith %}
  {% with name = "hero" %}{% include "zone.html" %}{% endwith %}
  <div class="flexible-body">
    {% if zones.leftSidebar %}<aside class="sidebar">{% with name = "leftSidebar" %}{% include "zone.html" %}{% endwith %}</aside>{% endif %}
    <main class="main">
      {% with name = "main" %}{% include "zone.html" %}{% endwith %}
      {% include "content.html" %}
    </main>
    {% include "toc.html" %}
  </div>
  {% with name = "bottomNav" %}{% include "zone.html" %}{% endwith %}
  {% with name = "footer" %}{% include "zone.html" %}{% endwith %}
</div>
{% endblock %}"##;

/// Standalone page for a failed manifest load.
const ERROR_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en" class="dark">
<head>
  <meta charset="utf-8">
  <title>Failed to load</title>
  <link rel="stylesheet" href="/assets/main.css">
</head>
<body>
  <div class="load-error">
    <h2>Failed to load</h2>
    <p>{{ message }}</p>
  </div>
  {% if live_reload %}<script src="{{ live_reload }}"></script>{% endif %}
</body>
</html>"##;

impl TemplateEngine {
    /// Render the blocking "Failed to load" page.
    pub fn render_error(
        &self,
        message: &str,
        live_reload: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.env
            .get_template("error.html")?
            .render(minijinja::context! { message => message, live_reload => live_reload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(layout: LayoutKind) -> PageContext {
        PageContext {
            title: "Intro | Docs".to_string(),
            page_title: "Intro".to_string(),
            site_title: "Docs".to_string(),
            description: None,
            image: None,
            base_url: "/".to_string(),
            lang: "en".to_string(),
            dir: "ltr",
            theme: ThemeConfig::default(),
            layout,
            nav: vec![],
            toc: vec![],
            content: Some("<p>Hello world</p>".to_string()),
            missing: false,
            zones: BTreeMap::new(),
            slots: BTreeMap::new(),
            empty_slots: vec![],
            a11y: A11yContext::from(&A11yConfig::default()),
            live_reload: None,
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page(&context(LayoutKind::ThreeColumn)).unwrap();

        assert!(html.contains("<title>Intro | Docs</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains(r#"<html lang="en" dir="ltr" class="dark focus-visible""#));
        assert!(html.contains(r##"<a class="skip-link" href="#content">"##));
        assert!(html.contains(r#"<article class="doc" id="content">"#));
        assert!(html.contains(r#"data-theme="zinc""#));
        assert!(html.contains("On this page"));
    }

    #[test]
    fn renders_nested_navigation() {
        let engine = TemplateEngine::new();
        let tree = NavTree {
            items: vec![NavItem {
                title: "Guide".to_string(),
                path: None,
                children: vec![NavItem::new("Button", Some("/docs/button".to_string()))],
            }],
        };
        let mut ctx = context(LayoutKind::TwoColumn);
        ctx.nav = NavLink::from_tree(&tree, Some("/docs/button"));

        let html = engine.render_page(&ctx).unwrap();

        assert!(html.contains(r#"<span class="nav-group">Guide</span>"#));
        assert!(html.contains(r#"<li class="nav-item active">"#));
        assert!(html.contains(">Button</a>"));
        assert!(!html.contains("On this page"));
    }

    #[test]
    fn empty_zones_are_omitted() {
        let engine = TemplateEngine::new();
        let mut ctx = context(LayoutKind::Flexible);
        ctx.zones.insert("hero", vec!["<h1>Hero</h1>".to_string()]);

        let html = engine.render_page(&ctx).unwrap();

        assert!(html.contains(r#"<div class="zone zone-hero">"#));
        assert!(html.contains("<h1>Hero</h1>"));
        assert!(!html.contains("zone-footer"));
        assert!(!html.contains("zone-leftSidebar"));
    }

    #[test]
    fn explicit_empty_header_hides_default() {
        let engine = TemplateEngine::new();
        let mut ctx = context(LayoutKind::Centered);
        ctx.empty_slots.push("header".to_string());

        let html = engine.render_page(&ctx).unwrap();

        assert!(!html.contains("site-header"));
        assert!(html.contains("site-footer"));
    }

    #[test]
    fn missing_content_shows_fallback() {
        let engine = TemplateEngine::new();
        let mut ctx = context(LayoutKind::FullWidth);
        ctx.content = None;
        ctx.missing = true;

        let html = engine.render_page(&ctx).unwrap();

        assert!(html.contains("Content for <strong>Intro</strong> not found."));
    }

    #[test]
    fn escapes_titles() {
        let engine = TemplateEngine::new();
        let mut ctx = context(LayoutKind::ThreeColumn);
        ctx.title = "<script>".to_string();

        let html = engine.render_page(&ctx).unwrap();

        assert!(html.contains("<title>&lt;script&gt;</title>"));
    }

    #[test]
    fn applies_locale_and_accessibility_settings() {
        let engine = TemplateEngine::new();
        let mut ctx = context(LayoutKind::ThreeColumn);
        ctx.lang = "ar".to_string();
        ctx.dir = "rtl";
        let mut a11y = A11yConfig {
            skip_to_content: false,
            reduce_motion: true,
            ..Default::default()
        };
        a11y.aria_labels
            .insert("navigation".to_string(), "Main navigation".to_string());
        ctx.a11y = A11yContext::from(&a11y);

        let html = engine.render_page(&ctx).unwrap();

        assert!(html.contains(r#"<html lang="ar" dir="rtl""#));
        assert!(html.contains("reduce-motion"));
        assert!(!html.contains("skip-link"));
        assert!(html.contains(r#"aria-label="Main navigation""#));
    }

    #[test]
    fn renders_error_page() {
        let engine = TemplateEngine::new();
        let html = engine.render_error("ui-config.json missing", Some("/__hmr.js")).unwrap();
        assert!(html.contains("Failed to load"));
        assert!(html.contains("ui-config.json missing"));
        assert!(html.contains("__hmr.js"));
    }
}
