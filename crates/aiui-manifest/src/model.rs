//! Manifest documents consumed at render time.
//!
//! These mirror the JSON files written by the compiler. All of them are
//! loaded once and treated as immutable snapshots for the duration of a
//! render.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form widget/component properties.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Slot name to slot reference. `None` marks a slot as intentionally empty.
pub type SlotMap = BTreeMap<String, Option<SlotRef>>;

/// Reference to what fills a template slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    /// Name of a component instance in `UiConfig::components`
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Widget/component type tag
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SlotRef {
    /// Slot filled by a named component instance.
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            reference: Some(name.into()),
            kind: None,
        }
    }

    /// Slot filled directly by a widget type.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            reference: None,
            kind: Some(kind.into()),
        }
    }
}

/// A declaratively configured widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
}

impl WidgetConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: None,
        }
    }

    pub fn with_props(kind: impl Into<String>, props: Props) -> Self {
        Self {
            kind: kind.into(),
            props: Some(props),
        }
    }
}

/// The eight page zones, each an ordered widget list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_nav: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_sidebar: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_sidebar: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_nav: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Vec<WidgetConfig>>,
}

/// A named template: layout plus slot assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Layout identifier, e.g. "ThreeColumnLayout"
    #[serde(default)]
    pub layout: String,

    #[serde(default)]
    pub slots: SlotMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<ZonesConfig>,
}

/// Theme settings passed through to the rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_radius")]
    pub radius: String,
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

fn default_preset() -> String {
    "zinc".to_string()
}
fn default_radius() -> String {
    "md".to_string()
}
fn default_dark_mode() -> bool {
    true
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            radius: default_radius(),
            dark_mode: default_dark_mode(),
        }
    }
}

/// Site-level settings as emitted into `ui-config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_base_docs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeConfig>,
}

/// SEO settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoConfig {
    /// Page title template; `%s` is replaced by the page title
    #[serde(default = "default_title_template")]
    pub title_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
}

fn default_title_template() -> String {
    "%s".to_string()
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            title_template: default_title_template(),
            default_image: None,
        }
    }
}

impl SeoConfig {
    /// Apply the title template to a page title.
    pub fn format_title(&self, title: &str) -> String {
        self.title_template.replace("%s", title)
    }
}

/// Locale settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    /// Locales written right to left
    #[serde(default)]
    pub rtl_locales: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_locale: Option<String>,
    #[serde(default = "default_translations_dir")]
    pub translations_dir: String,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec![default_locale()]
}

fn default_translations_dir() -> String {
    "./translations".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: default_locales(),
            rtl_locales: Vec::new(),
            fallback_locale: None,
            translations_dir: default_translations_dir(),
        }
    }
}

impl I18nConfig {
    /// Text direction for `locale`, as used by the HTML `dir` attribute.
    pub fn direction(&self, locale: &str) -> &'static str {
        if self.rtl_locales.iter().any(|l| l == locale) {
            "rtl"
        } else {
            "ltr"
        }
    }
}

/// Accessibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A11yConfig {
    #[serde(default = "enabled")]
    pub skip_to_content: bool,
    #[serde(default = "enabled")]
    pub focus_visible: bool,
    #[serde(default)]
    pub reduce_motion: bool,
    /// Overrides for built-in ARIA labels, keyed by landmark
    #[serde(default)]
    pub aria_labels: BTreeMap<String, String>,
}

fn enabled() -> bool {
    true
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            skip_to_content: true,
            focus_visible: true,
            reduce_motion: false,
            aria_labels: BTreeMap::new(),
        }
    }
}

impl A11yConfig {
    /// The configured label for `key`, or `fallback`.
    pub fn label<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.aria_labels.get(key).map(String::as_str).unwrap_or(fallback)
    }
}

/// A component instance referenced from slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub props: Props,
}

/// `ui-config.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub site: SiteInfo,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentEntry>,
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18nConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a11y: Option<A11yConfig>,
}

/// A navigation tree node. Top-level items are groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn new(title: impl Into<String>, path: Option<String>) -> Self {
        Self {
            title: title.into(),
            path,
            children: Vec::new(),
        }
    }
}

/// `docs-nav.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTree {
    #[serde(default)]
    pub items: Vec<NavItem>,
}

/// One prioritized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub pattern: String,
    pub template: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_overrides: Option<SlotMap>,
}

/// `route-manifest.json`. Declaration order is significant for tie-breaks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}
