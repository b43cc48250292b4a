//! Built-in widgets and the widget dispatcher.
//!
//! Built-in widget kinds form a closed enum; anything else is looked up in
//! the [`SlotRegistry`]. Unknown kinds never fail: they render a visible
//! placeholder naming the type.

use std::sync::LazyLock;

use aiui_manifest::{Props, WidgetConfig};
use chrono::Datelike;
use minijinja::{context, Environment, Value};
use serde::Serialize;

use crate::registry::SlotRegistry;

/// Widget kinds rendered without registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinWidget {
    StatsCard,
    QuickLinks,
    Newsletter,
    SocialLinks,
    Copyright,
    HeroBanner,
}

impl BuiltinWidget {
    pub const ALL: [BuiltinWidget; 6] = [
        BuiltinWidget::StatsCard,
        BuiltinWidget::QuickLinks,
        BuiltinWidget::Newsletter,
        BuiltinWidget::SocialLinks,
        BuiltinWidget::Copyright,
        BuiltinWidget::HeroBanner,
    ];

    /// Parse a widget type tag.
    pub fn from_type(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.type_name() == kind)
    }

    /// The type tag used in manifests.
    pub fn type_name(self) -> &'static str {
        match self {
            BuiltinWidget::StatsCard => "StatsCard",
            BuiltinWidget::QuickLinks => "QuickLinks",
            BuiltinWidget::Newsletter => "Newsletter",
            BuiltinWidget::SocialLinks => "SocialLinks",
            BuiltinWidget::Copyright => "Copyright",
            BuiltinWidget::HeroBanner => "HeroBanner",
        }
    }

    fn template_name(self) -> &'static str {
        match self {
            BuiltinWidget::StatsCard => "stats_card.html",
            BuiltinWidget::QuickLinks => "quick_links.html",
            BuiltinWidget::Newsletter => "newsletter.html",
            BuiltinWidget::SocialLinks => "social_links.html",
            BuiltinWidget::Copyright => "copyright.html",
            BuiltinWidget::HeroBanner => "hero_banner.html",
        }
    }

    /// Template context with defaults applied for missing or unusable props.
    fn context(self, props: &Props) -> Value {
        match self {
            BuiltinWidget::StatsCard => {
                let change_type = match text_prop(props, "changeType", "positive").as_str() {
                    "negative" => "negative",
                    _ => "positive",
                };
                context! {
                    title => text_prop(props, "title", "Statistics"),
                    value => text_prop(props, "value", "0"),
                    change => text_prop(props, "change", ""),
                    change_type => change_type,
                }
            }
            BuiltinWidget::QuickLinks => context! {
                title => text_prop(props, "title", "Quick Links"),
                links => link_list(props, "label"),
            },
            BuiltinWidget::Newsletter => context! {
                title => text_prop(props, "title", "Newsletter"),
                placeholder => text_prop(props, "placeholder", "Enter your email"),
                button_text => text_prop(props, "buttonText", "Subscribe"),
            },
            BuiltinWidget::SocialLinks => context! {
                links => link_list(props, "platform"),
            },
            BuiltinWidget::Copyright => {
                let default = format!("© {}", chrono::Local::now().year());
                context! {
                    text => text_prop(props, "text", &default),
                }
            }
            BuiltinWidget::HeroBanner => context! {
                title => text_prop(props, "title", "Welcome"),
                subtitle => text_prop(props, "subtitle", ""),
                cta_label => text_prop(props, "ctaLabel", ""),
                cta_href => text_prop(props, "ctaHref", ""),
            },
        }
    }

    /// Render this widget. Never fails.
    pub fn render(self, props: &Props) -> String {
        let rendered = WIDGETS
            .get_template(self.template_name())
            .and_then(|t| t.render(self.context(props)));

        match rendered {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to render {} widget: {}", self.type_name(), e);
                placeholder(self.type_name())
            }
        }
    }
}

/// A link entry for list widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Link {
    label: String,
    href: String,
}

/// Read a text prop. Strings are used as-is and numbers are formatted;
/// empty strings and other types fall back to `default`.
fn text_prop(props: &Props, key: &str, default: &str) -> String {
    match props.get(key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Read `links` as `[{ <label_key>, href }]`, skipping malformed entries.
fn link_list(props: &Props, label_key: &str) -> Vec<Link> {
    let Some(entries) = props.get("links").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let label = entry.get(label_key)?.as_str()?;
            let href = entry.get("href")?.as_str()?;
            Some(Link {
                label: label.to_string(),
                href: href.to_string(),
            })
        })
        .collect()
}

/// Visible fallback for a widget type nobody can render.
pub fn placeholder(kind: &str) -> String {
    WIDGETS
        .get_template("unknown.html")
        .and_then(|t| t.render(context! { kind => kind }))
        .unwrap_or_else(|_| "<div class=\"widget widget-unknown\">Unknown widget</div>".to_string())
}

/// Renders widgets: built-ins first, then registered renderers, then the placeholder.
#[derive(Debug, Clone, Copy)]
pub struct WidgetDispatcher<'r> {
    registry: &'r SlotRegistry,
}

impl<'r> WidgetDispatcher<'r> {
    pub fn new(registry: &'r SlotRegistry) -> Self {
        Self { registry }
    }

    /// Render a configured widget. Never fails.
    pub fn render_widget(&self, widget: &WidgetConfig) -> String {
        match &widget.props {
            Some(props) => self.render(&widget.kind, props),
            None => self.render(&widget.kind, &Props::new()),
        }
    }

    /// Render a widget type with the given props. Never fails.
    pub fn render(&self, kind: &str, props: &Props) -> String {
        if let Some(builtin) = BuiltinWidget::from_type(kind) {
            return builtin.render(props);
        }

        if let Some(renderer) = self.registry.get(kind) {
            return renderer.render(props);
        }

        tracing::debug!("No renderer for widget type '{}'", kind);
        placeholder(kind)
    }

    /// Whether `kind` resolves to something other than the placeholder.
    pub fn can_render(&self, kind: &str) -> bool {
        BuiltinWidget::from_type(kind).is_some() || self.registry.has(kind)
    }
}

static WIDGETS: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    for (name, source) in WIDGET_TEMPLATES {
        env.add_template(name, source)
            .expect("Invalid built-in widget template");
    }
    env
});

const WIDGET_TEMPLATES: [(&str, &str); 7] = [
    ("stats_card.html", STATS_CARD),
    ("quick_links.html", QUICK_LINKS),
    ("newsletter.html", NEWSLETTER),
    ("social_links.html", SOCIAL_LINKS),
    ("copyright.html", COPYRIGHT),
    ("hero_banner.html", HERO_BANNER),
    ("unknown.html", UNKNOWN),
];

const STATS_CARD: &str = r##"<div class="card widget-stats-card">
  <p class="card-description">{{ title }}</p>
  <p class="card-title stat-value">{{ value }}</p>
  {% if change %}<p class="stat-change stat-{{ change_type }}">{{ change }}</p>{% endif %}
</div>"##;

const QUICK_LINKS: &str = r##"<div class="card widget-quick-links">
  <p class="card-title">{{ title }}</p>
  <ul>
  {% for link in links %}
    <li><a href="{{ link.href }}">{{ link.label }}</a></li>
  {% endfor %}
  </ul>
</div>"##;

const NEWSLETTER: &str = r##"<div class="card widget-newsletter">
  <p class="card-title">{{ title }}</p>
  <p class="card-description">Get the latest updates</p>
  <form class="newsletter-form" onsubmit="return false">
    <input type="email" placeholder="{{ placeholder }}">
    <button type="submit">{{ button_text }}</button>
  </form>
</div>"##;

const SOCIAL_LINKS: &str = r##"<div class="widget-social-links">
{% for link in links %}
  <a href="{{ link.href }}" target="_blank" rel="noopener noreferrer">{{ link.label }}</a>
{% endfor %}
</div>"##;

const COPYRIGHT: &str = r##"<div class="widget-copyright">{{ text }}</div>"##;

const HERO_BANNER: &str = r##"<div class="widget-hero-banner">
  <h1>{{ title }}</h1>
  {% if subtitle %}<p class="hero-subtitle">{{ subtitle }}</p>{% endif %}
  {% if cta_label and cta_href %}<a class="button button-lg" href="{{ cta_href }}">{{ cta_label }}</a>{% endif %}
</div>"##;

const UNKNOWN: &str = r##"<div class="widget widget-unknown">Unknown widget: {{ kind }}</div>"##;
