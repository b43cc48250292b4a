//! Slot rendering and the default `Header`/`Footer` renderers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use aiui_manifest::{ComponentEntry, Props, SlotMap, SlotRef};
use aiui_runtime::{SlotRegistry, WidgetDispatcher, WidgetRenderer};
use minijinja::{context, Environment};
use serde::Serialize;

/// Slot types drawn by the layout itself rather than dispatched.
pub const STRUCTURAL_SLOTS: [&str; 3] = ["DocsSidebar", "Toc", "DocContent"];

/// Rendered slots, plus the names of slots explicitly left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedSlots {
    pub html: BTreeMap<String, String>,
    pub empty: Vec<String>,
}

/// Render a merged slot map.
///
/// `ref` slots take their type and props from `components`; `type` slots
/// render with no props. Structural slot types are skipped.
pub fn render_slots(
    slots: &SlotMap,
    components: &BTreeMap<String, ComponentEntry>,
    dispatcher: &WidgetDispatcher<'_>,
) -> RenderedSlots {
    let mut rendered = RenderedSlots::default();
    let no_props = Props::new();

    for (name, slot) in slots {
        let Some(slot) = slot else {
            rendered.empty.push(name.clone());
            continue;
        };

        let Some((kind, props)) = slot_target(slot, components, &no_props) else {
            tracing::debug!("Slot '{}' has nothing to render", name);
            continue;
        };

        if STRUCTURAL_SLOTS.contains(&kind) {
            continue;
        }

        rendered
            .html
            .insert(name.clone(), dispatcher.render(kind, props));
    }

    rendered
}

fn slot_target<'a>(
    slot: &'a SlotRef,
    components: &'a BTreeMap<String, ComponentEntry>,
    no_props: &'a Props,
) -> Option<(&'a str, &'a Props)> {
    if let Some(reference) = slot.reference.as_deref() {
        let Some(component) = components.get(reference) else {
            tracing::warn!("Component '{}' not found", reference);
            return None;
        };
        let kind = component.kind.as_deref().or(slot.kind.as_deref())?;
        return Some((kind, &component.props));
    }

    slot.kind.as_deref().map(|kind| (kind, no_props))
}

/// Register the default slot renderers. Existing registrations are kept.
pub fn register_defaults(registry: &mut SlotRegistry, site_title: &str) {
    if !registry.has("Header") {
        registry.register(
            "Header",
            HeaderRenderer {
                site_title: site_title.to_string(),
            },
        );
    }
    if !registry.has("Footer") {
        registry.register(
            "Footer",
            FooterRenderer {
                site_title: site_title.to_string(),
            },
        );
    }
}

#[derive(Debug, Clone, Serialize)]
struct Link {
    label: String,
    href: String,
    external: bool,
}

fn links(props: &Props) -> Vec<Link> {
    props
        .get("links")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| {
                    Some(Link {
                        label: e.get("label")?.as_str()?.to_string(),
                        href: e.get("href")?.as_str()?.to_string(),
                        external: e.get("external").and_then(|x| x.as_bool()).unwrap_or(false),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn text(props: &Props, key: &str) -> Option<String> {
    props
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Site header: logo, links and an optional call to action.
#[derive(Debug, Clone)]
pub struct HeaderRenderer {
    site_title: String,
}

impl WidgetRenderer for HeaderRenderer {
    fn render(&self, props: &Props) -> String {
        let cta = props.get("cta").and_then(|c| {
            Some(Link {
                label: c.get("label")?.as_str()?.to_string(),
                href: c.get("href")?.as_str()?.to_string(),
                external: false,
            })
        });

        render_slot(
            "header.html",
            context! {
                logo_text => text(props, "logoText").unwrap_or_else(|| self.site_title.clone()),
                logo_image => text(props, "logoImage"),
                links => links(props),
                cta => cta,
            },
        )
    }
}

/// Site footer: text and links.
#[derive(Debug, Clone)]
pub struct FooterRenderer {
    site_title: String,
}

impl WidgetRenderer for FooterRenderer {
    fn render(&self, props: &Props) -> String {
        render_slot(
            "footer.html",
            context! {
                text => text(props, "text").unwrap_or_else(|| self.site_title.clone()),
                links => links(props),
            },
        )
    }
}

fn render_slot(name: &str, ctx: minijinja::Value) -> String {
    match SLOTS.get_template(name).and_then(|t| t.render(ctx)) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Failed to render {}: {}", name, e);
            String::new()
        }
    }
}

static SLOTS: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template("header.html", HEADER_TEMPLATE)
        .expect("Failed to add header template");
    env.add_template("footer.html", FOOTER_TEMPLATE)
        .expect("Failed to add footer template");
    env
});

const HEADER_TEMPLATE: &str = r##"<header class="site-header">
  <a class="site-title" href="/">
    {% if logo_image %}<img src="{{ logo_image }}" alt="{{ logo_text }}">{% endif %}
    <span>{{ logo_text }}</span>
  </a>
  <nav class="header-nav">
  {% for link in links %}
    <a href="{{ link.href }}"{% if link.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ link.label }}</a>
  {% endfor %}
  </nav>
  {% if cta %}<a class="button header-cta" href="{{ cta.href }}">{{ cta.label }}</a>{% endif %}
  <button class="menu-btn" aria-label="Toggle navigation">&#9776;</button>
</header>"##;

const FOOTER_TEMPLATE: &str = r##"<footer class="site-footer">
  <span>{{ text }}</span>
  {% if links %}
  <nav class="footer-links">
  {% for link in links %}<a href="{{ link.href }}">{{ link.label }}</a>
  {% endfor %}
  </nav>
  {% endif %}
</footer>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn components() -> BTreeMap<String, ComponentEntry> {
        let mut components = BTreeMap::new();
        components.insert(
            "header".to_string(),
            ComponentEntry {
                kind: Some("Header".to_string()),
                props: json!({
                    "logoText": "Acme",
                    "links": [{ "label": "GitHub", "href": "#gh", "external": true }],
                    "cta": { "label": "Start", "href": "#start" }
                })
                .as_object()
                .cloned()
                .unwrap(),
            },
        );
        components
    }

    fn registry() -> SlotRegistry {
        let mut registry = SlotRegistry::new();
        register_defaults(&mut registry, "Docs");
        registry
    }

    #[test]
    fn renders_ref_slots_through_registry() {
        let registry = registry();
        let dispatcher = WidgetDispatcher::new(&registry);
        let mut slots = SlotMap::new();
        slots.insert("header".to_string(), Some(SlotRef::reference("header")));

        let rendered = render_slots(&slots, &components(), &dispatcher);

        let header = &rendered.html["header"];
        assert!(header.contains("Acme"));
        assert!(header.contains("noopener"));
        assert!(header.contains("header-cta"));
    }

    #[test]
    fn skips_structural_and_records_empty_slots() {
        let registry = registry();
        let dispatcher = WidgetDispatcher::new(&registry);
        let mut slots = SlotMap::new();
        slots.insert("toc".to_string(), Some(SlotRef::kind("Toc")));
        slots.insert("sidebar".to_string(), Some(SlotRef::kind("DocsSidebar")));
        slots.insert("footer".to_string(), None);

        let rendered = render_slots(&slots, &components(), &dispatcher);

        assert!(rendered.html.is_empty());
        assert_eq!(rendered.empty, vec!["footer"]);
    }

    #[test]
    fn type_slots_use_defaults() {
        let registry = registry();
        let dispatcher = WidgetDispatcher::new(&registry);
        let mut slots = SlotMap::new();
        slots.insert("footer".to_string(), Some(SlotRef::kind("Footer")));
        slots.insert("extra".to_string(), Some(SlotRef::kind("Mystery")));

        let rendered = render_slots(&slots, &components(), &dispatcher);

        assert!(rendered.html["footer"].contains("Docs"));
        assert!(rendered.html["extra"].contains("Unknown widget: Mystery"));
    }

    #[test]
    fn dangling_ref_renders_nothing() {
        let registry = registry();
        let dispatcher = WidgetDispatcher::new(&registry);
        let mut slots = SlotMap::new();
        slots.insert("hero".to_string(), Some(SlotRef::reference("missing")));

        let rendered = render_slots(&slots, &components(), &dispatcher);

        assert!(rendered.html.is_empty());
        assert!(rendered.empty.is_empty());
    }

    #[test]
    fn custom_registrations_are_kept() {
        let mut registry = SlotRegistry::new();
        registry.register("Header", |_: &Props| "<header>custom</header>".to_string());

        register_defaults(&mut registry, "Docs");

        assert_eq!(
            registry.get("Header").unwrap().render(&Props::new()),
            "<header>custom</header>"
        );
        assert!(registry.has("Footer"));
    }
}
