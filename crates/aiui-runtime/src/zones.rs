//! Page composition from layout zones.

use aiui_manifest::{WidgetConfig, ZonesConfig};
use serde::Serialize;

use crate::widgets::WidgetDispatcher;

/// Widget type rendered by the layout's table-of-contents column, never as a zone widget.
pub const TOC_WIDGET: &str = "Toc";

/// Page layouts. Unknown identifiers fall back to [`LayoutKind::ThreeColumn`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LayoutKind {
    #[default]
    #[serde(rename = "ThreeColumnLayout")]
    ThreeColumn,
    #[serde(rename = "TwoColumnLayout")]
    TwoColumn,
    #[serde(rename = "CenteredLayout")]
    Centered,
    #[serde(rename = "FullWidthLayout")]
    FullWidth,
    #[serde(rename = "FlexibleLayout")]
    Flexible,
}

impl LayoutKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ThreeColumnLayout" => LayoutKind::ThreeColumn,
            "TwoColumnLayout" => LayoutKind::TwoColumn,
            "CenteredLayout" => LayoutKind::Centered,
            "FullWidthLayout" => LayoutKind::FullWidth,
            "FlexibleLayout" => LayoutKind::Flexible,
            other => {
                if !other.is_empty() {
                    tracing::debug!("Unknown layout '{}', using ThreeColumnLayout", other);
                }
                LayoutKind::ThreeColumn
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::ThreeColumn => "ThreeColumnLayout",
            LayoutKind::TwoColumn => "TwoColumnLayout",
            LayoutKind::Centered => "CenteredLayout",
            LayoutKind::FullWidth => "FullWidthLayout",
            LayoutKind::Flexible => "FlexibleLayout",
        }
    }

    /// Zones this layout composes, in page order.
    pub fn zones(self) -> &'static [Zone] {
        match self {
            LayoutKind::ThreeColumn => &[Zone::RightSidebar],
            LayoutKind::TwoColumn => &[],
            LayoutKind::Centered | LayoutKind::FullWidth => &[Zone::Hero],
            LayoutKind::Flexible => &Zone::ALL,
        }
    }

    /// Whether the layout has the left navigation sidebar.
    pub fn has_nav_sidebar(self) -> bool {
        matches!(self, LayoutKind::ThreeColumn | LayoutKind::TwoColumn)
    }

    /// Whether the layout has the table-of-contents column.
    pub fn has_toc(self) -> bool {
        matches!(self, LayoutKind::ThreeColumn | LayoutKind::Flexible)
    }
}

/// The eight named page regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Header,
    TopNav,
    Hero,
    LeftSidebar,
    Main,
    RightSidebar,
    BottomNav,
    Footer,
}

impl Zone {
    pub const ALL: [Zone; 8] = [
        Zone::Header,
        Zone::TopNav,
        Zone::Hero,
        Zone::LeftSidebar,
        Zone::Main,
        Zone::RightSidebar,
        Zone::BottomNav,
        Zone::Footer,
    ];

    /// The zone's key in `ZonesConfig`.
    pub fn key(self) -> &'static str {
        match self {
            Zone::Header => "header",
            Zone::TopNav => "topNav",
            Zone::Hero => "hero",
            Zone::LeftSidebar => "leftSidebar",
            Zone::Main => "main",
            Zone::RightSidebar => "rightSidebar",
            Zone::BottomNav => "bottomNav",
            Zone::Footer => "footer",
        }
    }

    /// The configured widgets for this zone.
    pub fn widgets(self, zones: &ZonesConfig) -> &[WidgetConfig] {
        let widgets = match self {
            Zone::Header => &zones.header,
            Zone::TopNav => &zones.top_nav,
            Zone::Hero => &zones.hero,
            Zone::LeftSidebar => &zones.left_sidebar,
            Zone::Main => &zones.main,
            Zone::RightSidebar => &zones.right_sidebar,
            Zone::BottomNav => &zones.bottom_nav,
            Zone::Footer => &zones.footer,
        };
        widgets.as_deref().unwrap_or_default()
    }
}

/// One zone with its widgets rendered in declared order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedZone {
    pub zone: Zone,
    pub widgets: Vec<String>,
}

/// The composed page skeleton handed to the layout template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStructure {
    pub layout: LayoutKind,
    /// Non-empty zones in page order
    pub zones: Vec<ComposedZone>,
    pub nav_sidebar: bool,
    pub toc: bool,
}

impl PageStructure {
    pub fn zone(&self, zone: Zone) -> Option<&ComposedZone> {
        self.zones.iter().find(|z| z.zone == zone)
    }
}

/// Compose a page for `layout` from the template's zones.
///
/// Zones with nothing to render are omitted. `Toc` entries in the right
/// sidebar are left to the layout's table-of-contents column.
pub fn compose_zones(
    zones: Option<&ZonesConfig>,
    layout: LayoutKind,
    dispatcher: &WidgetDispatcher<'_>,
) -> PageStructure {
    let composed = match zones {
        Some(config) => layout
            .zones()
            .iter()
            .filter_map(|&zone| compose_zone(zone, zone.widgets(config), dispatcher))
            .collect(),
        None => Vec::new(),
    };

    PageStructure {
        layout,
        zones: composed,
        nav_sidebar: layout.has_nav_sidebar(),
        toc: layout.has_toc(),
    }
}

fn compose_zone(
    zone: Zone,
    widgets: &[WidgetConfig],
    dispatcher: &WidgetDispatcher<'_>,
) -> Option<ComposedZone> {
    let rendered: Vec<String> = widgets
        .iter()
        .filter(|w| !(zone == Zone::RightSidebar && w.kind == TOC_WIDGET))
        .map(|w| dispatcher.render_widget(w))
        .collect();

    if rendered.is_empty() {
        return None;
    }

    Some(ComposedZone {
        zone,
        widgets: rendered,
    })
}
