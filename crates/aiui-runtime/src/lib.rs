//! Resolution and composition engine for aiui sites.
//!
//! Given the compiled manifests, this crate decides which template applies
//! to a path, which renderer draws each widget, and how a layout's zones
//! are assembled into a page.

pub mod nav;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod widgets;
pub mod zones;

pub use nav::{find_by_path, linked_items};
pub use pattern::{matches, Pattern, PatternError};
pub use registry::{SlotRegistry, WidgetRenderer};
pub use resolver::{resolve_template, Resolver, TemplateMatch};
pub use selection::{ContentSelection, Ticket};
pub use widgets::{placeholder, BuiltinWidget, WidgetDispatcher};
pub use zones::{compose_zones, ComposedZone, LayoutKind, PageStructure, Zone, TOC_WIDGET};
