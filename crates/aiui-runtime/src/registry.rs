//! Slot registry for externally supplied widget renderers.
//!
//! The registry is an ordinary value: build it once at application start,
//! register custom renderers, then hand out `&SlotRegistry` (or an
//! `Arc<SlotRegistry>`) to the render path. Registration needs `&mut self`,
//! so writes can't race with rendering; concurrent reads are fine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use aiui_manifest::Props;

/// Renders a widget's props to HTML.
pub trait WidgetRenderer: Send + Sync {
    fn render(&self, props: &Props) -> String;
}

impl<F> WidgetRenderer for F
where
    F: Fn(&Props) -> String + Send + Sync,
{
    fn render(&self, props: &Props) -> String {
        self(props)
    }
}

/// Mapping from widget type name to renderer.
#[derive(Default, Clone)]
pub struct SlotRegistry {
    renderers: HashMap<String, Arc<dyn WidgetRenderer>>,
}

impl SlotRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer for a type. Replaces any earlier registration.
    pub fn register<R>(&mut self, kind: impl Into<String>, renderer: R)
    where
        R: WidgetRenderer + 'static,
    {
        self.register_shared(kind, Arc::new(renderer));
    }

    /// Register an already shared renderer. Replaces any earlier registration.
    pub fn register_shared(&mut self, kind: impl Into<String>, renderer: Arc<dyn WidgetRenderer>) {
        let kind = kind.into();
        if self.renderers.insert(kind.clone(), renderer).is_some() {
            tracing::debug!("Replaced renderer for widget type '{}'", kind);
        }
    }

    /// Look up the renderer for a type.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn WidgetRenderer>> {
        self.renderers.get(kind).cloned()
    }

    /// Check if a type has a renderer.
    pub fn has(&self, kind: &str) -> bool {
        self.renderers.contains_key(kind)
    }

    /// Remove all registrations.
    pub fn clear(&mut self) {
        self.renderers.clear();
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
