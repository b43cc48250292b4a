//! Path-to-template resolution.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use aiui_manifest::{RouteEntry, RouteManifest, SlotMap, TemplateConfig};
use serde::Serialize;

use crate::pattern::Pattern;

/// The template assignment selected for a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMatch {
    /// Template name
    pub template: String,

    /// Layout identifier from the template
    pub layout: String,

    /// Base slot assignment from the template
    pub slots: SlotMap,

    /// Route-level overrides (may be empty)
    pub slot_overrides: SlotMap,
}

impl TemplateMatch {
    /// Template slots with route overrides applied per key.
    pub fn merged_slots(&self) -> SlotMap {
        let mut merged = self.slots.clone();
        for (name, slot) in &self.slot_overrides {
            merged.insert(name.clone(), slot.clone());
        }
        merged
    }
}

/// A route with its compiled pattern.
#[derive(Debug)]
struct CompiledRoute<'a> {
    entry: &'a RouteEntry,
    pattern: Pattern,
}

/// Priority-ordered, pre-compiled view of a route manifest.
///
/// Routes are ordered by descending priority. Routes with equal priority
/// keep their declaration order, so the first declared route wins a tie.
/// Routes whose pattern is malformed are skipped with a warning and never
/// match; the rest of the manifest still resolves.
#[derive(Debug)]
pub struct Resolver<'a> {
    routes: Vec<CompiledRoute<'a>>,
}

impl<'a> Resolver<'a> {
    pub fn new(manifest: &'a RouteManifest) -> Self {
        let mut indexed: Vec<(usize, &RouteEntry)> = manifest.routes.iter().enumerate().collect();

        // Declaration index is part of the key, so tie-breaking does not
        // depend on sort stability.
        indexed.sort_by_key(|(index, route)| (Reverse(route.priority), *index));

        let routes = indexed
            .into_iter()
            .filter_map(|(_, entry)| match Pattern::compile(&entry.pattern) {
                Ok(pattern) => Some(CompiledRoute { entry, pattern }),
                Err(e) => {
                    tracing::warn!("Skipping route to template '{}': {}", entry.template, e);
                    None
                }
            })
            .collect();

        Self { routes }
    }

    /// Resolve the template for a path.
    ///
    /// Returns `None` when no route matches, or when the winning route
    /// names a template missing from `templates`.
    pub fn resolve(
        &self,
        path: &str,
        templates: &BTreeMap<String, TemplateConfig>,
    ) -> Option<TemplateMatch> {
        let route = self.routes.iter().find(|r| r.pattern.is_match(path))?;
        let entry = route.entry;

        let Some(template) = templates.get(&entry.template) else {
            tracing::warn!(
                "Template '{}' not found (route '{}', path '{}')",
                entry.template,
                entry.pattern,
                path
            );
            return None;
        };

        tracing::debug!(
            "Resolved '{}' to template '{}' via '{}'",
            path,
            entry.template,
            entry.pattern
        );

        Some(TemplateMatch {
            template: entry.template.clone(),
            layout: template.layout.clone(),
            slots: template.slots.clone(),
            slot_overrides: entry.slot_overrides.clone().unwrap_or_default(),
        })
    }

    /// Number of usable (well-formed) routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Resolve the template for a path in one call.
pub fn resolve_template(
    path: &str,
    manifest: &RouteManifest,
    templates: &BTreeMap<String, TemplateConfig>,
) -> Option<TemplateMatch> {
    Resolver::new(manifest).resolve(path, templates)
}
