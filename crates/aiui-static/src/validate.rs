//! Config validation.
//!
//! Validation collects every problem instead of stopping at the first one,
//! so `aiui validate` can report them all in one pass.

use std::fmt;
use std::path::Path;

use aiui_manifest::Config;
use aiui_runtime::Pattern;
use serde::Serialize;

/// A slot `ref` names a component that is not declared.
pub const MISSING_COMPONENT: u16 = 2001;
/// A route names a template that is not declared.
pub const MISSING_TEMPLATE: u16 = 2002;
/// A route pattern is malformed.
pub const INVALID_PATTERN: u16 = 2003;
/// The docs content directory does not exist.
pub const MISSING_DOCS_DIR: u16 = 3001;

/// Where a validation issue comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Validation,
    Scanner,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCategory::Validation => f.write_str("validation"),
            IssueCategory::Scanner => f.write_str("scanner"),
        }
    }
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub code: u16,
    pub category: IssueCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// All issues found in a config.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages, one per issue.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.message.clone()).collect()
    }
}

/// Validate a config. Relative content paths resolve against `base_dir`.
pub fn validate_config(config: &Config, base_dir: &Path) -> ValidationReport {
    let mut issues = Vec::new();

    for template in config.templates.values() {
        for slot in template.slots.values().flatten() {
            let Some(reference) = slot.reference.as_deref() else {
                continue;
            };
            if !config.components.contains_key(reference) {
                issues.push(ValidationIssue {
                    code: MISSING_COMPONENT,
                    category: IssueCategory::Validation,
                    message: format!("Component reference '{}' not found", reference),
                    suggestion: suggest(reference, config.components.keys()),
                });
            }
        }
    }

    for route in &config.routes {
        if !config.templates.contains_key(&route.template) {
            issues.push(ValidationIssue {
                code: MISSING_TEMPLATE,
                category: IssueCategory::Validation,
                message: format!(
                    "Template '{}' not found in route '{}'",
                    route.template, route.pattern
                ),
                suggestion: suggest(&route.template, config.templates.keys()),
            });
        }

        if let Err(e) = Pattern::compile(&route.pattern) {
            issues.push(ValidationIssue {
                code: INVALID_PATTERN,
                category: IssueCategory::Validation,
                message: e.to_string(),
                suggestion: None,
            });
        }
    }

    if let Some(docs) = config.docs() {
        if !base_dir.join(&docs.dir).exists() {
            issues.push(ValidationIssue {
                code: MISSING_DOCS_DIR,
                category: IssueCategory::Scanner,
                message: format!("Docs directory '{}' not found", docs.dir),
                suggestion: None,
            });
        }
    }

    ValidationReport { issues }
}

/// Suggest a candidate sharing the first three characters, case-insensitively.
fn suggest<'a>(target: &str, candidates: impl IntoIterator<Item = &'a String>) -> Option<String> {
    let prefix: String = target.to_lowercase().chars().take(3).collect();

    candidates
        .into_iter()
        .find(|c| c.to_lowercase().starts_with(&prefix))
        .map(|c| format!("Did you mean '{}'?", c))
}
