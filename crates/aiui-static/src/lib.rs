//! Config compiler and static site generator for aiui.
//!
//! Compiles `aiui.yaml` and a docs directory into the three JSON
//! manifests, then renders every page through the resolution engine.

pub mod assets;
pub mod builder;
pub mod compiler;
pub mod nav_builder;
pub mod page;
pub mod plugins;
pub mod scanner;
pub mod slots;
pub mod templates;
pub mod validate;

pub use builder::{page_output_path, BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use compiler::{CompileError, CompileResult, Compiler};
pub use page::{read_document, PageRenderer};
pub use plugins::{Plugin, PluginError, PluginManager};
pub use scanner::{DocPage, DocsScanner};
pub use templates::TemplateEngine;
pub use validate::{validate_config, IssueCategory, ValidationIssue, ValidationReport};
