//! Compile-time plugins.
//!
//! A plugin sees each stage of a compile and may rewrite what passes
//! through it: the parsed config, the scanned pages, the built navigation
//! tree and the final result. Every hook defaults to passing its input
//! through unchanged.

use std::fmt;

use aiui_manifest::{Config, NavTree};

use crate::compiler::CompileResult;
use crate::scanner::DocPage;

/// A compile pipeline extension.
pub trait Plugin: Send + Sync {
    /// Unique plugin name
    fn name(&self) -> &str;

    /// Hooks of higher-priority plugins run first.
    fn priority(&self) -> i32 {
        0
    }

    fn on_config_loaded(&self, config: Config) -> Config {
        config
    }

    fn on_scan_complete(&self, pages: Vec<DocPage>) -> Vec<DocPage> {
        pages
    }

    fn on_nav_built(&self, nav: NavTree) -> NavTree {
        nav
    }

    fn on_compile_complete(&self, result: CompileResult) -> CompileResult {
        result
    }
}

/// Errors from registering or removing plugins.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin '{0}' already registered")]
    AlreadyRegistered(String),

    #[error("Plugin '{0}' not found")]
    NotFound(String),
}

/// Registered plugins, in hook order.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    pub const fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Add a plugin. Names must be unique.
    pub fn register(&mut self, plugin: impl Plugin + 'static) -> Result<(), PluginError> {
        let name = plugin.name().to_string();
        if self.get(&name).is_some() {
            return Err(PluginError::AlreadyRegistered(name));
        }

        // Stable, so equal priorities keep registration order.
        let at = self
            .plugins
            .iter()
            .position(|p| p.priority() < plugin.priority())
            .unwrap_or(self.plugins.len());
        self.plugins.insert(at, Box::new(plugin));

        tracing::debug!("Registered plugin '{}'", name);
        Ok(())
    }

    /// Remove a plugin by name, handing it back.
    pub fn unregister(&mut self, name: &str) -> Result<Box<dyn Plugin>, PluginError> {
        let index = self
            .plugins
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| PluginError::NotFound(name.to_string()))?;

        Ok(self.plugins.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| &**p)
    }

    /// Plugin names in hook order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn config_loaded(&self, config: Config) -> Config {
        self.plugins
            .iter()
            .fold(config, |config, p| p.on_config_loaded(config))
    }

    pub fn scan_complete(&self, pages: Vec<DocPage>) -> Vec<DocPage> {
        self.plugins
            .iter()
            .fold(pages, |pages, p| p.on_scan_complete(pages))
    }

    pub fn nav_built(&self, nav: NavTree) -> NavTree {
        self.plugins.iter().fold(nav, |nav, p| p.on_nav_built(nav))
    }

    pub fn compile_complete(&self, result: CompileResult) -> CompileResult {
        self.plugins
            .iter()
            .fold(result, |result, p| p.on_compile_complete(result))
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
