//! Stylesheet and runtime script for generated sites.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The site stylesheet.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// The site runtime script.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// The stylesheet, minified when asked. Minifier errors leave it
    /// unminified.
    pub fn stylesheet(minify: bool) -> String {
        let css = Self::generate_css();
        if !minify {
            return css;
        }
        match Self::minify_css(&css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("{}", e);
                css
            }
        }
    }
}

// Theme tokens follow the shadcn variable names. `data-theme` picks the
// accent, `data-radius` the corner radius, `.dark` the dark palette.
const DEFAULT_CSS: &str = r#"/* aiui site theme */

:root {
  --background: #ffffff;
  --foreground: #09090b;
  --card: #ffffff;
  --card-foreground: #09090b;
  --primary: #18181b;
  --primary-foreground: #fafafa;
  --muted: #f4f4f5;
  --muted-foreground: #71717a;
  --accent: #f4f4f5;
  --accent-foreground: #18181b;
  --border: #e4e4e7;
  --destructive: #dc2626;
  --radius: 0.5rem;
  --sidebar-width: 260px;
  --toc-width: 240px;
  --content-max-width: 820px;
}

.dark {
  --background: #09090b;
  --foreground: #fafafa;
  --card: #111113;
  --card-foreground: #fafafa;
  --primary: #fafafa;
  --primary-foreground: #18181b;
  --muted: #27272a;
  --muted-foreground: #a1a1aa;
  --accent: #27272a;
  --accent-foreground: #fafafa;
  --border: #27272a;
  --destructive: #ef4444;
}

[data-theme="blue"] { --primary: #2563eb; --primary-foreground: #eff6ff; }
[data-theme="green"] { --primary: #16a34a; --primary-foreground: #f0fdf4; }
[data-theme="orange"] { --primary: #ea580c; --primary-foreground: #fff7ed; }
[data-theme="red"] { --primary: #dc2626; --primary-foreground: #fef2f2; }
[data-theme="rose"] { --primary: #e11d48; --primary-foreground: #fff1f2; }
[data-theme="violet"] { --primary: #7c3aed; --primary-foreground: #f5f3ff; }
[data-theme="indigo"] { --primary: #4f46e5; --primary-foreground: #eef2ff; }
[data-theme="teal"] { --primary: #0d9488; --primary-foreground: #f0fdfa; }

[data-radius="none"] { --radius: 0; }
[data-radius="sm"] { --radius: 0.3rem; }
[data-radius="md"] { --radius: 0.5rem; }
[data-radius="lg"] { --radius: 0.75rem; }
[data-radius="xl"] { --radius: 1rem; }

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
  min-height: 100vh;
}

a {
  color: inherit;
}

/* Header and footer */
.skip-link {
  position: absolute;
  left: -999px;
  top: 0.5rem;
  z-index: 100;
  padding: 0.5rem 1rem;
  background: var(--primary);
  color: var(--primary-foreground);
}

.skip-link:focus {
  left: 0.5rem;
}

.focus-visible :focus-visible {
  outline: 2px solid var(--primary);
  outline-offset: 2px;
}

.reduce-motion *,
.reduce-motion *::before,
.reduce-motion *::after {
  transition: none !important;
  animation: none !important;
  scroll-behavior: auto !important;
}

.site-header {
  position: sticky;
  top: 0;
  z-index: 50;
  display: flex;
  align-items: center;
  gap: 1.5rem;
  height: 3.5rem;
  padding: 0 1.5rem;
  border-bottom: 1px solid var(--border);
  background: var(--background);
}

.site-title {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  font-weight: 600;
  font-size: 1.125rem;
  text-decoration: none;
}

.site-title img {
  height: 1.75rem;
}

.header-nav {
  display: flex;
  gap: 1rem;
  flex: 1;
}

.header-nav a {
  color: var(--muted-foreground);
  text-decoration: none;
  font-size: 0.875rem;
}

.header-nav a:hover {
  color: var(--foreground);
}

.site-footer {
  display: flex;
  justify-content: space-between;
  gap: 1rem;
  padding: 2rem 1.5rem;
  border-top: 1px solid var(--border);
  color: var(--muted-foreground);
  font-size: 0.875rem;
}

.footer-links {
  display: flex;
  gap: 1rem;
}

/* Layouts */
.layout-three-column {
  display: grid;
  grid-template-columns: var(--sidebar-width) minmax(0, 1fr) var(--toc-width);
}

.layout-two-column {
  display: grid;
  grid-template-columns: var(--sidebar-width) minmax(0, 1fr);
}

.layout-centered .centered {
  max-width: 56rem;
  margin: 0 auto;
}

.layout-full-width .main {
  max-width: none;
}

.flexible-body {
  display: flex;
}

.flexible-body .main {
  flex: 1;
}

.main {
  padding: 2rem 1.5rem;
  max-width: var(--content-max-width);
  width: 100%;
}

/* Navigation */
.sidebar {
  position: sticky;
  top: 3.5rem;
  height: calc(100vh - 3.5rem);
  overflow-y: auto;
  padding: 1.5rem 1rem;
  border-right: 1px solid var(--border);
}

.nav-list,
.nav-children {
  list-style: none;
}

.nav-children {
  margin-left: 0.75rem;
  padding-left: 0.5rem;
  border-left: 1px solid var(--border);
}

.nav-group {
  display: block;
  margin-top: 1rem;
  padding: 0.25rem 0.5rem;
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
}

.nav-item a {
  display: block;
  padding: 0.375rem 0.5rem;
  border-radius: var(--radius);
  color: var(--muted-foreground);
  text-decoration: none;
  font-size: 0.875rem;
}

.nav-item a:hover {
  background: var(--accent);
  color: var(--accent-foreground);
}

.nav-item.active > a {
  background: var(--primary);
  color: var(--primary-foreground);
}

/* Table of contents */
.toc {
  position: sticky;
  top: 3.5rem;
  align-self: start;
  padding: 1.5rem 1rem;
  border-left: 1px solid var(--border);
}

.toc h4 {
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.1em;
  color: var(--muted-foreground);
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
  margin-bottom: 1rem;
}

.toc a {
  font-size: 0.875rem;
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc a:hover {
  color: var(--foreground);
}

.toc-level-3 {
  padding-left: 0.75rem;
}

.toc-level-4 {
  padding-left: 1.5rem;
}

/* Zones and widgets */
.zone {
  display: flex;
  flex-direction: column;
  gap: 1rem;
  padding: 1rem 0;
}

.zone-bottomNav,
.zone-topNav {
  flex-direction: row;
  padding: 1rem 1.5rem;
  border-top: 1px solid var(--border);
}

.card {
  padding: 1rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--card);
  color: var(--card-foreground);
}

.card-title {
  font-weight: 600;
}

.card-description {
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

.stat-value {
  font-size: 1.5rem;
}

.stat-positive {
  color: #16a34a;
}

.stat-negative {
  color: var(--destructive);
}

.widget-quick-links ul {
  list-style: none;
  margin-top: 0.5rem;
}

.newsletter-form {
  display: flex;
  gap: 0.5rem;
  margin-top: 0.75rem;
}

.newsletter-form input {
  flex: 1;
  padding: 0.375rem 0.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--background);
  color: var(--foreground);
}

.widget-social-links {
  display: flex;
  gap: 1rem;
}

.widget-hero-banner {
  padding: 4rem 1.5rem;
  text-align: center;
}

.widget-hero-banner h1 {
  font-size: 3rem;
  font-weight: 700;
  letter-spacing: -0.02em;
}

.hero-subtitle {
  margin: 1rem 0 2rem;
  font-size: 1.25rem;
  color: var(--muted-foreground);
}

.widget-unknown {
  padding: 1rem;
  border: 1px dashed var(--border);
  border-radius: var(--radius);
  color: var(--muted-foreground);
  font-size: 0.875rem;
}

.button {
  display: inline-block;
  padding: 0.5rem 1rem;
  border: none;
  border-radius: var(--radius);
  background: var(--primary);
  color: var(--primary-foreground);
  text-decoration: none;
  font-weight: 500;
  cursor: pointer;
}

.button-lg {
  padding: 0.75rem 1.5rem;
  font-size: 1.125rem;
}

/* Document content */
.doc h1 {
  font-size: 2.25rem;
  font-weight: 700;
  margin-bottom: 1rem;
}

.doc h2 {
  font-size: 1.5rem;
  font-weight: 600;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.doc h3 {
  font-size: 1.25rem;
  font-weight: 600;
  margin: 1.5rem 0 0.75rem;
}

.doc p,
.doc ul,
.doc ol,
.doc table {
  margin-bottom: 1rem;
}

.doc ul,
.doc ol {
  padding-left: 1.5rem;
}

.doc a {
  color: var(--primary);
  text-underline-offset: 4px;
}

.doc .lead {
  font-size: 1.25rem;
  color: var(--muted-foreground);
}

.doc pre {
  position: relative;
  padding: 1rem;
  margin-bottom: 1rem;
  overflow-x: auto;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--card);
  font-size: 0.875rem;
}

.doc code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
  background: var(--muted);
}

.doc pre code {
  padding: 0;
  background: none;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  border: none;
  border-radius: var(--radius);
  background: var(--muted);
  color: var(--foreground);
  cursor: pointer;
}

/* Load error */
.load-error {
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: center;
  gap: 1rem;
  min-height: 100vh;
}

.load-error h2 {
  color: var(--destructive);
}

.load-error p {
  color: var(--muted-foreground);
}

.menu-btn {
  display: none;
  margin-left: auto;
  padding: 0.25rem 0.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: none;
  color: var(--foreground);
  cursor: pointer;
}

@media (max-width: 1024px) {
  .layout-three-column,
  .layout-two-column {
    grid-template-columns: minmax(0, 1fr);
  }

  .toc {
    display: none;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    z-index: 40;
    width: var(--sidebar-width);
    background: var(--background);
    transition: left 0.3s;
  }

  .sidebar.open {
    left: 0;
  }

  .menu-btn {
    display: block;
  }
}
"#;

const DEFAULT_JS: &str = r#"// aiui site runtime
(function() {
  'use strict';

  const toggle = document.querySelector('.menu-btn');
  const nav = document.querySelector('.sidebar');
  if (toggle && nav) {
    toggle.addEventListener('click', () => nav.classList.toggle('open'));
    nav.addEventListener('click', event => {
      if (event.target.closest('a')) nav.classList.remove('open');
    });
  }

  // Keep the active nav item in view
  const active = document.querySelector('.nav-item.active');
  if (active && active.scrollIntoView) {
    active.scrollIntoView({ block: 'nearest' });
  }

  function addCopyButton(block) {
    if (block.dataset.copyable) return;
    block.dataset.copyable = 'true';

    const button = document.createElement('button');
    button.type = 'button';
    button.className = 'copy-btn';
    button.textContent = 'Copy';
    button.addEventListener('click', () => {
      const source = block.querySelector('code') || block;
      navigator.clipboard.writeText(source.textContent || '')
        .then(() => { button.textContent = 'Copied'; })
        .catch(() => { button.textContent = 'Failed'; })
        .finally(() => setTimeout(() => { button.textContent = 'Copy'; }, 1500));
    });
    block.appendChild(button);
  }

  document.querySelectorAll('article.doc pre').forEach(addCopyButton);
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_carries_theme_hooks() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(".dark"));
        assert!(css.contains("[data-radius=\"lg\"]"));
        assert!(css.contains(".widget-unknown"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("addEventListener"));
        assert!(js.contains("clipboard"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.zone {
    display: flex;
    gap: 1rem;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".zone"));
    }

    #[test]
    fn stylesheet_minifies_on_request() {
        let full = AssetPipeline::stylesheet(false);
        let small = AssetPipeline::stylesheet(true);
        assert!(small.len() < full.len());
    }
}
