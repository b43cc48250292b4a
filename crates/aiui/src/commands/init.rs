//! Scaffold a site config and sample docs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing aiui...");

    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    let docs_dir = root.join("docs");
    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG),
        (docs_dir.join("index.md"), DEFAULT_INDEX),
        (docs_dir.join("getting-started.md"), DEFAULT_GETTING_STARTED),
        (docs_dir.join("guide").join("01-routes.md"), DEFAULT_ROUTES),
        (docs_dir.join("guide").join("02-zones.md"), DEFAULT_ZONES),
    ];

    for (path, contents) in files {
        write_file(&path, contents, yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'aiui dev' to start the development server.");

    Ok(())
}

fn write_file(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# aiui site configuration
schemaVersion: 1

site:
  title: My Documentation
  description: Documentation built with aiui
  routeBaseDocs: /docs
  theme:
    preset: zinc
    radius: md
    darkMode: true

content:
  docs:
    dir: docs
    include: ["**/*.md", "**/*.mdx"]

components:
  header:
    type: Header
    props:
      logoText: My Documentation
      links:
        - { label: Docs, href: /docs }
        - { label: GitHub, href: "https://github.com", external: true }
  footer:
    type: Footer
    props:
      text: Built with aiui

templates:
  landing:
    layout: CenteredLayout
    slots:
      header: { ref: header }
      footer: { ref: footer }
    zones:
      hero:
        - type: HeroBanner
          props:
            title: My Documentation
            subtitle: Everything you need to get started
            ctaLabel: Read the docs
            ctaHref: /docs/getting-started
  docs:
    layout: ThreeColumnLayout
    slots:
      header: { ref: header }
      sidebar: { type: DocsSidebar }
      toc: { type: Toc }
      footer: { ref: footer }
    zones:
      rightSidebar:
        - type: QuickLinks
          props:
            links:
              - { label: Getting Started, href: /docs/getting-started }

routes:
  - match: "/"
    template: landing
  - match: "/docs/**"
    template: docs

seo:
  titleTemplate: "%s"
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
description: Start here
---

# Welcome

This site is generated from `aiui.yaml` and the Markdown files in `docs/`.

See [Getting Started](/docs/getting-started) for the basics.
"#;

const DEFAULT_GETTING_STARTED: &str = r#"---
title: Getting Started
order: 1
---

# Getting Started

## Development

```bash
aiui dev
```

## Building

```bash
aiui build --output dist
```

## Checking your config

```bash
aiui validate
aiui resolve /docs/getting-started --dir dist
```
"#;

const DEFAULT_ROUTES: &str = r#"# Routes

Routes map URL patterns to templates. The first matching route wins.

- `*` matches one path segment
- `**` matches any number of segments

## Slot overrides

A route can replace individual template slots, or set one to `null` to
leave it empty.
"#;

const DEFAULT_ZONES: &str = r#"# Zones

Each layout exposes named zones. Widgets listed under a zone are rendered
in order; zones the layout does not have are ignored.

| Layout | Zones |
|---|---|
| ThreeColumnLayout | rightSidebar |
| CenteredLayout | hero |
| FlexibleLayout | all |
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use aiui_manifest::Config;
    use aiui_static::validate_config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn scaffolds_a_valid_site() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("aiui.yaml");

        run(&config_path, false).await.unwrap();

        assert!(temp.path().join("docs/guide/01-routes.md").exists());
        let config = Config::load(&config_path).unwrap();
        assert!(validate_config(&config, temp.path()).is_valid());
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("aiui.yaml");
        fs::write(&config_path, "site:\n  title: Mine\n").unwrap();

        run(&config_path, false).await.unwrap();

        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "site:\n  title: Mine\n"
        );
        assert!(!temp.path().join("docs").exists());

        run(&config_path, true).await.unwrap();
        assert!(fs::read_to_string(&config_path)
            .unwrap()
            .contains("My Documentation"));
    }
}
