//! Show the template a path resolves to.

use std::path::PathBuf;

use aiui_manifest::ManifestLoader;
use aiui_runtime::{resolve_template, TemplateMatch};
use anyhow::{Context, Result};

/// Load compiled manifests from `dir` and print the match for `path`.
pub async fn run(path: &str, dir: PathBuf) -> Result<()> {
    let matched = resolve(path, dir).await?;

    match &matched {
        Some(m) => tracing::info!("{} -> {} ({})", path, m.template, m.layout),
        None => tracing::warn!("No route matches {}", path),
    }

    println!("{}", serde_json::to_string_pretty(&matched)?);

    Ok(())
}

async fn resolve(path: &str, dir: PathBuf) -> Result<Option<TemplateMatch>> {
    let manifests = ManifestLoader::new(&dir)
        .load()
        .await
        .with_context(|| format!("Failed to load manifests from {}. Run 'aiui build' first.", dir.display()))?;

    Ok(resolve_template(
        path,
        &manifests.routes,
        &manifests.ui.templates,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiui_manifest::Config;
    use aiui_static::Compiler;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
site:
  title: Acme
templates:
  docs:
    layout: ThreeColumnLayout
  landing:
    layout: CenteredLayout
routes:
  - match: "/"
    template: landing
  - match: "/docs/**"
    template: docs
"#;

    #[tokio::test]
    async fn resolves_against_compiled_manifests() {
        let temp = tempdir().unwrap();
        let config = Config::from_yaml(CONFIG).unwrap();
        Compiler::new(&config, temp.path())
            .compile(&temp.path().join("dist"), true)
            .unwrap();

        let dir = temp.path().join("dist");
        let docs = resolve("/docs/guide/intro", dir.clone()).await.unwrap().unwrap();
        assert_eq!(docs.template, "docs");

        let landing = resolve("/", dir.clone()).await.unwrap().unwrap();
        assert_eq!(landing.layout, "CenteredLayout");

        assert!(resolve("/blog", dir).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_manifests_fail() {
        let temp = tempdir().unwrap();
        assert!(resolve("/", temp.path().to_path_buf()).await.is_err());
    }
}
