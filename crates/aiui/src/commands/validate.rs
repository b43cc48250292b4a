//! Config validation command.

use std::path::Path;

use aiui_static::{validate_config, ValidationReport};
use anyhow::Result;

use super::load_config;

/// Run the validate command. Fails when any issue is found.
pub fn run(config_path: &Path) -> Result<()> {
    let (config, base_dir) = load_config(config_path)?;

    let report = validate_config(&config, &base_dir);
    print_report(&report);

    if !report.is_valid() {
        anyhow::bail!("{} issue(s) in {}", report.issues.len(), config_path.display());
    }

    tracing::info!("{} is valid", config_path.display());
    Ok(())
}

fn print_report(report: &ValidationReport) {
    for issue in &report.issues {
        tracing::error!("{}", issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reports_broken_references() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("aiui.yaml");
        fs::write(
            &config,
            "site:\n  title: Acme\nroutes:\n  - match: \"/docs/**\"\n    template: docs\n",
        )
        .unwrap();

        let err = run(&config).unwrap_err();

        assert!(err.to_string().contains("1 issue(s)"));
    }

    #[test]
    fn accepts_valid_config() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("aiui.yaml");
        fs::write(
            &config,
            "site:\n  title: Acme\ntemplates:\n  docs:\n    layout: ThreeColumnLayout\nroutes:\n  - match: \"/docs/**\"\n    template: docs\n",
        )
        .unwrap();

        run(&config).unwrap();
    }
}
