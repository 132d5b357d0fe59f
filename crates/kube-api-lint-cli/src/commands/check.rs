//! Check command implementation.

use anyhow::{Context, Result};
use kube_api_lint_core::{Analyzer, Config, RuleBox, Snapshot};
use kube_api_lint_rules::{all_rules_with, rules_from_config};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line settings of a check run.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Preset overriding the configured one.
    pub preset: Option<String>,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// Runs the check command.
pub fn run(snapshot_path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let mut config = load_config(source)?;
    if let Some(preset) = &options.preset {
        config.preset = Some(preset.clone());
    }

    let snapshot = load_snapshot(snapshot_path)?;

    let rules = match &options.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&config, &names)
        }
        None => rules_from_config(&config).context("Failed to resolve rule preset")?,
    };

    let analyzer = options
        .exclude
        .iter()
        .fold(
            Analyzer::builder().snapshot(snapshot).rules(rules).config(config),
            |builder, pattern| builder.exclude(pattern.clone()),
        )
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        snapshot_path.display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze();

    super::output::print(&result, options.format)?;

    if result.has_issues() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    } else {
        tracing::debug!("Using config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Reads a declaration snapshot from a JSON file.
fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}

/// Selects rules by name or code, keeping the registry order.
fn filter_rules(config: &Config, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        let known = kube_api_lint_rules::RULE_NAMES
            .iter()
            .any(|(code, rule)| code == name || rule == name);
        if !known {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    all_rules_with(&config.linters)
        .into_iter()
        .filter(|rule| names.contains(&rule.name()) || names.contains(&rule.code()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn filter_accepts_names_and_codes() {
        let rules = filter_rules(&Config::default(), &["KAL020", "json-tags", "bogus"]);
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["json-tags", "numeric-bounds"]);
    }

    #[test]
    fn snapshot_is_read_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{"packages": [{"path": "example.com/api/v1", "types": [], "constants": []}]}"#,
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.packages.len(), 1);
        assert_eq!(snapshot.packages[0].path, "example.com/api/v1");
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse snapshot"));
        assert!(load_snapshot(&tmp.path().join("missing.json")).is_err());
    }

    #[test]
    fn invalid_config_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kube-api-lint.toml");
        fs::write(&path, "[linters.jsontags]\njson_tag_regex = \"(\"\n").unwrap();

        let err = load_config(&ConfigSource::Project(path)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
        assert!(load_config(&ConfigSource::Default).is_ok());
    }
}
