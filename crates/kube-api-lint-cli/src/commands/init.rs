//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# kube-api-lint configuration

# recommended | strict | minimal
preset = "recommended"

[analyzer]
# Glob patterns over declaration file paths to exclude from analysis
exclude = [
    "**/zz_generated*",
]
parallel = true

# Rules can be switched on or off individually
# [rules.no-bools]
# enabled = true

[linters.optionalorrequired]
preferred_optional_marker = "optional"
preferred_required_marker = "required"

[linters.optionalfields]
pointers = { preference = "WhenRequired", policy = "SuggestFix" }
omitempty = { policy = "SuggestFix" }
omitzero = { policy = "SuggestFix" }

[linters.numericbounds]
min = -9007199254740991
max = 9007199254740991

# [[linters.conflictingmarkers.conflicts]]
# name = "mutually_exclusive_validation"
# sets = [["custom:SomeMarker"], ["custom:OtherMarker"]]
# description = "SomeMarker and OtherMarker cannot be combined"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("kube-api-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created kube-api-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit kube-api-lint.toml to configure rules");
    println!("  2. Run: kube-api-lint check <snapshot.json>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube_api_lint_core::Config;

    #[test]
    fn generated_config_is_valid() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.analyzer.exclude, vec!["**/zz_generated*"]);
        let rules = kube_api_lint_rules::rules_from_config(&config).unwrap();
        assert_eq!(rules.len(), kube_api_lint_rules::recommended_rules().len());
    }
}
