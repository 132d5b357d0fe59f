//! List rules command implementation.

use kube_api_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    for (name, preset, note) in [
        ("recommended", Preset::Recommended, " (default)"),
        ("strict", Preset::Strict, ""),
        ("minimal", Preset::Minimal, ""),
    ] {
        println!("  {:<12} - {} rules{note}", name, preset.rules().len());
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  kube-api-lint check --rules optional-or-required,json-tags snapshot.json");
    println!("  kube-api-lint check --rules KAL020,KAL021 snapshot.json");
}
