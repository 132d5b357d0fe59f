//! Helpers for rule unit tests.

use kube_api_lint_core::{Analyzer, Config, Diagnostic, Package, Rule};

/// Runs one rule over one package with default settings.
pub(crate) fn run(rule: impl Rule + 'static, package: Package) -> Vec<Diagnostic> {
    run_with(rule, package, Config::default())
}

/// Runs one rule over one package, sequentially.
pub(crate) fn run_with(rule: impl Rule + 'static, package: Package, mut config: Config) -> Vec<Diagnostic> {
    config.analyzer.parallel = false;
    Analyzer::builder()
        .package(package)
        .rule(rule)
        .config(config)
        .build()
        .expect("analyzer should build")
        .analyze()
        .diagnostics
}

/// The messages of a diagnostic list, in order.
pub(crate) fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}
