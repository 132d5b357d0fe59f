//! Core analyzer for orchestrating lint execution.

use crate::catalog::MarkerCatalog;
use crate::config::Config;
use crate::context::{DeclContext, PackageContext};
use crate::emit::sort_diagnostics;
use crate::rule::{Rule, RuleBox};
use crate::source::{Declaration, Package, Snapshot};
use crate::types::{Diagnostic, LintResult};

use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while setting up an analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    packages: Vec<Package>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    catalog: Option<MarkerCatalog>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package to analyze.
    #[must_use]
    pub fn package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    /// Adds several packages to analyze.
    #[must_use]
    pub fn packages<I>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = Package>,
    {
        self.packages.extend(packages);
        self
    }

    /// Adds every package of a snapshot.
    #[must_use]
    pub fn snapshot(self, snapshot: Snapshot) -> Self {
        self.packages(snapshot.packages)
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern over declaration file paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the built-in marker catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: MarkerCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let excludes = self
            .exclude_patterns
            .iter()
            .chain(&config.analyzer.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = config
            .linters
            .attribute_markers()
            .iter()
            .fold(
                self.catalog.unwrap_or_else(MarkerCatalog::builtin),
                |catalog, id| catalog.with_attribute_marker(id),
            );

        Ok(Analyzer {
            packages: self.packages,
            rules: self.rules,
            excludes,
            config,
            catalog,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    packages: Vec<Package>,
    rules: Vec<RuleBox>,
    excludes: Vec<glob::Pattern>,
    config: Config,
    catalog: MarkerCatalog,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The marker catalog in effect.
    #[must_use]
    pub fn catalog(&self) -> &MarkerCatalog {
        &self.catalog
    }

    /// Analyzes every package and returns the sorted diagnostics.
    #[must_use]
    pub fn analyze(&self) -> LintResult {
        info!(
            "Starting analysis of {} packages with {} rules",
            self.packages.len(),
            self.rules.len()
        );

        let rules: Vec<&dyn Rule> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .map(AsRef::as_ref)
            .collect();

        let mut result = LintResult::new();
        for package in &self.packages {
            result.extend(self.analyze_package(package, &rules));
        }
        sort_diagnostics(&mut result.diagnostics);

        info!(
            "Analysis complete: {} diagnostics in {} declarations",
            result.diagnostics.len(),
            result.declarations_checked
        );

        result
    }

    fn analyze_package(&self, package: &Package, rules: &[&dyn Rule]) -> LintResult {
        debug!("Analyzing package: {}", package.path);

        let ctx = PackageContext::new(package, &self.catalog);
        let declarations: Vec<Declaration<'_>> = ctx
            .declarations()
            .iter()
            .copied()
            .filter(|decl| !self.should_exclude(&decl.location().file))
            .collect();

        let check = |decl: &Declaration<'_>| -> Vec<Diagnostic> {
            let decl_ctx = DeclContext::new(&ctx, *decl);
            rules
                .iter()
                .filter(|rule| rule.applies_to(decl.kind()))
                .flat_map(|rule| rule.check(&decl_ctx))
                .collect()
        };

        let diagnostics: Vec<Diagnostic> = if self.config.analyzer.parallel {
            declarations.par_iter().flat_map_iter(check).collect()
        } else {
            declarations.iter().flat_map(check).collect()
        };

        LintResult {
            diagnostics,
            declarations_checked: declarations.len(),
            packages_checked: 1,
        }
    }

    /// Checks if a declaration file should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let excluded = self.excludes.iter().any(|p| p.matches_path(path));
        if excluded {
            debug!("Excluding: {}", path.display());
        }
        excluded
    }
}
