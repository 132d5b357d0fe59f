//! Rule reporting markers whose companions are missing.
//!
//! # Configuration
//!
//! ```toml
//! [[linters.dependentmarkers.rules]]
//! identifier = "k8s:unionMember"
//! requires = ["optional", "k8s:optional"]
//! ```
//!
//! The trigger needs at least one of the listed markers.

use kube_api_lint_core::linters::Dependency;
use kube_api_lint_core::{DeclContext, Diagnostic, Rule};

/// Rule code for dependent-markers.
pub const CODE: &str = "KAL005";

/// Rule name for dependent-markers.
pub const NAME: &str = "dependent-markers";

/// Reports markers present without any of the markers they depend on.
#[derive(Debug, Clone, Default)]
pub struct DependentMarkers {
    /// Configured dependencies.
    pub dependencies: Vec<Dependency>,
}

impl DependentMarkers {
    /// Creates a rule with no dependencies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dependencies.
    #[must_use]
    pub fn dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

impl Rule for DependentMarkers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Markers that need a companion marker must have one"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        self.dependencies
            .iter()
            .filter(|dependency| dependency.evaluate(ctx.markers).is_some())
            .map(|dependency| {
                let missing: Vec<String> =
                    dependency.requires().iter().map(ToString::to_string).collect();
                Diagnostic::new(
                    CODE,
                    NAME,
                    ctx.location(),
                    format!(
                        "{} with marker {} is missing required marker(s): {}",
                        ctx.subject(),
                        dependency.trigger(),
                        missing.join(" or ")
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, MarkerPattern, Package, TypeDecl, TypeExpr};

    fn rule() -> DependentMarkers {
        let dependency = Dependency::new(
            MarkerPattern::parse("k8s:unionMember"),
            vec![MarkerPattern::parse("optional"), MarkerPattern::parse("k8s:optional")],
        )
        .unwrap();
        DependentMarkers::new().dependencies(vec![dependency])
    }

    fn package(doc: &[&str]) -> Package {
        Package::new("p").with_type(TypeDecl::structure(
            "Source",
            vec![FieldDecl::new("Git", TypeExpr::pointer(TypeExpr::named("GitSource")))
                .at("types.go", 12)
                .doc(doc)],
        ))
    }

    #[test]
    fn test_missing_dependency_lists_alternatives_in_order() {
        let diagnostics = run(rule(), package(&["// +k8s:unionMember"]));
        assert_eq!(
            messages(&diagnostics),
            vec!["field Git with marker k8s:unionMember is missing required marker(s): optional or k8s:optional"]
        );
    }

    #[test]
    fn test_any_alternative_satisfies() {
        assert!(run(rule(), package(&["// +k8s:unionMember", "// +k8s:optional"])).is_empty());
    }

    #[test]
    fn test_no_trigger_no_diagnostic() {
        assert!(run(rule(), package(&["// +optional"])).is_empty());
    }
}
