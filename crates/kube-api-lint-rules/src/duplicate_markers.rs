//! Rule reporting markers written twice on one declaration.
//!
//! Two markers are duplicates when identifier, attributes (in any order)
//! and value are all equal. The later occurrence is reported and the fix
//! removes its line.

use crate::fixes::remove_marker;
use kube_api_lint_core::{DeclContext, Diagnostic, MarkerKey, Rule, Suggestion};
use std::collections::HashSet;

/// Rule code for duplicate-markers.
pub const CODE: &str = "KAL006";

/// Rule name for duplicate-markers.
pub const NAME: &str = "duplicate-markers";

/// Reports exact duplicate markers.
#[derive(Debug, Clone, Default)]
pub struct DuplicateMarkers;

impl DuplicateMarkers {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DuplicateMarkers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "The same marker must not be written twice"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut seen: HashSet<MarkerKey> = HashSet::new();
        ctx.markers
            .iter()
            .filter(|marker| !seen.insert(marker.full_key()))
            .map(|marker| {
                Diagnostic::new(
                    CODE,
                    NAME,
                    marker.location.clone(),
                    format!("{} has duplicated marker {marker}", ctx.subject()),
                )
                .with_suggestion(Suggestion::with_fix(
                    "remove the duplicated marker",
                    remove_marker(marker),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    fn package(doc: &[&str]) -> Package {
        Package::new("p").with_type(TypeDecl::structure(
            "WidgetSpec",
            vec![FieldDecl::new("Name", TypeExpr::named("string"))
                .at("types.go", 10)
                .doc(doc)],
        ))
    }

    #[test]
    fn test_exact_duplicate_reports_later_line() {
        let diagnostics = run(
            DuplicateMarkers::new(),
            package(&[
                "// +kubebuilder:validation:MaxLength=10",
                "// +optional",
                "// +kubebuilder:validation:MaxLength=10",
            ]),
        );
        assert_eq!(
            messages(&diagnostics),
            vec!["field Name has duplicated marker kubebuilder:validation:MaxLength=10"]
        );
        assert_eq!(diagnostics[0].location.line, 9);
        assert!(diagnostics[0].has_fix());
    }

    #[test]
    fn test_different_values_are_not_duplicates() {
        let diagnostics = run(
            DuplicateMarkers::new(),
            package(&[
                "// +kubebuilder:validation:MaxLength=10",
                "// +kubebuilder:validation:MaxLength=20",
            ]),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let diagnostics = run(
            DuplicateMarkers::new(),
            package(&[
                "// +kubebuilder:validation:XValidation:rule=\"self > 0\",message=\"positive\"",
                "// +kubebuilder:validation:XValidation:message=\"positive\",rule=\"self > 0\"",
            ]),
        );
        assert_eq!(diagnostics.len(), 1);
    }
}
