//! Rule reporting markers from mutually exclusive groups.
//!
//! # Configuration
//!
//! ```toml
//! [[linters.conflictingmarkers.conflicts]]
//! name = "non_nullable_optional"
//! sets = [["optional"], ["kubebuilder:validation:MinLength"]]
//! description = "An optional field cannot require a minimum length"
//! ```
//!
//! A declaration conflicts when markers of two or more sets are present.
//! The diagnostic lists every populated set, in configured order, and
//! labels each conflicting marker.

use crate::fixes::marker_label;
use kube_api_lint_core::linters::ConflictSet;
use kube_api_lint_core::{DeclContext, Diagnostic, Label, Marker, Rule};

/// Rule code for conflicting-markers.
pub const CODE: &str = "KAL003";

/// Rule name for conflicting-markers.
pub const NAME: &str = "conflicting-markers";

/// Reports declarations carrying markers of several conflicting sets.
#[derive(Debug, Clone, Default)]
pub struct ConflictingMarkers {
    /// Configured conflict sets.
    pub conflicts: Vec<ConflictSet>,
}

impl ConflictingMarkers {
    /// Creates a rule with no conflict sets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conflict sets.
    #[must_use]
    pub fn conflicts(mut self, conflicts: Vec<ConflictSet>) -> Self {
        self.conflicts = conflicts;
        self
    }
}

impl Rule for ConflictingMarkers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Markers from mutually exclusive sets must not be combined"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        self.conflicts
            .iter()
            .filter_map(|conflict| report(CODE, NAME, ctx, conflict))
            .collect()
    }
}

/// One diagnostic for a conflict set, when at least two sets are present.
pub(crate) fn report(
    code: &str,
    name: &str,
    ctx: &DeclContext<'_, '_>,
    conflict: &ConflictSet,
) -> Option<Diagnostic> {
    let groups = conflict.evaluate(ctx.markers)?;
    let rendered: Vec<String> = groups.iter().map(|group| render_group(group)).collect();
    let mut message = format!(
        "{} has conflicting markers: {}: {{{}}}",
        ctx.subject(),
        conflict.name(),
        rendered.join(", ")
    );
    if !conflict.description().is_empty() {
        message.push_str(". ");
        message.push_str(conflict.description());
    }
    let diagnostic = Diagnostic::new(code, name, ctx.location(), message);
    Some(groups.iter().flatten().fold(diagnostic, |d, marker| {
        d.with_label(Label::new(
            marker.location.clone(),
            format!("{} set here", marker_label(marker)),
        ))
    }))
}

fn render_group(group: &[&Marker]) -> String {
    let mut labels: Vec<String> = Vec::new();
    for marker in group {
        let label = marker_label(marker);
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    format!("[{}]", labels.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, MarkerPattern, Package, TypeDecl, TypeExpr};

    fn patterns(ids: &[&str]) -> Vec<MarkerPattern> {
        ids.iter().map(|id| MarkerPattern::parse(id)).collect()
    }

    fn three_way() -> ConflictSet {
        ConflictSet::new(
            "fruit",
            vec![
                patterns(&["custom:Apple"]),
                patterns(&["custom:Orange", "custom:Tangerine"]),
                patterns(&["custom:Banana"]),
            ],
            "Pick one fruit",
        )
        .unwrap()
    }

    fn package(doc: &[&str]) -> Package {
        Package::new("p").with_type(TypeDecl::structure(
            "Basket",
            vec![FieldDecl::new("Fruit", TypeExpr::named("string"))
                .at("types.go", 10)
                .doc(doc)],
        ))
    }

    #[test]
    fn test_single_group_is_fine() {
        let rule = ConflictingMarkers::new().conflicts(vec![three_way()]);
        let diagnostics = run(rule, package(&["// +custom:Orange", "// +custom:Tangerine"]));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_groups_in_configured_order() {
        let rule = ConflictingMarkers::new().conflicts(vec![three_way()]);
        let diagnostics = run(
            rule,
            package(&["// +custom:Banana", "// +custom:Tangerine", "// +custom:Apple"]),
        );
        assert_eq!(
            messages(&diagnostics),
            vec!["field Fruit has conflicting markers: fruit: {[custom:Apple], [custom:Tangerine], [custom:Banana]}. Pick one fruit"]
        );
    }

    #[test]
    fn test_attribute_values_are_distinct_identities() {
        let conflict = ConflictSet::new(
            "colors",
            vec![
                patterns(&["custom:OtherMarker:attribute=apple"]),
                patterns(&["custom:OtherMarker:attribute=orange"]),
            ],
            "",
        )
        .unwrap();
        let rule = ConflictingMarkers::new().conflicts(vec![conflict.clone()]);
        let same = run(
            rule.clone(),
            package(&["// +custom:OtherMarker:attribute=apple"]),
        );
        assert!(same.is_empty());

        let both = run(
            rule,
            package(&[
                "// +custom:OtherMarker:attribute=apple",
                "// +custom:OtherMarker:attribute=orange",
            ]),
        );
        assert_eq!(
            messages(&both),
            vec!["field Fruit has conflicting markers: colors: {[custom:OtherMarker:attribute=apple], [custom:OtherMarker:attribute=orange]}"]
        );
    }

    #[test]
    fn test_labels_point_at_each_marker() {
        let rule = ConflictingMarkers::new().conflicts(vec![three_way()]);
        let diagnostics = run(rule, package(&["// +custom:Banana", "// +custom:Apple"]));
        let labels: Vec<(usize, &str)> = diagnostics[0]
            .labels
            .iter()
            .map(|l| (l.location.line, l.message.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![(9, "custom:Apple set here"), (8, "custom:Banana set here")]
        );
    }

    #[test]
    fn test_one_diagnostic_per_conflict() {
        let rule = ConflictingMarkers::new().conflicts(vec![three_way(), three_way()]);
        let diagnostics = run(rule, package(&["// +custom:Apple", "// +custom:Banana"]));
        assert_eq!(diagnostics.len(), 2);
    }
}
