//! Rule reporting the `nullable` marker.
//!
//! Nullable fields give clients two ways to say "unset". Use an optional
//! pointer field with `omitempty` instead.

use crate::fixes::remove_marker;
use kube_api_lint_core::markers::known;
use kube_api_lint_core::{DeclContext, Diagnostic, Rule, Suggestion};

/// Rule code for no-nullable.
pub const CODE: &str = "KAL029";

/// Rule name for no-nullable.
pub const NAME: &str = "no-nullable";

/// Reports `+nullable` and `+kubebuilder:validation:Nullable`.
#[derive(Debug, Clone, Default)]
pub struct NoNullable;

impl NoNullable {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoNullable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "The nullable marker is not allowed"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        ctx.markers
            .iter()
            .filter(|m| m.identifier == known::NULLABLE || m.identifier == known::KUBEBUILDER_NULLABLE)
            .map(|marker| {
                Diagnostic::new(
                    CODE,
                    NAME,
                    marker.location.clone(),
                    format!("{} should not use the nullable marker", ctx.subject()),
                )
                .with_suggestion(Suggestion::with_fix("remove the marker", remove_marker(marker)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    #[test]
    fn test_nullable_spellings() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "WidgetSpec",
            vec![
                FieldDecl::new("Name", TypeExpr::pointer(TypeExpr::named("string")))
                    .at("types.go", 4)
                    .doc(&["// +nullable"]),
                FieldDecl::new("Host", TypeExpr::pointer(TypeExpr::named("string")))
                    .at("types.go", 6)
                    .doc(&["// +kubebuilder:validation:Nullable"]),
                FieldDecl::new("Port", TypeExpr::named("int32")).at("types.go", 7),
            ],
        ));
        let diagnostics = run(NoNullable::new(), pkg);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "field Name should not use the nullable marker",
                "field Host should not use the nullable marker",
            ]
        );
        assert!(diagnostics.iter().all(Diagnostic::has_fix));
    }
}
