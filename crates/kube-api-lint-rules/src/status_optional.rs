//! Rule requiring every member of a status struct to be optional.
//!
//! Status is written by controllers, often piece by piece. A required
//! status member makes the very first status update fail validation.

use crate::fixes::insert_markers;
use kube_api_lint_core::linters::OptionalOrRequiredConfig;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule, Suggestion};

/// Rule code for status-optional.
pub const CODE: &str = "KAL025";

/// Rule name for status-optional.
pub const NAME: &str = "status-optional";

/// Requires `+optional` on the direct members of `*Status` structs.
#[derive(Debug, Clone, Default)]
pub struct StatusOptional {
    /// Spelling inserted by the fix.
    pub config: OptionalOrRequiredConfig,
}

impl StatusOptional {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spelling inserted by the fix.
    #[must_use]
    pub fn config(mut self, config: OptionalOrRequiredConfig) -> Self {
        self.config = config;
        self
    }
}

impl Rule for StatusOptional {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Status fields must be optional"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let Some(field) = ctx.field() else {
            return Vec::new();
        };
        let owner = ctx.decl.owner();
        let direct = owner
            .struct_fields()
            .is_some_and(|fields| fields.iter().any(|f| std::ptr::eq(f, field)));
        if !owner.name.ends_with("Status") || !direct || field.embedded {
            return Vec::new();
        }
        if ctx.json_tag().is_some_and(|t| t.ignored()) || ctx.markers.is_optional() {
            return Vec::new();
        }

        let marker = self.config.preferred_optional();
        vec![Diagnostic::new(
            CODE,
            NAME,
            ctx.location(),
            format!("status field {} must be marked as optional", field.name),
        )
        .with_suggestion(Suggestion::with_fix(
            format!("add the {marker} marker"),
            insert_markers(&field.location, &[marker.to_string()]),
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    #[test]
    fn test_status_members() {
        let string = || TypeExpr::named("string");
        let pkg = Package::new("p")
            .with_type(TypeDecl::structure(
                "WidgetStatus",
                vec![
                    FieldDecl::new("Ready", string()).at("types.go", 4).doc(&["// +optional"]),
                    FieldDecl::new("Message", string()).at("types.go", 6).doc(&["// +required"]),
                    FieldDecl::new("Reason", string()).at("types.go", 7),
                    FieldDecl::new(
                        "Details",
                        TypeExpr::structure(vec![FieldDecl::new("Code", string()).at("types.go", 10)]),
                    )
                    .at("types.go", 9)
                    .doc(&["// +optional"]),
                ],
            ))
            .with_type(TypeDecl::structure(
                "WidgetSpec",
                vec![FieldDecl::new("Name", string()).at("types.go", 20)],
            ));
        let diagnostics = run(StatusOptional::new(), pkg);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "status field Message must be marked as optional",
                "status field Reason must be marked as optional",
            ]
        );
        let fix = diagnostics[1].suggestion.as_ref().unwrap().replacement.as_ref().unwrap();
        assert_eq!(fix.new_text, "// +optional\n\t");
    }
}
