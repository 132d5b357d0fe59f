//! Rule applying configured naming conventions to declared names.
//!
//! # Configuration
//!
//! ```toml
//! [[linters.namingconventions.conventions]]
//! name = "nophase"
//! violation_matcher = "(?i)phase"
//! operation = "Drop"
//! message = "phase fields are deprecated"
//! ```
//!
//! `Inform` only reports. `Drop` suggests removing the matched text and
//! `Replacement` suggests substituting it.

use crate::fixes::rename;
use kube_api_lint_core::linters::NamingConvention;
use kube_api_lint_core::{DeclContext, Diagnostic, Rule, Suggestion};

/// Rule code for naming-conventions.
pub const CODE: &str = "KAL013";

/// Rule name for naming-conventions.
pub const NAME: &str = "naming-conventions";

/// Checks names against user-supplied conventions.
#[derive(Debug, Clone, Default)]
pub struct NamingConventions {
    /// Conventions, checked in order.
    pub conventions: Vec<NamingConvention>,
}

impl NamingConventions {
    /// Creates a new rule with no conventions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conventions.
    #[must_use]
    pub fn conventions(mut self, conventions: Vec<NamingConvention>) -> Self {
        self.conventions = conventions;
        self
    }
}

impl Rule for NamingConventions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Names must follow the configured naming conventions"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let name = ctx.name();
        self.conventions
            .iter()
            .filter(|convention| convention.matcher.is_match(name))
            .map(|convention| {
                let suggestion = convention
                    .suggest(name)
                    .filter(|new| !new.is_empty() && new != name)
                    .map(|new| {
                        Suggestion::with_fix(
                            format!("rename to {new}"),
                            rename(ctx.decl.location(), name, &new),
                        )
                    });
                Diagnostic::new(
                    CODE,
                    NAME,
                    ctx.location(),
                    format!(
                        "{} violates naming convention {:?}: {}",
                        ctx.subject(),
                        convention.name,
                        convention.message
                    ),
                )
                .with_optional_suggestion(suggestion)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;
    use kube_api_lint_core::linters::NamingOperation;
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    fn package() -> Package {
        Package::new("p").with_type(
            TypeDecl::structure(
                "WidgetConfiguration",
                vec![
                    FieldDecl::new("FooConfiguration", TypeExpr::named("string")).at("types.go", 4),
                    FieldDecl::new("Name", TypeExpr::named("string")).at("types.go", 5),
                ],
            )
            .at("types.go", 3),
        )
    }

    #[test]
    fn test_replacement_suggests_rename() {
        let convention = NamingConvention::new(
            "noconfiguration",
            "Configuration",
            NamingOperation::Replacement("Config".to_string()),
            "use Config",
        )
        .unwrap();
        let diagnostics = run(NamingConventions::new().conventions(vec![convention]), package());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "type WidgetConfiguration violates naming convention \"noconfiguration\": use Config"
        );
        let fix = diagnostics[1].suggestion.as_ref().unwrap().replacement.as_ref().unwrap();
        assert_eq!(fix.new_text, "FooConfig");
        assert_eq!(fix.location.length, "FooConfiguration".len());
    }

    #[test]
    fn test_inform_and_empty_drop_have_no_fix() {
        let inform = NamingConvention::new("inform", "Name", NamingOperation::Inform, "avoid Name").unwrap();
        let drop = NamingConvention::new("drop", "^Name$", NamingOperation::Drop, "drop it").unwrap();
        let diagnostics = run(NamingConventions::new().conventions(vec![inform, drop]), package());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| !d.has_fix()));
    }
}
