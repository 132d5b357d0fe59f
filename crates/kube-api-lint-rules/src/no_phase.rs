//! Rule reporting phase fields.
//!
//! Phases are a single-value state machine that clients end up parsing.
//! Conditions replace them.

use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule};

/// Rule code for no-phase.
pub const CODE: &str = "KAL017";

/// Rule name for no-phase.
pub const NAME: &str = "no-phase";

/// Reports fields whose Go or JSON name mentions "phase".
#[derive(Debug, Clone, Default)]
pub struct NoPhase;

impl NoPhase {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoPhase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Phase fields are deprecated in favor of conditions"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mentions = |name: &str| name.to_ascii_lowercase().contains("phase");
        let json_name = ctx.json_tag().map(|tag| tag.name).unwrap_or_default();
        if !mentions(ctx.name()) && !mentions(&json_name) {
            return Vec::new();
        }
        vec![Diagnostic::new(
            CODE,
            NAME,
            ctx.location(),
            format!(
                "{}: phase fields are deprecated and conditions should be used instead",
                ctx.subject()
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    #[test]
    fn test_phase_names() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "WidgetStatus",
            vec![
                FieldDecl::new("Phase", TypeExpr::named("string")).at("types.go", 3).json("phase"),
                FieldDecl::new("State", TypeExpr::named("string")).at("types.go", 4).json("rolloutPhase"),
                FieldDecl::new("Ready", TypeExpr::named("string")).at("types.go", 5).json("ready"),
            ],
        ));
        assert_eq!(
            messages(&run(NoPhase::new(), pkg)),
            vec![
                "field Phase: phase fields are deprecated and conditions should be used instead",
                "field State: phase fields are deprecated and conditions should be used instead",
            ]
        );
    }
}
