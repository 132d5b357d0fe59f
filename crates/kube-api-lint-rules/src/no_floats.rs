//! Rule reporting floating-point types.
//!
//! Floats do not round-trip reliably between languages and encoders. Use
//! integers with a unit, a string, or `resource.Quantity`.

use kube_api_lint_core::{DeclContext, Diagnostic, Rule};

/// Rule code for no-floats.
pub const CODE: &str = "KAL015";

/// Rule name for no-floats.
pub const NAME: &str = "no-floats";

/// Reports `float32` and `float64`.
#[derive(Debug, Clone, Default)]
pub struct NoFloats;

impl NoFloats {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoFloats {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Floating-point values are not allowed"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        ctx.package
            .graph()
            .walk_leaves(ctx.decl.type_expr(), &mut |leaf| {
                if leaf.kind.basic().is_some_and(|b| b.is_float()) {
                    out.push(Diagnostic::new(
                        CODE,
                        NAME,
                        ctx.location(),
                        format!(
                            "{}{} should not use a float value because they cannot be reliably round-tripped.",
                            ctx.subject(),
                            leaf.role.phrase()
                        ),
                    ));
                }
            });
        out
    }
}
