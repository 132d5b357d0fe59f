//! Rule reporting boolean types.
//!
//! # Rationale
//!
//! A boolean can never grow a third state. A string enum with meaningful
//! values (`Enabled`, `Disabled`) can.

use kube_api_lint_core::typegraph::BasicKind;
use kube_api_lint_core::{DeclContext, Diagnostic, Rule, TypeKind};

/// Rule code for no-bools.
pub const CODE: &str = "KAL014";

/// Rule name for no-bools.
pub const NAME: &str = "no-bools";

/// Reports `bool` in declared types, including elements and map values.
#[derive(Debug, Clone, Default)]
pub struct NoBools;

impl NoBools {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoBools {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Booleans should be string enums"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        ctx.package
            .graph()
            .walk_leaves(ctx.decl.type_expr(), &mut |leaf| {
                if leaf.kind == TypeKind::Basic(BasicKind::Bool) {
                    out.push(Diagnostic::new(
                        CODE,
                        NAME,
                        ctx.location(),
                        format!(
                            "{}{} should not use a bool. Use a string type with meaningful constant values as an enum.",
                            ctx.subject(),
                            leaf.role.phrase()
                        ),
                    ));
                }
            });
        out
    }
}
