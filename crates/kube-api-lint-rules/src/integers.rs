//! Rule reporting discouraged integer types.
//!
//! # Rationale
//!
//! `int` changes width with the platform, `int8`/`int16` are too small to
//! evolve, and unsigned integers are not portable across JSON clients.
//! APIs use `int32` or `int64` and express positivity with validation.
//!
//! Byte slices (`[]byte`, `[]uint8`) are data, not integers, and are
//! allowed.

use kube_api_lint_core::typegraph::{BasicKind, Leaf, LeafRole};
use kube_api_lint_core::{DeclContext, Diagnostic, Rule, TypeKind};

/// Rule code for integers.
pub const CODE: &str = "KAL009";

/// Rule name for integers.
pub const NAME: &str = "integers";

/// Reports `int`, `int8`, `int16` and unsigned integers.
#[derive(Debug, Clone, Default)]
pub struct Integers;

impl Integers {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn problem(leaf: &Leaf<'_>) -> Option<&'static str> {
    let TypeKind::Basic(basic) = leaf.kind else {
        return None;
    };
    match basic {
        BasicKind::Int | BasicKind::Int8 | BasicKind::Int16 => {
            Some("should not use an int, int8 or int16. Use int32 or int64 instead")
        }
        BasicKind::Uint8 if leaf.role == LeafRole::ArrayElement => None,
        b if b.is_unsigned() => Some(
            "should not use unsigned integers, use only int32 or int64 and apply validation to ensure the value is positive",
        ),
        _ => None,
    }
}

impl Rule for Integers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Integers must be int32 or int64"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        ctx.package
            .graph()
            .walk_leaves(ctx.decl.type_expr(), &mut |leaf| {
                if let Some(text) = problem(&leaf) {
                    out.push(Diagnostic::new(
                        CODE,
                        NAME,
                        ctx.location(),
                        format!("{}{} {text}", ctx.subject(), leaf.role.phrase()),
                    ));
                }
            });
        out
    }
}
