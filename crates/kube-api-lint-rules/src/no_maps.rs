//! Rule reporting map types.
//!
//! # Rationale
//!
//! Maps cannot carry per-entry validation or merge keys. A list of
//! structs keyed by a unique name can.
//!
//! # Configuration
//!
//! `[linters.nomaps] policy = "Enforce" | "AllowStringToStringMaps" | "Ignore"`
//!
//! `Ignore` still reports maps whose key or value is not a builtin
//! scalar.

use kube_api_lint_core::linters::NoMapsPolicy;
use kube_api_lint_core::{DeclContext, Diagnostic, Rule, TypeExpr};

/// Rule code for no-maps.
pub const CODE: &str = "KAL016";

/// Rule name for no-maps.
pub const NAME: &str = "no-maps";

/// Reports map-typed declarations.
#[derive(Debug, Clone, Copy)]
pub struct NoMaps {
    /// Which maps are reported.
    pub policy: NoMapsPolicy,
}

impl Default for NoMaps {
    fn default() -> Self {
        Self {
            policy: NoMapsPolicy::AllowStringToStringMaps,
        }
    }
}

impl NoMaps {
    /// Creates a new rule allowing `map[string]string`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy.
    #[must_use]
    pub fn policy(mut self, policy: NoMapsPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Rule for NoMaps {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Maps should be lists keyed by a unique name"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        ctx.package
            .graph()
            .walk_leaves(ctx.decl.type_expr(), &mut |leaf| {
                let TypeExpr::Map { key, value } = leaf.expr else {
                    return;
                };
                let key = ctx.package.describe(key);
                let value = ctx.package.describe(value);
                let reported = match self.policy {
                    NoMapsPolicy::Enforce => true,
                    NoMapsPolicy::AllowStringToStringMaps => !(key.is_string() && value.is_string()),
                    NoMapsPolicy::Ignore => key.kind.basic().is_none() || value.kind.basic().is_none(),
                };
                if reported {
                    out.push(Diagnostic::new(
                        CODE,
                        NAME,
                        ctx.location(),
                        format!(
                            "{}{} should not use a map type, use a list type with a unique name/identifier instead",
                            ctx.subject(),
                            leaf.role.phrase()
                        ),
                    ));
                }
            });
        out
    }
}
