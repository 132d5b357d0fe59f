//! Rule trait for defining lint rules.

use crate::context::DeclContext;
use crate::source::DeclKind;
use crate::types::Diagnostic;

/// A lint rule evaluated against one declaration at a time.
///
/// Rules are independent: none reads another rule's output, so the analyzer
/// may evaluate them on any thread and in any order.
///
/// # Example
///
/// ```ignore
/// use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule};
///
/// pub struct NoSecrets;
///
/// impl Rule for NoSecrets {
///     fn name(&self) -> &'static str { "no-secrets" }
///     fn code(&self) -> &'static str { "KAL900" }
///
///     fn applies_to(&self, kind: DeclKind) -> bool {
///         kind == DeclKind::Field
///     }
///
///     fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
///         if ctx.name().contains("Secret") {
///             vec![Diagnostic::new(self.code(), self.name(), ctx.location(), "no secrets")]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "numeric-bounds").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "KAL020").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Whether the rule inspects declarations of this kind.
    fn applies_to(&self, kind: DeclKind) -> bool {
        let _ = kind;
        true
    }

    /// Checks a single declaration and returns any diagnostics found.
    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
