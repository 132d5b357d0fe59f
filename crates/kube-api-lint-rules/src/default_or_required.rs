//! Rule forbidding a default value on a required declaration.
//!
//! # Rationale
//!
//! A default only applies when the value is omitted, and a required value
//! can never be omitted. The default is dead configuration at best.

use crate::conflicting_markers::report;
use kube_api_lint_core::linters::ConflictSet;
use kube_api_lint_core::{DeclContext, Diagnostic, Rule};

/// Rule code for default-or-required.
pub const CODE: &str = "KAL004";

/// Rule name for default-or-required.
pub const NAME: &str = "default-or-required";

/// Reports declarations that are both required and defaulted.
#[derive(Debug, Clone)]
pub struct DefaultOrRequired {
    conflict: ConflictSet,
}

impl Default for DefaultOrRequired {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultOrRequired {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            conflict: ConflictSet::default_or_required(),
        }
    }
}

impl Rule for DefaultOrRequired {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "A declaration with a default value cannot be required"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        report(CODE, NAME, ctx, &self.conflict).into_iter().collect()
    }
}
