//! Rule preferring "Time" over "Timestamp" in field names.
//!
//! Kubernetes APIs consistently say `CreationTime`, not
//! `CreationTimestamp`; the `metav1.Time` type already says what it is.

use crate::fixes::rename;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule, Suggestion};
use regex::Regex;
use std::sync::LazyLock;

/// Rule code for no-timestamp.
pub const CODE: &str = "KAL019";

/// Rule name for no-timestamp.
pub const NAME: &str = "no-timestamp";

#[allow(clippy::expect_used)]
static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)time_?stamp").expect("timestamp regex"));

/// Reports "Timestamp" in field names.
#[derive(Debug, Clone, Default)]
pub struct NoTimestamp;

impl NoTimestamp {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTimestamp {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Field names say Time instead of Timestamp"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let name = ctx.name();
        if !TIMESTAMP.is_match(name) {
            return Vec::new();
        }
        let renamed = TIMESTAMP.replace_all(name, |caps: &regex::Captures<'_>| {
            if caps[0].starts_with('t') { "time" } else { "Time" }
        });
        vec![Diagnostic::new(
            CODE,
            NAME,
            ctx.location(),
            format!("{} should use the term 'Time' instead of 'Timestamp'", ctx.subject()),
        )
        .with_suggestion(Suggestion::with_fix(
            format!("rename to {renamed}"),
            rename(ctx.decl.location(), name, &renamed),
        ))]
    }
}
