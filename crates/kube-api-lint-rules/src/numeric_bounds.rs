//! Rule requiring bounds on numeric fields.
//!
//! # Rationale
//!
//! An unbounded number leaves every consumer to guess its valid range.
//! `int64` values outside the range a JSON double represents exactly get
//! silently rounded by some clients.
//!
//! # Configuration
//!
//! `[linters.numericbounds] min = ..., max = ...` narrows or widens the
//! envelope `int64` bounds must fit in.

use kube_api_lint_core::linters::NumericBounds as Envelope;
use kube_api_lint_core::markers::known;
use kube_api_lint_core::typegraph::BasicKind;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule, TypeKind};

/// Rule code for numeric-bounds.
pub const CODE: &str = "KAL020";

/// Rule name for numeric-bounds.
pub const NAME: &str = "numeric-bounds";

/// Requires `Minimum` and `Maximum` on numeric fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericBounds {
    /// Envelope `int64` bounds must lie in.
    pub envelope: Envelope,
}

impl NumericBounds {
    /// Creates a new rule with the safe-integer envelope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the envelope.
    #[must_use]
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }
}

impl Rule for NumericBounds {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Numeric fields must declare minimum and maximum bounds"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let desc = ctx.describe();
        let TypeKind::Basic(basic) = desc.kind else {
            return Vec::new();
        };
        if !matches!(
            basic,
            BasicKind::Int32 | BasicKind::Int64 | BasicKind::Float32 | BasicKind::Float64
        ) {
            return Vec::new();
        }
        let markers = ctx.effective_markers();
        if markers.has_any(known::ENUM_SPELLINGS) {
            return Vec::new();
        }

        let minimum = markers.get_single(known::MINIMUM);
        let maximum = markers.get_single(known::MAXIMUM);
        let report = |text: String| {
            vec![Diagnostic::new(
                CODE,
                NAME,
                ctx.location(),
                format!("{} {text}", ctx.subject()),
            )]
        };

        match (minimum, maximum) {
            (None, None) => report("should have minimum and maximum bounds validation markers".to_string()),
            (Some(_), None) => report("has minimum but is missing maximum bounds validation marker".to_string()),
            (None, Some(_)) => report("has maximum but is missing minimum bounds validation marker".to_string()),
            (Some(min), Some(max)) if basic == BasicKind::Int64 => {
                let outside = [min, max]
                    .iter()
                    .filter_map(|m| m.numeric_value())
                    .any(|v| !self.envelope.contains(v));
                if !outside {
                    return Vec::new();
                }
                report(format!(
                    "has bounds [{}, {}] that exceed safe integer range [{}, {}]. Consider using a string type or Quantity",
                    min.unquoted_value().unwrap_or_default(),
                    max.unquoted_value().unwrap_or_default(),
                    self.envelope.min(),
                    self.envelope.max()
                ))
            }
            (Some(_), Some(_)) => Vec::new(),
        }
    }
}
