//! Rule requiring every field and type to say whether it is optional or
//! required.
//!
//! # Checks
//!
//! - a declaration is marked optional or required, never both and never neither
//! - the configured spelling is used (`optional` rather than
//!   `kubebuilder:validation:Optional`, by default)
//!
//! # Configuration
//!
//! ```toml
//! [linters.optionalorrequired]
//! preferred_optional_marker = "optional"
//! preferred_required_marker = "required"
//! exempt_embedded_fields = true
//! check_types = true
//! ```

use crate::fixes::{remove_marker, replace_marker};
use kube_api_lint_core::linters::OptionalOrRequiredConfig;
use kube_api_lint_core::markers::known;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule, Suggestion};

/// Rule code for optional-or-required.
pub const CODE: &str = "KAL022";

/// Rule name for optional-or-required.
pub const NAME: &str = "optional-or-required";

/// Checks optional/required markers on fields and types.
#[derive(Debug, Clone, Default)]
pub struct OptionalOrRequired {
    /// Preferred spellings and exemptions.
    pub config: OptionalOrRequiredConfig,
}

impl OptionalOrRequired {
    /// Creates a new rule preferring `optional` and `required`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred spellings.
    #[must_use]
    pub fn config(mut self, config: OptionalOrRequiredConfig) -> Self {
        self.config = config;
        self
    }
}

/// Preferred-spelling diagnostics for one family of spellings.
fn spelling(ctx: &DeclContext<'_, '_>, spellings: &[&str], preferred: &str) -> Vec<Diagnostic> {
    let present: Vec<_> = ctx
        .markers
        .iter()
        .filter(|m| spellings.contains(&m.identifier.as_str()))
        .collect();
    let has_preferred = present.iter().any(|m| m.identifier == preferred);
    let mut replaced = has_preferred;

    present
        .into_iter()
        .filter(|m| m.identifier != preferred)
        .map(|marker| {
            let (message, suggestion) = if replaced {
                (
                    format!(
                        "{} has redundant marker {}, {preferred} is already present",
                        ctx.subject(),
                        marker.identifier
                    ),
                    Suggestion::with_fix("remove the marker", remove_marker(marker)),
                )
            } else {
                replaced = true;
                (
                    format!(
                        "{} should use marker {preferred} instead of {}",
                        ctx.subject(),
                        marker.identifier
                    ),
                    Suggestion::with_fix(
                        format!("use {preferred}"),
                        replace_marker(marker, preferred),
                    ),
                )
            };
            Diagnostic::new(CODE, NAME, marker.location.clone(), message).with_suggestion(suggestion)
        })
        .collect()
}

impl Rule for OptionalOrRequired {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Fields and types must be marked either optional or required"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field || self.config.checks_types()
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        if let Some(field) = ctx.field() {
            let exempt = field.embedded && self.config.exempts_embedded();
            if exempt || ctx.json_tag().is_some_and(|t| t.ignored()) {
                return Vec::new();
            }
        }

        let optional = ctx.markers.is_optional();
        let required = ctx.markers.is_required();
        let presence = match (optional, required) {
            (true, true) => Some("must not be marked as both optional and required"),
            (false, false) => Some("must be marked as optional or required"),
            _ => None,
        };

        let mut out: Vec<Diagnostic> = presence
            .map(|text| Diagnostic::new(CODE, NAME, ctx.location(), format!("{} {text}", ctx.subject())))
            .into_iter()
            .collect();
        out.extend(spelling(ctx, known::OPTIONAL_SPELLINGS, self.config.preferred_optional()));
        out.extend(spelling(ctx, known::REQUIRED_SPELLINGS, self.config.preferred_required()));
        out
    }
}
