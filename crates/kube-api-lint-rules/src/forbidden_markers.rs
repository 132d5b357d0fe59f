//! Rule reporting markers a project has banned.
//!
//! # Configuration
//!
//! ```toml
//! [[linters.forbiddenmarkers.markers]]
//! identifier = "kubebuilder:validation:XValidation:rule=has(self.x)"
//! ```
//!
//! Attribute-qualified entries only match markers carrying those values.

use crate::fixes::{marker_label, remove_marker};
use kube_api_lint_core::{DeclContext, Diagnostic, MarkerPattern, Rule, Suggestion};

/// Rule code for forbidden-markers.
pub const CODE: &str = "KAL008";

/// Rule name for forbidden-markers.
pub const NAME: &str = "forbidden-markers";

/// Reports configured forbidden markers.
#[derive(Debug, Clone, Default)]
pub struct ForbiddenMarkers {
    /// Forbidden marker patterns.
    pub markers: Vec<MarkerPattern>,
}

impl ForbiddenMarkers {
    /// Creates a rule that forbids nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the forbidden markers.
    #[must_use]
    pub fn markers(mut self, markers: Vec<MarkerPattern>) -> Self {
        self.markers = markers;
        self
    }
}

impl Rule for ForbiddenMarkers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Configured markers must not be used"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        if self.markers.is_empty() {
            return Vec::new();
        }
        ctx.markers
            .iter()
            .filter(|marker| self.markers.iter().any(|p| p.matches(marker)))
            .map(|marker| {
                Diagnostic::new(
                    CODE,
                    NAME,
                    marker.location.clone(),
                    format!(
                        "{} has forbidden marker {:?}",
                        ctx.subject(),
                        marker_label(marker)
                    ),
                )
                .with_suggestion(Suggestion::with_fix(
                    "remove the forbidden marker",
                    remove_marker(marker),
                ))
            })
            .collect()
    }
}
