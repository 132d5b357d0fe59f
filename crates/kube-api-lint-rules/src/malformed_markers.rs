//! Rule reporting marker lines that could not be parsed.

use kube_api_lint_core::{DeclContext, Diagnostic, Rule};

/// Rule code for malformed-markers.
pub const CODE: &str = "KAL028";

/// Rule name for malformed-markers.
pub const NAME: &str = "malformed-markers";

/// Reports comment lines that start with `+` but are not valid markers.
#[derive(Debug, Clone, Default)]
pub struct MalformedMarkers;

impl MalformedMarkers {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MalformedMarkers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Marker comments must be well-formed"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        ctx.markers
            .failures()
            .iter()
            .map(|failure| {
                Diagnostic::new(
                    CODE,
                    NAME,
                    failure.location.clone(),
                    format!(
                        "{} has a malformed marker {}: {}",
                        ctx.subject(),
                        failure.raw.trim(),
                        failure.reason
                    ),
                )
            })
            .collect()
    }
}
