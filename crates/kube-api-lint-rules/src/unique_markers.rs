//! Rule reporting markers defined more than once.
//!
//! Markers count whether written on the declaration or on a named type
//! it uses, so a field cannot redefine a bound its type already sets.
//! Cataloged single-value markers are unique by identifier; configured
//! entries make a marker unique per combination of attribute values.
//!
//! # Configuration
//!
//! ```toml
//! [[linters.uniquemarkers.custom_markers]]
//! identifier = "custom:Marker"
//! attributes = ["fruit"]
//! ```

use kube_api_lint_core::linters::UniqueMarker;
use kube_api_lint_core::{DeclContext, Diagnostic, Label, Marker, MarkerKey, Rule};
use std::collections::BTreeMap;

/// Rule code for unique-markers.
pub const CODE: &str = "KAL027";

/// Rule name for unique-markers.
pub const NAME: &str = "unique-markers";

/// Reports repeated definitions of unique markers.
#[derive(Debug, Clone, Default)]
pub struct UniqueMarkers {
    /// Additional unique markers and their key attributes.
    pub custom: Vec<UniqueMarker>,
}

impl UniqueMarkers {
    /// Creates a new rule checking cataloged markers only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the additional unique markers.
    #[must_use]
    pub fn custom(mut self, custom: Vec<UniqueMarker>) -> Self {
        self.custom = custom;
        self
    }
}

impl Rule for UniqueMarkers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Unique markers must be defined only once"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut identities: BTreeMap<&str, &[String]> = ctx
            .package
            .catalog()
            .unique_markers()
            .map(|id| (id, &[][..]))
            .collect();
        for entry in &self.custom {
            identities.insert(&entry.identifier, &entry.attributes);
        }

        let markers = ctx.effective_markers();
        let mut out = Vec::new();
        for (identifier, attributes) in identities {
            let mut definitions: BTreeMap<MarkerKey, Vec<&Marker>> = BTreeMap::new();
            for marker in markers.get(identifier) {
                definitions.entry(marker.key_for(attributes)).or_default().push(marker);
            }
            out.extend(definitions.into_iter().filter(|(_, found)| found.len() > 1).map(
                |(key, found)| {
                    let diagnostic = Diagnostic::new(
                        CODE,
                        NAME,
                        ctx.location(),
                        format!("{} has multiple definitions of marker {key}", ctx.subject()),
                    );
                    found.into_iter().fold(diagnostic, |d, marker| {
                        d.with_label(Label::new(marker.location.clone(), "defined here"))
                    })
                },
            ));
        }
        out
    }
}
