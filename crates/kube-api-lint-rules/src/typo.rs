//! Rule reporting likely misspelled markers.
//!
//! Two shapes are caught:
//!
//! - a space between `+` and the identifier (`// + optional`), or no
//!   space between `//` and `+` (`//+optional`), which some generators ignore
//! - an unknown identifier with a segment one or two edits away from a
//!   dictionary word (`kubebuilder:validaton:MinLength`)
//!
//! Cataloged identifiers are never reported.

use crate::fixes::replace_marker;
use kube_api_lint_core::utils::closest;
use kube_api_lint_core::{
    CommentLine, DeclContext, Diagnostic, Marker, MarkerCatalog, Replacement, Rule, Suggestion,
};

/// Rule code for typo.
pub const CODE: &str = "KAL026";

/// Rule name for typo.
pub const NAME: &str = "typo";

/// Reports marker spacing mistakes and misspelled identifier segments.
#[derive(Debug, Clone, Default)]
pub struct Typo;

impl Typo {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn spacing(ctx: &DeclContext<'_, '_>, line: &CommentLine) -> Option<Diagnostic> {
    let rest = line.body().strip_prefix('+')?;
    if rest.trim().is_empty() {
        return None;
    }
    let problem = if rest.starts_with(char::is_whitespace) {
        "a space after '+'"
    } else if line.text.trim_start().starts_with("//+") {
        "no space after '//'"
    } else {
        return None;
    };
    let fixed = format!("// +{}", rest.trim_start());
    let location = &line.location;
    Some(
        Diagnostic::new(
            CODE,
            NAME,
            location.clone(),
            format!("{} has a marker with {problem}: {}", ctx.subject(), line.text.trim()),
        )
        .with_suggestion(Suggestion::with_fix(
            format!("use {fixed}"),
            Replacement::new(
                location.clone().with_span(location.offset, line.text.len()),
                fixed,
            ),
        )),
    )
}

/// Corrects each misspelled segment of an unknown identifier.
fn correct(identifier: &str, catalog: &MarkerCatalog) -> Option<String> {
    let dictionary = catalog.dictionary();
    let mut changed = false;
    let segments: Vec<&str> = identifier
        .split(':')
        .map(|segment| {
            if segment.len() <= 3 || dictionary.contains(segment) {
                return segment;
            }
            let max = if segment.len() >= 6 { 2 } else { 1 };
            match closest(segment, dictionary.iter().map(String::as_str), max) {
                Some(word) => {
                    changed = true;
                    word
                }
                None => segment,
            }
        })
        .collect();
    changed.then(|| segments.join(":"))
}

fn misspelling(ctx: &DeclContext<'_, '_>, marker: &Marker) -> Option<Diagnostic> {
    let catalog = ctx.package.catalog();
    if catalog.is_known(&marker.identifier) {
        return None;
    }
    let corrected = correct(&marker.identifier, catalog)?;
    let body = marker
        .raw
        .split_once('+')
        .map_or(marker.raw.as_str(), |(_, rest)| rest.trim_start());
    let text = body.replacen(&marker.identifier, &corrected, 1);

    Some(
        Diagnostic::new(
            CODE,
            NAME,
            marker.location.clone(),
            format!(
                "possible typo in marker {:?}: did you mean {corrected:?}?",
                marker.identifier
            ),
        )
        .with_suggestion(Suggestion::with_fix(
            format!("use {corrected}"),
            replace_marker(marker, &text),
        )),
    )
}

impl Rule for Typo {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Markers must be spelled and spaced correctly"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out: Vec<Diagnostic> = ctx
            .decl
            .doc()
            .iter()
            .filter_map(|line| spacing(ctx, line))
            .collect();
        out.extend(ctx.markers.iter().filter_map(|marker| misspelling(ctx, marker)));
        out
    }
}
