//! Rule requiring field documentation to start with the serialized name.
//!
//! # Rationale
//!
//! Generated API reference docs and `kubectl explain` show the JSON name,
//! not the declared field name. A comment that starts with the JSON name
//! reads correctly in both places.
//!
//! # Fix
//!
//! When the first word only differs in case, it is rewritten to the JSON
//! name.

use kube_api_lint_core::{
    DeclContext, DeclKind, Diagnostic, Location, Replacement, Rule, Suggestion,
};

/// Rule code for comment-start.
pub const CODE: &str = "KAL001";

/// Rule name for comment-start.
pub const NAME: &str = "comment-start";

/// Requires field doc comments to start with the field's JSON name.
#[derive(Debug, Clone, Default)]
pub struct CommentStart;

impl CommentStart {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CommentStart {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Field documentation must start with the field's JSON name"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let Some(field) = ctx.field() else {
            return Vec::new();
        };
        let Some(tag) = ctx.json_tag() else {
            return Vec::new();
        };
        if field.embedded || tag.ignored() || tag.name.is_empty() {
            return Vec::new();
        }

        let prose = field.doc.iter().find(|line| {
            let body = line.body();
            !body.is_empty() && !body.starts_with('+')
        });
        let Some(line) = prose else {
            return vec![Diagnostic::new(
                CODE,
                NAME,
                ctx.location(),
                format!("field {} is missing godoc comment", field.name),
            )];
        };

        let first = line.body().split_whitespace().next().unwrap_or_default();
        if first == tag.name {
            return Vec::new();
        }

        let message = format!(
            "godoc for field {} should start with '{} ...'",
            field.name, tag.name
        );
        let suggestion = first
            .eq_ignore_ascii_case(&tag.name)
            .then(|| line.text.find(first))
            .flatten()
            .map(|index| {
                let start = &line.location;
                let location = Location::new(start.file.clone(), start.line, start.column + index)
                    .with_span(start.offset + index, first.len());
                Suggestion::with_fix(
                    format!("start the comment with '{}'", tag.name),
                    Replacement::new(location, tag.name.clone()),
                )
            });

        vec![Diagnostic::new(CODE, NAME, line.location.clone(), message)
            .with_optional_suggestion(suggestion)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    fn package(field: FieldDecl) -> Package {
        Package::new("example.com/api/v1").with_type(TypeDecl::structure("WidgetSpec", vec![field]))
    }

    fn name_field(doc: &[&str]) -> FieldDecl {
        FieldDecl::new("DisplayName", TypeExpr::named("string"))
            .at("types.go", 10)
            .doc(doc)
            .json("displayName,omitempty")
    }

    #[test]
    fn test_matching_comment_passes() {
        let diagnostics = run(
            CommentStart::new(),
            package(name_field(&["// displayName is shown in the UI.", "// +optional"])),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_markers_are_not_prose() {
        let diagnostics = run(CommentStart::new(), package(name_field(&["// +optional"])));
        assert_eq!(
            messages(&diagnostics),
            vec!["field DisplayName is missing godoc comment"]
        );
    }

    #[test]
    fn test_case_mismatch_has_fix() {
        let diagnostics = run(
            CommentStart::new(),
            package(name_field(&["// DisplayName is shown in the UI."])),
        );
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(
            d.message,
            "godoc for field DisplayName should start with 'displayName ...'"
        );
        let fix = d
            .suggestion
            .as_ref()
            .and_then(|s| s.replacement.as_ref())
            .expect("fix expected");
        assert_eq!(fix.new_text, "displayName");
        assert_eq!(fix.location.line, 9);
        assert_eq!(fix.location.column, 5);
    }

    #[test]
    fn test_unrelated_first_word_has_no_fix() {
        let diagnostics = run(
            CommentStart::new(),
            package(name_field(&["// The name shown in the UI."])),
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].has_fix());
    }

    #[test]
    fn test_inline_and_ignored_fields_are_skipped() {
        let inline = FieldDecl::new("TypeMeta", TypeExpr::external("metav1", "TypeMeta"))
            .embedded()
            .json(",inline");
        let ignored = FieldDecl::new("Cache", TypeExpr::named("string")).json("-");
        let pkg = Package::new("p").with_type(TypeDecl::structure("Widget", vec![inline, ignored]));
        assert!(run(CommentStart::new(), pkg).is_empty());
    }
}
