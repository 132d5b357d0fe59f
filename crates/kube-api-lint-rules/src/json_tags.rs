//! Rule checking `json` struct tags.
//!
//! # Checks
//!
//! - every non-embedded field has a `json` tag
//! - the serialized name is non-empty unless the field is inlined
//! - `inline` is only used on embedded fields
//! - the serialized name matches the configured pattern (camelCase by
//!   default)
//!
//! # Configuration
//!
//! `[linters.jsontags] json_tag_regex = "..."`

use kube_api_lint_core::linters::JsonTagPattern;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule};

/// Rule code for json-tags.
pub const CODE: &str = "KAL010";

/// Rule name for json-tags.
pub const NAME: &str = "json-tags";

/// Checks presence and shape of `json` tags.
#[derive(Debug, Clone, Default)]
pub struct JsonTags {
    /// Pattern serialized names must match.
    pub pattern: JsonTagPattern,
}

impl JsonTags {
    /// Creates a new rule with the default pattern.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: JsonTagPattern) -> Self {
        self.pattern = pattern;
        self
    }
}

impl Rule for JsonTags {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Fields need camelCase json tags"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let Some(field) = ctx.field() else {
            return Vec::new();
        };
        let report = |message: String| vec![Diagnostic::new(CODE, NAME, ctx.location(), message)];

        let Some(tag) = ctx.json_tag() else {
            if field.embedded {
                return Vec::new();
            }
            return report(format!("field {} is missing json tag", field.name));
        };
        if tag.ignored() {
            return Vec::new();
        }
        if tag.inline() {
            if !field.embedded {
                return report(format!(
                    "field {} has inline json tag but is not an embedded field",
                    field.name
                ));
            }
            return Vec::new();
        }
        if tag.name.is_empty() {
            return report(format!("field {} has empty json tag name", field.name));
        }
        if !self.pattern.is_match(&tag.name) {
            return report(format!(
                "field {} json tag does not match pattern {:?}: {}",
                field.name,
                self.pattern.as_str(),
                tag.name
            ));
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    #[test]
    fn test_json_tags() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Widget",
            vec![
                FieldDecl::new("TypeMeta", TypeExpr::external("metav1", "TypeMeta"))
                    .at("types.go", 3)
                    .embedded()
                    .json(",inline"),
                FieldDecl::new("Name", TypeExpr::named("string")).at("types.go", 4),
                FieldDecl::new("DisplayName", TypeExpr::named("string"))
                    .at("types.go", 5)
                    .json("display_name,omitempty"),
                FieldDecl::new("Spec", TypeExpr::named("string"))
                    .at("types.go", 6)
                    .json(",inline"),
                FieldDecl::new("Data", TypeExpr::named("string"))
                    .at("types.go", 7)
                    .json(",omitempty"),
                FieldDecl::new("Cache", TypeExpr::named("string")).at("types.go", 8).json("-"),
                FieldDecl::new("APIVersion", TypeExpr::named("string"))
                    .at("types.go", 9)
                    .json("apiVersion"),
            ],
        ));
        let diagnostics = run(JsonTags::new(), pkg);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "field Name is missing json tag",
                "field DisplayName json tag does not match pattern \"^[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)*$\": display_name",
                "field Spec has inline json tag but is not an embedded field",
                "field Data has empty json tag name",
            ]
        );
    }

    #[test]
    fn test_custom_pattern() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Widget",
            vec![FieldDecl::new("DisplayName", TypeExpr::named("string")).json("display_name")],
        ));
        let rule = JsonTags::new().pattern(JsonTagPattern::new("^[a-z_]+$").unwrap());
        assert!(run(rule, pkg).is_empty());
    }
}
