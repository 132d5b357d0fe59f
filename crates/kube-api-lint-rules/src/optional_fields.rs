//! Rule checking serialization of optional fields.
//!
//! # Rationale
//!
//! An optional field left unset must not appear in the serialized
//! object, and a user must be able to set it to its zero value when that
//! value is valid. The first needs `omitempty`/`omitzero`; the second
//! needs a pointer.
//!
//! # Configuration
//!
//! ```toml
//! [linters.optionalfields.pointers]
//! preference = "WhenRequired"   # or "Always"
//! policy = "SuggestFix"         # or "Warn"
//!
//! [linters.optionalfields.omitempty]
//! policy = "SuggestFix"         # "Warn", "Ignore"
//!
//! [linters.optionalfields.omitzero]
//! policy = "SuggestFix"         # "Warn", "Forbid"
//! ```

use crate::serialization::{self, Settings};
use kube_api_lint_core::linters::OptionalFieldsConfig;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule};

/// Rule code for optional-fields.
pub const CODE: &str = "KAL021";

/// Rule name for optional-fields.
pub const NAME: &str = "optional-fields";

/// Checks tags and pointers of fields marked optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalFields {
    /// Policies.
    pub config: OptionalFieldsConfig,
}

impl OptionalFields {
    /// Creates a new rule with default policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policies.
    #[must_use]
    pub fn config(mut self, config: OptionalFieldsConfig) -> Self {
        self.config = config;
        self
    }
}

impl Rule for OptionalFields {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Optional fields must serialize unambiguously"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        if !ctx.markers.is_optional() {
            return Vec::new();
        }
        serialization::check(
            CODE,
            NAME,
            ctx,
            Settings {
                preference: self.config.pointer_preference,
                pointer_policy: self.config.pointer_policy,
                omitempty: self.config.omitempty,
                omitzero: self.config.omitzero,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::linters::{OmitZeroPolicy, PointerPreference};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    fn optional(name: &str, ty: TypeExpr, line: usize) -> FieldDecl {
        FieldDecl::new(name, ty).at("types.go", line).doc(&["// +optional"])
    }

    fn single(field: FieldDecl) -> Package {
        Package::new("p").with_type(TypeDecl::structure("WidgetSpec", vec![field]))
    }

    #[test]
    fn test_unbounded_string_needs_omitempty_then_pointer() {
        let pkg = single(optional("Name", TypeExpr::named("string"), 4).json("name"));
        let diagnostics = run(OptionalFields::new(), pkg);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "field Name should have the omitempty tag.",
                "field Name has a valid zero value (\"\"), but the validation is not complete (e.g. minimum length). The field should be a pointer to allow the zero value to be set. If the zero value is not a valid use case, complete the validation and remove the pointer.",
            ]
        );
        let fix = diagnostics[0].suggestion.as_ref().unwrap().replacement.as_ref().unwrap();
        assert_eq!(fix.new_text, r#"json:"name,omitempty""#);
        assert!(!diagnostics[1].has_fix());
        assert!(diagnostics[1].suggestion.is_some());
    }

    #[test]
    fn test_invalid_zero_value() {
        let value = single(
            FieldDecl::new("Name", TypeExpr::named("string"))
                .doc(&["// +optional", "// +kubebuilder:validation:MinLength=1"])
                .json("name,omitempty"),
        );
        assert!(run(OptionalFields::new(), value).is_empty());

        let pointer = single(
            FieldDecl::new("Name", TypeExpr::pointer(TypeExpr::named("string")))
                .doc(&["// +optional", "// +kubebuilder:validation:MinLength=1"])
                .json("name,omitempty"),
        );
        assert_eq!(
            messages(&run(OptionalFields::new(), pointer)),
            vec!["field Name does not allow the zero value. The field does not need to be a pointer."]
        );
    }

    #[test]
    fn test_struct_values_use_omitzero() {
        let pkg = Package::new("p")
            .with_type(TypeDecl::structure(
                "Settings",
                vec![FieldDecl::new("Mode", TypeExpr::named("string"))
                    .doc(&["// +required", "// +kubebuilder:validation:MinLength=1"])
                    .json("mode")],
            ))
            .with_type(TypeDecl::structure(
                "WidgetSpec",
                vec![optional("Settings", TypeExpr::named("Settings"), 10).json("settings,omitempty")],
            ));
        let diagnostics = run(OptionalFields::new(), pkg.clone());
        assert_eq!(messages(&diagnostics), vec!["field Settings should have the omitzero tag."]);
        assert_eq!(
            diagnostics[0].suggestion.as_ref().unwrap().replacement.as_ref().unwrap().new_text,
            r#"json:"settings,omitempty,omitzero""#
        );

        let forbid = OptionalFieldsConfig {
            omitzero: OmitZeroPolicy::Forbid,
            ..OptionalFieldsConfig::default()
        };
        assert_eq!(
            messages(&run(OptionalFields::new().config(forbid), pkg)),
            vec!["field Settings should be a pointer."]
        );
    }

    #[test]
    fn test_collections_and_always_preference() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "WidgetSpec",
            vec![
                optional("Tags", TypeExpr::pointer(TypeExpr::slice(TypeExpr::named("string"))), 4)
                    .json("tags,omitempty"),
                optional("Replicas", TypeExpr::named("int32"), 9)
                    .doc(&[
                        "// +optional",
                        "// +kubebuilder:validation:Minimum=1",
                        "// +kubebuilder:validation:Maximum=10",
                    ])
                    .json("replicas,omitempty"),
            ],
        ));
        assert_eq!(
            messages(&run(OptionalFields::new(), pkg.clone())),
            vec!["field Tags is a pointer to a slice or map, which does not need to be a pointer. The pointer should be removed."]
        );

        let always = OptionalFieldsConfig {
            pointer_preference: PointerPreference::Always,
            ..OptionalFieldsConfig::default()
        };
        assert_eq!(
            messages(&run(OptionalFields::new().config(always), pkg)),
            vec![
                "field Tags is a pointer to a slice or map, which does not need to be a pointer. The pointer should be removed.",
                "field Replicas should be a pointer.",
            ]
        );
    }

    #[test]
    fn test_unmarked_and_ignored_fields_are_skipped() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "WidgetSpec",
            vec![
                FieldDecl::new("Name", TypeExpr::named("string")).json("name"),
                optional("Cache", TypeExpr::named("string"), 5).json("-"),
            ],
        ));
        assert!(run(OptionalFields::new(), pkg).is_empty());
    }
}
