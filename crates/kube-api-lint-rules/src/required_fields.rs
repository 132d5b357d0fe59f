//! Rule checking serialization of required fields.
//!
//! Required fields follow the same tag and pointer logic as optional
//! ones, except that a pointer is only asked for when the zero value is a
//! valid choice: otherwise validation already rejects an unset field.
//!
//! # Configuration
//!
//! `[linters.requiredfields.pointers] policy`, `[linters.requiredfields.omitempty] policy`
//! and `[linters.requiredfields.omitzero] policy`, as for optional fields.

use crate::serialization::{self, Settings};
use kube_api_lint_core::linters::{PointerPreference, RequiredFieldsConfig};
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule};

/// Rule code for required-fields.
pub const CODE: &str = "KAL023";

/// Rule name for required-fields.
pub const NAME: &str = "required-fields";

/// Checks tags and pointers of fields marked required.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFields {
    /// Policies.
    pub config: RequiredFieldsConfig,
}

impl RequiredFields {
    /// Creates a new rule with default policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policies.
    #[must_use]
    pub fn config(mut self, config: RequiredFieldsConfig) -> Self {
        self.config = config;
        self
    }
}

impl Rule for RequiredFields {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Required fields must serialize unambiguously"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        if !ctx.markers.is_required() {
            return Vec::new();
        }
        serialization::check(
            CODE,
            NAME,
            ctx,
            Settings {
                preference: PointerPreference::WhenRequired,
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
    use kube_api_lint_core::linters::OmitEmptyPolicy;
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    fn required(name: &str, ty: TypeExpr, docs: &[&str]) -> FieldDecl {
        let mut lines = vec!["// +required"];
        lines.extend_from_slice(docs);
        FieldDecl::new(name, ty).doc(&lines)
    }

    #[test]
    fn test_bounded_values_need_no_pointer() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "WidgetSpec",
            vec![required(
                "Replicas",
                TypeExpr::named("int32"),
                &["// +kubebuilder:validation:Minimum=1", "// +kubebuilder:validation:Maximum=10"],
            )
            .json("replicas,omitempty")],
        ));
        assert!(run(RequiredFields::new(), pkg).is_empty());
    }

    #[test]
    fn test_valid_zero_values() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "WidgetSpec",
            vec![
                required("Name", TypeExpr::named("string"), &["// +kubebuilder:validation:MinLength=0"])
                    .at("types.go", 4)
                    .json("name,omitempty"),
                required("Count", TypeExpr::named("int32"), &[])
                    .at("types.go", 6)
                    .json("count"),
            ],
        ));
        assert_eq!(
            messages(&run(RequiredFields::new(), pkg.clone())),
            vec![
                "field Name has a valid zero value (\"\") and should be a pointer.",
                "field Count should have the omitempty tag.",
                "field Count has a valid zero value (0), but the validation is not complete (e.g. minimum length). The field should be a pointer to allow the zero value to be set. If the zero value is not a valid use case, complete the validation and remove the pointer.",
            ]
        );

        let ignore = RequiredFieldsConfig {
            omitempty: OmitEmptyPolicy::Ignore,
            ..RequiredFieldsConfig::default()
        };
        assert_eq!(run(RequiredFields::new().config(ignore), pkg).len(), 2);
    }
}
