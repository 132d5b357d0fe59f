//! Rule requiring length limits on strings and lists.
//!
//! # Rationale
//!
//! Unbounded strings and lists make the cost of validating an object
//! unbounded as well. Enumerations are already bounded by their values.
//!
//! Markers count whether written on the field or on a named type the
//! field uses.

use kube_api_lint_core::markers::known;
use kube_api_lint_core::typegraph::BasicKind;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, MarkerSet, Rule, TypeDescriptor, TypeKind};

/// Rule code for max-length.
pub const CODE: &str = "KAL012";

/// Rule name for max-length.
pub const NAME: &str = "max-length";

/// Requires `MaxLength` on strings and `MaxItems` on lists.
#[derive(Debug, Clone, Default)]
pub struct MaxLength;

impl MaxLength {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_enum(markers: &MarkerSet) -> bool {
    markers.has_any(known::ENUM_SPELLINGS)
}

impl Rule for MaxLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Strings and lists must declare a maximum length"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let desc = ctx.describe();
        let markers = ctx.effective_markers();
        let mut problems = Vec::new();

        if desc.is_string() {
            if !is_enum(&markers) && !markers.has(known::MAX_LENGTH) {
                problems.push("must have a maximum length, add kubebuilder:validation:MaxLength marker");
            }
        } else if desc.kind.is_list() && !is_bytes(&desc) {
            if !markers.has(known::MAX_ITEMS) {
                problems.push("must have a maximum items, add kubebuilder:validation:MaxItems marker");
            }
            if let Some(elem) = desc.elem.as_deref().filter(|e| e.is_string()) {
                let elem_markers = ctx.package.effective_markers(&MarkerSet::empty(), elem);
                let bounded = markers.has(known::ITEMS_MAX_LENGTH)
                    || markers.has(known::ITEMS_ENUM)
                    || elem_markers.has(known::MAX_LENGTH)
                    || is_enum(&elem_markers);
                if !bounded {
                    problems.push(
                        "array element must have a maximum length, add kubebuilder:validation:items:MaxLength marker",
                    );
                }
            }
        }

        problems
            .into_iter()
            .map(|text| {
                Diagnostic::new(CODE, NAME, ctx.location(), format!("{} {text}", ctx.subject()))
            })
            .collect()
    }
}

fn is_bytes(desc: &TypeDescriptor<'_>) -> bool {
    desc.elem
        .as_deref()
        .is_some_and(|e| e.kind == TypeKind::Basic(BasicKind::Uint8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    #[test]
    fn test_strings_and_lists() {
        let pkg = Package::new("p")
            .with_type(
                TypeDecl::new("Hostname", TypeExpr::named("string"))
                    .at("types.go", 3)
                    .doc(&["// +kubebuilder:validation:MaxLength=253"]),
            )
            .with_type(
                TypeDecl::new("Mode", TypeExpr::named("string"))
                    .at("types.go", 5)
                    .doc(&["// +enum"]),
            )
            .with_type(TypeDecl::structure(
                "WidgetSpec",
                vec![
                    FieldDecl::new("Name", TypeExpr::named("string")).at("types.go", 10),
                    FieldDecl::new("Host", TypeExpr::named("Hostname")).at("types.go", 11),
                    FieldDecl::new("Mode", TypeExpr::named("Mode")).at("types.go", 12),
                    FieldDecl::new("Tags", TypeExpr::slice(TypeExpr::named("string"))).at("types.go", 13),
                    FieldDecl::new("Hosts", TypeExpr::slice(TypeExpr::named("Hostname")))
                        .at("types.go", 16)
                        .doc(&["// +kubebuilder:validation:MaxItems=8"]),
                    FieldDecl::new("Data", TypeExpr::slice(TypeExpr::named("byte"))).at("types.go", 17),
                    FieldDecl::new("Labels", TypeExpr::slice(TypeExpr::named("string")))
                        .at("types.go", 21)
                        .doc(&[
                            "// +kubebuilder:validation:MaxItems=8",
                            "// +kubebuilder:validation:items:MaxLength=63",
                        ]),
                ],
            ));
        let diagnostics = run(MaxLength::new(), pkg);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "field Name must have a maximum length, add kubebuilder:validation:MaxLength marker",
                "field Tags must have a maximum items, add kubebuilder:validation:MaxItems marker",
                "field Tags array element must have a maximum length, add kubebuilder:validation:items:MaxLength marker",
            ]
        );
    }
}
