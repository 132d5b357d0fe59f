//! Rule reporting lists of structs with no required member.
//!
//! # Rationale
//!
//! When every member of a list item is optional, `- {}` is a valid item
//! and YAML indentation mistakes produce items that validate but mean
//! nothing.

use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule, TypeKind};

/// Rule code for array-of-struct.
pub const CODE: &str = "KAL024";

/// Rule name for array-of-struct.
pub const NAME: &str = "array-of-struct";

/// Requires list element structs to have at least one required member.
#[derive(Debug, Clone, Default)]
pub struct ArrayOfStruct;

impl ArrayOfStruct {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ArrayOfStruct {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "List items must have at least one required field"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let desc = ctx.describe();
        if !desc.kind.is_list() {
            return Vec::new();
        }
        let Some(elem) = desc.elem.as_deref() else {
            return Vec::new();
        };
        if elem.kind != TypeKind::Struct || elem.well_known.is_some() {
            return Vec::new();
        }
        let Some(members) = elem.struct_fields().filter(|f| !f.is_empty()) else {
            return Vec::new();
        };
        if members
            .iter()
            .any(|member| ctx.package.field_markers(member).is_required())
        {
            return Vec::new();
        }

        vec![Diagnostic::new(
            CODE,
            NAME,
            ctx.location(),
            format!(
                "{}.{} is an array of structs, but the struct has no required fields. At least one field should be marked as required to prevent ambiguous YAML configurations",
                ctx.decl.owner().name,
                ctx.name()
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    #[test]
    fn test_struct_elements() {
        let string = || TypeExpr::named("string");
        let pkg = Package::new("p")
            .with_type(TypeDecl::structure(
                "Port",
                vec![FieldDecl::new("Name", string()).doc(&["// +optional"])],
            ))
            .with_type(TypeDecl::structure(
                "Volume",
                vec![FieldDecl::new("Name", string()).doc(&["// +required"])],
            ))
            .with_type(TypeDecl::structure(
                "WidgetSpec",
                vec![
                    FieldDecl::new("Ports", TypeExpr::slice(TypeExpr::named("Port"))).at("types.go", 10),
                    FieldDecl::new("Volumes", TypeExpr::slice(TypeExpr::named("Volume"))).at("types.go", 11),
                    FieldDecl::new("Names", TypeExpr::slice(string())).at("types.go", 12),
                    FieldDecl::new(
                        "Inline",
                        TypeExpr::slice(TypeExpr::structure(vec![FieldDecl::new("Key", string())])),
                    )
                    .at("types.go", 13),
                ],
            ));
        assert_eq!(
            messages(&run(ArrayOfStruct::new(), pkg)),
            vec![
                "WidgetSpec.Ports is an array of structs, but the struct has no required fields. At least one field should be marked as required to prevent ambiguous YAML configurations",
                "WidgetSpec.Inline is an array of structs, but the struct has no required fields. At least one field should be marked as required to prevent ambiguous YAML configurations",
            ]
        );
    }
}
