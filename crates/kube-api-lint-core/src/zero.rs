//! Zero-value analysis.
//!
//! Decides whether the zero value of a field's type satisfies the
//! validation markers that apply to it, and whether those markers are
//! enough to tell "unset" from "set to zero" without a pointer.
//!
//! Structs are analyzed member by member. A struct already on the current
//! path is a cut point: it is reported valid and complete, and analysis
//! does not descend into it again.

use crate::context::PackageContext;
use crate::markers::{known, unquote, MarkerSet};
use crate::source::{FieldDecl, TypeDecl};
use crate::tags::JsonTag;
use crate::typegraph::{BasicKind, TypeDescriptor, TypeKind};
use regex::Regex;
use std::fmt;

/// Whether the zero value passes validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// The zero value is accepted.
    Valid,
    /// Some marker rejects the zero value.
    Invalid,
}

/// Whether the markers settle the question on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// The markers fully determine whether the zero value is acceptable.
    Complete,
    /// Without more markers, "unset" and "zero" are indistinguishable.
    Incomplete,
}

/// Result of analyzing one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroValue {
    /// Validity of the zero value.
    pub validity: Validity,
    /// Completeness of the validation.
    pub completeness: Completeness,
    /// The zero value as it serializes, e.g. `""` or `{}`.
    pub literal: &'static str,
}

impl ZeroValue {
    fn from_checks(checks: Checks, literal: &'static str) -> Self {
        let validity = if checks.invalid {
            Validity::Invalid
        } else {
            Validity::Valid
        };
        let completeness = if checks.invalid || checks.complete {
            Completeness::Complete
        } else {
            Completeness::Incomplete
        };
        Self {
            validity,
            completeness,
            literal,
        }
    }

    /// Zero value passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// Validation is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }
}

impl fmt::Display for ZeroValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validity = if self.is_valid() { "valid" } else { "invalid" };
        let completeness = if self.is_complete() {
            "complete"
        } else {
            "incomplete"
        };
        write!(f, "{} ({validity}, {completeness})", self.literal)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Checks {
    invalid: bool,
    complete: bool,
}

impl Checks {
    fn reject_if(&mut self, rejected: bool) {
        self.invalid |= rejected;
    }
}

#[derive(Debug, Default)]
struct Members {
    invalid: bool,
    emitted: usize,
}

/// Computes zero-value semantics over one package.
pub struct ZeroValueAnalyzer<'c, 'a> {
    ctx: &'c PackageContext<'a>,
}

impl<'c, 'a> ZeroValueAnalyzer<'c, 'a> {
    /// Creates an analyzer over a package context.
    #[must_use]
    pub fn new(ctx: &'c PackageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Analyzes a field's type, looking through pointers.
    ///
    /// Returns `None` when the type cannot be resolved.
    #[must_use]
    pub fn analyze_field(&self, field: &'a FieldDecl) -> Option<ZeroValue> {
        let desc = self.ctx.describe(&field.ty);
        let markers = self
            .ctx
            .effective_markers(self.ctx.field_markers(field), &desc);
        self.analyze(&desc, &markers, &mut Vec::new())
    }

    /// Analyzes a type declaration with its own markers.
    #[must_use]
    pub fn analyze_type(&self, decl: &'a TypeDecl) -> Option<ZeroValue> {
        let desc = self.ctx.describe(&decl.expr);
        let markers = self
            .ctx
            .effective_markers(self.ctx.type_markers(&decl.name), &desc);
        self.analyze(&desc, &markers, &mut Vec::new())
    }

    fn analyze(
        &self,
        desc: &TypeDescriptor<'a>,
        markers: &MarkerSet,
        visiting: &mut Vec<usize>,
    ) -> Option<ZeroValue> {
        match desc.kind {
            TypeKind::Basic(BasicKind::String) => Some(self.string_zero(desc, markers)),
            TypeKind::Basic(BasicKind::Bool) => Some(ZeroValue::from_checks(Checks::default(), "false")),
            TypeKind::Basic(basic) if basic.is_integer() || basic.is_float() => {
                Some(number_zero(markers))
            }
            TypeKind::Basic(_) => Some(ZeroValue::from_checks(Checks::default(), "0")),
            TypeKind::Slice | TypeKind::Array => Some(bound_zero(markers, known::MIN_ITEMS, "[]")),
            TypeKind::Map => Some(bound_zero(markers, known::MIN_PROPERTIES, "{}")),
            TypeKind::Struct => self.struct_zero(desc, markers, visiting),
            TypeKind::Interface | TypeKind::Opaque => None,
        }
    }

    fn string_zero(&self, desc: &TypeDescriptor<'a>, markers: &MarkerSet) -> ZeroValue {
        let mut checks = Checks::default();

        if let Some(min) = markers.get_single(known::MIN_LENGTH).and_then(|m| m.numeric_value()) {
            checks.complete = true;
            checks.reject_if(min > 0.0);
        }

        if let Some(pattern) = markers.get_single(known::PATTERN).and_then(|m| m.unquoted_value()) {
            if let Ok(re) = Regex::new(pattern) {
                checks.complete = true;
                checks.reject_if(!re.is_match(""));
            }
        }

        if let Some(values) = self.enum_members(desc, markers) {
            checks.complete = true;
            checks.reject_if(!values.iter().any(String::is_empty));
        }

        ZeroValue::from_checks(checks, "\"\"")
    }

    /// Allowed values: the explicit enum list, or the constants declared
    /// with the named type when an enum marker has no list.
    fn enum_members(&self, desc: &TypeDescriptor<'a>, markers: &MarkerSet) -> Option<Vec<String>> {
        if let Some(list) = markers
            .get_single(known::KUBEBUILDER_ENUM)
            .and_then(|m| m.unquoted_value())
        {
            return Some(list.split(';').map(|v| unquote(v).to_string()).collect());
        }
        if !markers.has_any(known::ENUM_SPELLINGS) {
            return None;
        }
        let values: Vec<String> = desc
            .named
            .iter()
            .flat_map(|name| self.ctx.enum_values(name))
            .map(|c| c.value.to_string())
            .collect();
        (!values.is_empty()).then_some(values)
    }

    fn struct_zero(
        &self,
        desc: &TypeDescriptor<'a>,
        markers: &MarkerSet,
        visiting: &mut Vec<usize>,
    ) -> Option<ZeroValue> {
        let mut checks = Checks::default();
        let min_properties = markers
            .get_single(known::MIN_PROPERTIES)
            .and_then(|m| m.numeric_value());

        if desc.well_known.is_some() {
            checks.complete = min_properties.is_some();
            return Some(ZeroValue::from_checks(checks, "{}"));
        }

        let fields = desc.struct_fields()?;
        let identity = std::ptr::from_ref(desc.underlying) as usize;
        if visiting.contains(&identity) {
            checks.complete = true;
            return Some(ZeroValue::from_checks(checks, "{}"));
        }

        visiting.push(identity);
        let mut members = Members::default();
        self.members(fields, visiting, &mut members);
        visiting.pop();

        checks.reject_if(members.invalid);
        if let Some(min) = min_properties {
            #[allow(clippy::cast_precision_loss)]
            let emitted = members.emitted as f64;
            checks.complete = true;
            checks.reject_if(emitted < min);
        }
        Some(ZeroValue::from_checks(checks, "{}"))
    }

    /// Folds the members of a zero struct: which are emitted and whether
    /// any of them is invalid or required without a default.
    fn members(&self, fields: &'a [FieldDecl], visiting: &mut Vec<usize>, acc: &mut Members) {
        for member in fields {
            let tag = JsonTag::of(member);
            if tag.as_ref().is_some_and(JsonTag::ignored) {
                continue;
            }
            let desc = self.ctx.describe(&member.ty);
            let own = self.ctx.field_markers(member);

            let inline = member.embedded && tag.as_ref().map_or(true, |t| t.inline() || t.name.is_empty());
            if inline {
                if let Some(embedded) = desc.struct_fields() {
                    let identity = std::ptr::from_ref(desc.underlying) as usize;
                    if !visiting.contains(&identity) {
                        visiting.push(identity);
                        self.members(embedded, visiting, acc);
                        visiting.pop();
                    }
                    continue;
                }
            }

            // A zero struct never carries a caller-set required member.
            if own.is_required() && !own.has_default() {
                acc.invalid = true;
            }
            if omitted_when_zero(&desc, tag.as_ref()) {
                continue;
            }

            acc.emitted += 1;
            let markers = self.ctx.effective_markers(own, &desc);
            if let Some(zero) = self.analyze(&desc, &markers, visiting) {
                acc.invalid |= !zero.is_valid();
            }
        }
    }
}

/// Whether encoding leaves the member out when it holds its zero value.
#[must_use]
pub fn omitted_when_zero(desc: &TypeDescriptor<'_>, tag: Option<&JsonTag>) -> bool {
    let Some(tag) = tag else { return false };
    if tag.omit_zero() {
        return true;
    }
    tag.omit_empty() && (desc.pointer || desc.kind != TypeKind::Struct)
}

fn number_zero(markers: &MarkerSet) -> ZeroValue {
    let mut checks = Checks::default();
    let flag = |id: &str| {
        markers
            .get_single(id)
            .is_some_and(|m| m.unquoted_value().map_or(true, |v| v == "true"))
    };

    let minimum = markers.get_single(known::MINIMUM).and_then(|m| m.numeric_value());
    let maximum = markers.get_single(known::MAXIMUM).and_then(|m| m.numeric_value());
    if let Some(min) = minimum {
        checks.reject_if(min > 0.0 || (min == 0.0 && flag(known::EXCLUSIVE_MINIMUM)));
    }
    if let Some(max) = maximum {
        checks.reject_if(max < 0.0 || (max == 0.0 && flag(known::EXCLUSIVE_MAXIMUM)));
    }
    checks.complete = minimum.is_some() && maximum.is_some();

    if let Some(list) = markers
        .get_single(known::KUBEBUILDER_ENUM)
        .and_then(|m| m.unquoted_value())
    {
        checks.complete = true;
        checks.reject_if(!list.split(';').any(|v| v.trim().parse::<f64>() == Ok(0.0)));
    }

    ZeroValue::from_checks(checks, "0")
}

fn bound_zero(markers: &MarkerSet, minimum_marker: &str, literal: &'static str) -> ZeroValue {
    let mut checks = Checks::default();
    if let Some(min) = markers.get_single(minimum_marker).and_then(|m| m.numeric_value()) {
        checks.complete = true;
        checks.reject_if(min > 0.0);
    }
    ZeroValue::from_checks(checks, literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MarkerCatalog;
    use crate::source::{ConstDecl, Package, TypeExpr};

    fn field_zero(pkg: &Package, type_name: &str, field: &str) -> Option<ZeroValue> {
        let catalog = MarkerCatalog::builtin();
        let ctx = PackageContext::new(pkg, &catalog);
        let decl = pkg.type_decl(type_name).unwrap();
        let member = decl
            .struct_fields()
            .unwrap()
            .iter()
            .find(|f| f.name == field)
            .unwrap();
        ctx.zero_value(member)
    }

    fn type_zero(pkg: &Package, type_name: &str) -> Option<ZeroValue> {
        let catalog = MarkerCatalog::builtin();
        let ctx = PackageContext::new(pkg, &catalog);
        ZeroValueAnalyzer::new(&ctx).analyze_type(pkg.type_decl(type_name).unwrap())
    }

    fn single_field(field: FieldDecl) -> Package {
        Package::new("p").with_type(TypeDecl::structure("T", vec![field]))
    }

    #[test]
    fn unconstrained_string_is_valid_and_incomplete() {
        let pkg = single_field(FieldDecl::new("Name", TypeExpr::named("string")));
        let zero = field_zero(&pkg, "T", "Name").unwrap();
        assert_eq!(zero.validity, Validity::Valid);
        assert_eq!(zero.completeness, Completeness::Incomplete);
        assert_eq!(zero.literal, "\"\"");
    }

    #[test]
    fn min_length_makes_string_invalid() {
        let pkg = single_field(
            FieldDecl::new("Name", TypeExpr::pointer(TypeExpr::named("string")))
                .doc(&["// +kubebuilder:validation:MinLength=1"]),
        );
        let zero = field_zero(&pkg, "T", "Name").unwrap();
        assert!(!zero.is_valid());
        assert!(zero.is_complete());
    }

    #[test]
    fn min_length_zero_is_valid_and_complete() {
        let pkg = single_field(
            FieldDecl::new("Name", TypeExpr::named("string"))
                .doc(&["// +kubebuilder:validation:MinLength=0"]),
        );
        let zero = field_zero(&pkg, "T", "Name").unwrap();
        assert!(zero.is_valid());
        assert!(zero.is_complete());
    }

    #[test]
    fn enum_with_empty_member_is_valid() {
        let pkg = single_field(
            FieldDecl::new("Mode", TypeExpr::named("string"))
                .doc(&[r#"// +kubebuilder:validation:Enum=Fast;Slow;"""#]),
        );
        assert!(field_zero(&pkg, "T", "Mode").unwrap().is_valid());

        let strict = single_field(
            FieldDecl::new("Mode", TypeExpr::named("string"))
                .doc(&["// +kubebuilder:validation:Enum=Fast;Slow"]),
        );
        assert!(!field_zero(&strict, "T", "Mode").unwrap().is_valid());
    }

    #[test]
    fn discovered_enum_constants() {
        let pkg = Package::new("p")
            .with_type(TypeDecl::new("Mode", TypeExpr::named("string")).doc(&["// +enum"]))
            .with_type(TypeDecl::structure(
                "T",
                vec![FieldDecl::new("Mode", TypeExpr::named("Mode"))],
            ))
            .with_const(ConstDecl::string("ModeFast", "Mode", "Fast"));
        let zero = field_zero(&pkg, "T", "Mode").unwrap();
        assert!(!zero.is_valid());
        assert!(zero.is_complete());
    }

    #[test]
    fn pattern_decides_empty_string() {
        let pkg = single_field(
            FieldDecl::new("Name", TypeExpr::named("string"))
                .doc(&["// +kubebuilder:validation:Pattern=`^[a-z]*$`"]),
        );
        assert!(field_zero(&pkg, "T", "Name").unwrap().is_valid());

        let strict = single_field(
            FieldDecl::new("Name", TypeExpr::named("string"))
                .doc(&["// +kubebuilder:validation:Pattern=`^[a-z]+$`"]),
        );
        assert!(!field_zero(&strict, "T", "Name").unwrap().is_valid());
    }

    #[test]
    fn numeric_bounds() {
        let positive = single_field(
            FieldDecl::new("Count", TypeExpr::named("int32"))
                .doc(&["// +kubebuilder:validation:Minimum=1"]),
        );
        let zero = field_zero(&positive, "T", "Count").unwrap();
        assert!(!zero.is_valid());
        assert!(zero.is_complete());

        let only_max = single_field(
            FieldDecl::new("Count", TypeExpr::named("int32"))
                .doc(&["// +kubebuilder:validation:Maximum=10"]),
        );
        let zero = field_zero(&only_max, "T", "Count").unwrap();
        assert!(zero.is_valid());
        assert!(!zero.is_complete());

        let both = single_field(FieldDecl::new("Count", TypeExpr::named("int64")).doc(&[
            "// +kubebuilder:validation:Minimum=0",
            "// +kubebuilder:validation:Maximum=10",
        ]));
        let zero = field_zero(&both, "T", "Count").unwrap();
        assert!(zero.is_valid());
        assert!(zero.is_complete());
    }

    #[test]
    fn exclusive_minimum_zero() {
        let pkg = single_field(FieldDecl::new("Count", TypeExpr::named("int32")).doc(&[
            "// +kubebuilder:validation:Minimum=0",
            "// +kubebuilder:validation:ExclusiveMinimum=true",
        ]));
        assert!(!field_zero(&pkg, "T", "Count").unwrap().is_valid());
    }

    #[test]
    fn collections_use_min_items_and_properties() {
        let list = single_field(
            FieldDecl::new("Items", TypeExpr::slice(TypeExpr::named("string")))
                .doc(&["// +kubebuilder:validation:MinItems=1"]),
        );
        let zero = field_zero(&list, "T", "Items").unwrap();
        assert!(!zero.is_valid());
        assert_eq!(zero.literal, "[]");

        let map = single_field(FieldDecl::new(
            "Labels",
            TypeExpr::map(TypeExpr::named("string"), TypeExpr::named("string")),
        ));
        let zero = field_zero(&map, "T", "Labels").unwrap();
        assert!(zero.is_valid());
        assert!(!zero.is_complete());
    }

    #[test]
    fn all_optional_struct_is_valid_incomplete() {
        let pkg = Package::new("p")
            .with_type(TypeDecl::structure(
                "Spec",
                vec![
                    FieldDecl::new("Name", TypeExpr::named("string"))
                        .json("name,omitempty")
                        .doc(&["// +optional"]),
                    FieldDecl::new("Count", TypeExpr::pointer(TypeExpr::named("int32")))
                        .json("count,omitempty")
                        .doc(&["// +optional"]),
                ],
            ));
        let zero = type_zero(&pkg, "Spec").unwrap();
        assert_eq!(zero.validity, Validity::Valid);
        assert_eq!(zero.completeness, Completeness::Incomplete);
    }

    #[test]
    fn required_member_invalidates_struct() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Spec",
            vec![
                FieldDecl::new("Name", TypeExpr::named("string"))
                    .json("name,omitempty")
                    .doc(&["// +required"]),
                FieldDecl::new("Count", TypeExpr::pointer(TypeExpr::named("int32")))
                    .json("count,omitempty")
                    .doc(&["// +optional"]),
            ],
        ));
        let zero = type_zero(&pkg, "Spec").unwrap();
        assert_eq!(zero.validity, Validity::Invalid);
        assert_eq!(zero.completeness, Completeness::Complete);
    }

    #[test]
    fn untagged_required_member_invalidates_struct() {
        let spec = |name_doc: &[&str]| {
            Package::new("p").with_type(TypeDecl::structure(
                "Spec",
                vec![
                    FieldDecl::new("Name", TypeExpr::named("string")).doc(name_doc),
                    FieldDecl::new("Mode", TypeExpr::named("string")).doc(&["// +optional"]),
                ],
            ))
        };

        let optional = type_zero(&spec(&["// +optional"]), "Spec").unwrap();
        assert_eq!(optional.validity, Validity::Valid);
        assert_eq!(optional.completeness, Completeness::Incomplete);

        let required = type_zero(&spec(&["// +required"]), "Spec").unwrap();
        assert_eq!(required.validity, Validity::Invalid);
    }

    #[test]
    fn required_member_with_default_keeps_struct_valid() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Spec",
            vec![FieldDecl::new("Name", TypeExpr::named("string"))
                .json("name,omitempty")
                .doc(&["// +required", "// +kubebuilder:default:=\"a\""])],
        ));
        assert!(type_zero(&pkg, "Spec").unwrap().is_valid());
    }

    #[test]
    fn emitted_invalid_member_invalidates_struct() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Spec",
            vec![FieldDecl::new("Name", TypeExpr::named("string"))
                .json("name")
                .doc(&["// +optional", "// +kubebuilder:validation:MinLength=1"])],
        ));
        assert!(!type_zero(&pkg, "Spec").unwrap().is_valid());
    }

    #[test]
    fn min_properties_counts_emitted_members() {
        let pkg = Package::new("p").with_type(
            TypeDecl::structure(
                "Spec",
                vec![FieldDecl::new("Name", TypeExpr::named("string"))
                    .json("name,omitempty")
                    .doc(&["// +optional"])],
            )
            .doc(&["// +kubebuilder:validation:MinProperties=1"]),
        );
        let zero = type_zero(&pkg, "Spec").unwrap();
        assert!(!zero.is_valid());

        let emitted = Package::new("p").with_type(
            TypeDecl::structure(
                "Spec",
                vec![FieldDecl::new("Name", TypeExpr::named("string"))
                    .json("name")
                    .doc(&["// +optional"])],
            )
            .doc(&["// +kubebuilder:validation:MinProperties=1"]),
        );
        let zero = type_zero(&emitted, "Spec").unwrap();
        assert!(zero.is_valid());
        assert!(zero.is_complete());
    }

    #[test]
    fn self_referential_struct_terminates() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Node",
            vec![
                FieldDecl::new("Value", TypeExpr::named("string"))
                    .json("value,omitempty")
                    .doc(&["// +optional"]),
                FieldDecl::new("Next", TypeExpr::pointer(TypeExpr::named("Node")))
                    .json("next")
                    .doc(&["// +optional"]),
            ],
        ));
        let zero = type_zero(&pkg, "Node").unwrap();
        assert!(zero.is_valid());

        let next = field_zero(&pkg, "Node", "Next").unwrap();
        assert!(next.is_valid());
    }

    #[test]
    fn mutually_recursive_structs_terminate() {
        let pkg = Package::new("p")
            .with_type(TypeDecl::structure(
                "A",
                vec![FieldDecl::new("B", TypeExpr::named("B")).json("b")],
            ))
            .with_type(TypeDecl::structure(
                "B",
                vec![FieldDecl::new("A", TypeExpr::named("A")).json("a")],
            ));
        let zero = type_zero(&pkg, "A").unwrap();
        assert_eq!(zero.validity, Validity::Valid);
    }

    #[test]
    fn recursive_edge_is_valid_and_complete() {
        let pkg = Package::new("p").with_type(TypeDecl::structure(
            "Node",
            vec![FieldDecl::new("Next", TypeExpr::pointer(TypeExpr::named("Node"))).json("next")],
        ));
        let catalog = MarkerCatalog::builtin();
        let ctx = PackageContext::new(&pkg, &catalog);
        let analyzer = ZeroValueAnalyzer::new(&ctx);
        let node = pkg.type_decl("Node").unwrap();
        let desc = ctx.describe(&node.expr);
        let mut visiting = vec![std::ptr::from_ref(desc.underlying) as usize];
        let edge = analyzer
            .analyze(&desc, &MarkerSet::empty(), &mut visiting)
            .unwrap();
        assert_eq!(edge.validity, Validity::Valid);
        assert_eq!(edge.completeness, Completeness::Complete);
    }

    #[test]
    fn opaque_types_are_skipped() {
        let pkg = single_field(FieldDecl::new("Spec", TypeExpr::external("corev1", "PodSpec")));
        assert!(field_zero(&pkg, "T", "Spec").is_none());
    }

    #[test]
    fn omitted_when_zero_rules() {
        let pkg = Package::new("p").with_type(TypeDecl::structure("S", vec![]));
        let graph = crate::typegraph::TypeGraph::new(&pkg);
        let string = TypeExpr::named("string");
        let structure = TypeExpr::named("S");
        let pointer = TypeExpr::pointer(TypeExpr::named("S"));
        let omitempty = JsonTag::parse("x,omitempty");
        let omitzero = JsonTag::parse("x,omitzero");

        assert!(omitted_when_zero(&graph.describe(&string), Some(&omitempty)));
        assert!(!omitted_when_zero(&graph.describe(&structure), Some(&omitempty)));
        assert!(omitted_when_zero(&graph.describe(&structure), Some(&omitzero)));
        assert!(omitted_when_zero(&graph.describe(&pointer), Some(&omitempty)));
        assert!(!omitted_when_zero(&graph.describe(&string), None));
    }
}
