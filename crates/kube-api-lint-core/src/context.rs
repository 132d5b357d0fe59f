//! Context types passed to rules.

use crate::catalog::MarkerCatalog;
use crate::markers::MarkerSet;
use crate::source::{ConstDecl, DeclKind, Declaration, FieldDecl, Package, TypeDecl, TypeExpr};
use crate::tags::JsonTag;
use crate::typegraph::{TypeDescriptor, TypeGraph};
use crate::types::Location;
use crate::zero::{ZeroValue, ZeroValueAnalyzer};
use std::collections::HashMap;

static EMPTY_MARKERS: MarkerSet = MarkerSet::empty();

fn field_key(field: &FieldDecl) -> usize {
    std::ptr::from_ref(field) as usize
}

/// Derived, read-only model of one package: marker sets for every
/// declaration and the resolved type graph.
#[derive(Debug)]
pub struct PackageContext<'a> {
    package: &'a Package,
    catalog: &'a MarkerCatalog,
    graph: TypeGraph<'a>,
    type_markers: HashMap<&'a str, MarkerSet>,
    field_markers: HashMap<usize, MarkerSet>,
    declarations: Vec<Declaration<'a>>,
}

impl<'a> PackageContext<'a> {
    /// Parses every doc comment of the package and resolves its type graph.
    #[must_use]
    pub fn new(package: &'a Package, catalog: &'a MarkerCatalog) -> Self {
        let mut ctx = Self {
            package,
            catalog,
            graph: TypeGraph::new(package),
            type_markers: HashMap::new(),
            field_markers: HashMap::new(),
            declarations: Vec::new(),
        };
        for decl in &package.types {
            ctx.type_markers
                .insert(decl.name.as_str(), MarkerSet::from_comments(&decl.doc, catalog));
            ctx.declarations.push(Declaration::Type(decl));
            ctx.collect_fields(decl, &decl.expr);
        }
        ctx
    }

    /// Registers the members of every struct literal reachable from `expr`
    /// without crossing a named type.
    fn collect_fields(&mut self, owner: &'a TypeDecl, expr: &'a TypeExpr) {
        match expr {
            TypeExpr::Struct { fields } => {
                for field in fields {
                    self.field_markers
                        .insert(field_key(field), MarkerSet::from_comments(&field.doc, self.catalog));
                    self.declarations.push(Declaration::Field { owner, field });
                    self.collect_fields(owner, &field.ty);
                }
            }
            TypeExpr::Pointer { elem } | TypeExpr::Slice { elem } | TypeExpr::Array { elem, .. } => {
                self.collect_fields(owner, elem);
            }
            TypeExpr::Map { value, .. } => self.collect_fields(owner, value),
            TypeExpr::Named { .. } | TypeExpr::Interface | TypeExpr::TypeParam { .. } => {}
        }
    }

    /// The package being analyzed.
    #[must_use]
    pub fn package(&self) -> &'a Package {
        self.package
    }

    /// The marker catalog of this run.
    #[must_use]
    pub fn catalog(&self) -> &'a MarkerCatalog {
        self.catalog
    }

    /// The resolved type graph.
    #[must_use]
    pub fn graph(&self) -> &TypeGraph<'a> {
        &self.graph
    }

    /// Every declaration: each type followed by its (nested) fields.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration<'a>] {
        &self.declarations
    }

    /// Markers written directly on a declaration.
    #[must_use]
    pub fn markers(&self, decl: &Declaration<'_>) -> &MarkerSet {
        match decl {
            Declaration::Type(t) => self.type_markers(&t.name),
            Declaration::Field { field, .. } => self.field_markers(field),
        }
    }

    /// Markers written on a named type's declaration.
    #[must_use]
    pub fn type_markers(&self, name: &str) -> &MarkerSet {
        self.type_markers.get(name).unwrap_or(&EMPTY_MARKERS)
    }

    /// Markers written on a field.
    #[must_use]
    pub fn field_markers(&self, field: &FieldDecl) -> &MarkerSet {
        self.field_markers
            .get(&field_key(field))
            .unwrap_or(&EMPTY_MARKERS)
    }

    /// Usage-site markers merged with the markers of every named type the
    /// descriptor crossed (outermost first).
    #[must_use]
    pub fn effective_markers(&self, site: &MarkerSet, desc: &TypeDescriptor<'_>) -> MarkerSet {
        desc.named
            .iter()
            .fold(site.clone(), |acc, name| acc.merged(self.type_markers(name)))
    }

    /// Resolves a type expression.
    #[must_use]
    pub fn describe(&self, expr: &'a TypeExpr) -> TypeDescriptor<'a> {
        self.graph.describe(expr)
    }

    /// Constants declared with the given named type, in source order.
    #[must_use]
    pub fn enum_values(&self, type_name: &str) -> Vec<&'a ConstDecl> {
        self.package
            .constants
            .iter()
            .filter(|c| c.type_name.as_deref() == Some(type_name))
            .collect()
    }

    /// Zero-value analysis of a field's type.
    #[must_use]
    pub fn zero_value(&self, field: &'a FieldDecl) -> Option<ZeroValue> {
        ZeroValueAnalyzer::new(self).analyze_field(field)
    }
}

/// Context for evaluating rules against one declaration.
#[derive(Debug, Clone, Copy)]
pub struct DeclContext<'c, 'a> {
    /// The enclosing package.
    pub package: &'c PackageContext<'a>,
    /// The declaration under analysis.
    pub decl: Declaration<'a>,
    /// Markers written directly on the declaration.
    pub markers: &'c MarkerSet,
}

impl<'c, 'a> DeclContext<'c, 'a> {
    /// Creates a context for one declaration of the package.
    #[must_use]
    pub fn new(package: &'c PackageContext<'a>, decl: Declaration<'a>) -> Self {
        Self {
            package,
            markers: package.markers(&decl),
            decl,
        }
    }

    /// Declaration kind.
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        self.decl.kind()
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.decl.name()
    }

    /// Declaration location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.decl.location().clone()
    }

    /// Subject used in messages: `field Name` or `type Name`.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("{} {}", self.kind(), self.name())
    }

    /// The field, for field declarations.
    #[must_use]
    pub fn field(&self) -> Option<&'a FieldDecl> {
        self.decl.as_field()
    }

    /// The parsed `json` tag, for field declarations.
    #[must_use]
    pub fn json_tag(&self) -> Option<JsonTag> {
        self.field().and_then(JsonTag::of)
    }

    /// The declared type, resolved.
    ///
    /// For type declarations this is the right-hand side, so the
    /// declaration itself is not part of [`TypeDescriptor::named`].
    #[must_use]
    pub fn describe(&self) -> TypeDescriptor<'a> {
        self.package.describe(self.decl.type_expr())
    }

    /// Own markers merged with those of the named types the declared type crosses.
    #[must_use]
    pub fn effective_markers(&self) -> MarkerSet {
        self.package.effective_markers(self.markers, &self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> Package {
        Package::new("example.com/api/v1")
            .with_type(
                TypeDecl::new("Name", TypeExpr::named("string"))
                    .at("types.go", 4)
                    .doc(&["// +kubebuilder:validation:MaxLength=63"]),
            )
            .with_type(
                TypeDecl::structure(
                    "Widget",
                    vec![
                        FieldDecl::new("Name", TypeExpr::named("Name"))
                            .at("types.go", 10)
                            .doc(&["// +optional"]),
                        FieldDecl::new(
                            "Items",
                            TypeExpr::slice(TypeExpr::structure(vec![FieldDecl::new(
                                "Key",
                                TypeExpr::named("string"),
                            )
                            .doc(&["// +required"])])),
                        ),
                    ],
                )
                .at("types.go", 8),
            )
    }

    #[test]
    fn declarations_include_nested_fields() {
        let pkg = package();
        let catalog = MarkerCatalog::builtin();
        let ctx = PackageContext::new(&pkg, &catalog);
        let names: Vec<&str> = ctx.declarations().iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["Name", "Widget", "Name", "Items", "Key"]);

        let key = ctx.declarations()[4];
        assert_eq!(key.owner().name, "Widget");
        assert!(ctx.markers(&key).is_required());
    }

    #[test]
    fn effective_markers_merge_named_types() {
        let pkg = package();
        let catalog = MarkerCatalog::builtin();
        let ctx = PackageContext::new(&pkg, &catalog);
        let field_decl = ctx.declarations()[2];
        let decl = DeclContext::new(&ctx, field_decl);
        assert!(!decl.markers.has("kubebuilder:validation:MaxLength"));
        let effective = decl.effective_markers();
        assert!(effective.has("kubebuilder:validation:MaxLength"));
        assert!(effective.is_optional());
        assert_eq!(decl.subject(), "field Name");
    }
}
