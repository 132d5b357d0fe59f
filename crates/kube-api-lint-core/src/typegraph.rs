//! Type-graph walker.
//!
//! Resolves a type expression through pointer and named-type layers to a
//! normalized [`TypeDescriptor`]. Named types of the package are resolved
//! once when the graph is built; afterwards the graph is read-only and can
//! be shared between worker threads.

use crate::catalog::SchemaKind;
use crate::source::{Package, TypeDecl, TypeExpr};
use std::collections::HashMap;
use std::fmt;

/// Builtin scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    /// `string`
    String,
    /// `bool`
    Bool,
    /// `int` (platform width)
    Int,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32` / `rune`
    Int32,
    /// `int64`
    Int64,
    /// `uint`
    Uint,
    /// `uint8` / `byte`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `uintptr`
    Uintptr,
    /// `float32`
    Float32,
    /// `float64`
    Float64,
    /// `complex64`
    Complex64,
    /// `complex128`
    Complex128,
}

impl BasicKind {
    /// Maps a builtin type name to its kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" => Self::String,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" | "rune" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" | "byte" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "uintptr" => Self::Uintptr,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            _ => return None,
        })
    }

    /// The builtin's name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }

    /// Signed or unsigned integer.
    #[must_use]
    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned()
    }

    /// Signed integer.
    #[must_use]
    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Unsigned integer.
    #[must_use]
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 | Self::Uintptr
        )
    }

    /// Floating point or complex.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(
            self,
            Self::Float32 | Self::Float64 | Self::Complex64 | Self::Complex128
        )
    }

    /// Rendered zero value.
    #[must_use]
    pub fn zero_literal(self) -> &'static str {
        match self {
            Self::String => "\"\"",
            Self::Bool => "false",
            _ => "0",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Well-known types from other packages with fixed semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    /// `metav1.Time`
    Time,
    /// `metav1.Duration`
    Duration,
    /// `metav1.Condition`
    Condition,
    /// `metav1.ObjectMeta`
    ObjectMeta,
    /// `metav1.TypeMeta`
    TypeMeta,
    /// `metav1.ListMeta`
    ListMeta,
    /// `resource.Quantity`
    Quantity,
    /// `intstr.IntOrString`
    IntOrString,
    /// `runtime.RawExtension`
    RawExtension,
}

impl WellKnown {
    /// Identifies a package-qualified type name.
    #[must_use]
    pub fn lookup(package: &str, name: &str) -> Option<Self> {
        Some(match (package, name) {
            ("metav1", "Time") => Self::Time,
            ("metav1", "Duration") => Self::Duration,
            ("metav1", "Condition") => Self::Condition,
            ("metav1", "ObjectMeta") => Self::ObjectMeta,
            ("metav1", "TypeMeta") => Self::TypeMeta,
            ("metav1", "ListMeta") => Self::ListMeta,
            ("resource", "Quantity") => Self::Quantity,
            ("intstr", "IntOrString") => Self::IntOrString,
            ("runtime", "RawExtension") => Self::RawExtension,
            _ => return None,
        })
    }

    /// Serialized schema kind, when it is a single one.
    #[must_use]
    pub fn schema_kind(self) -> Option<SchemaKind> {
        match self {
            Self::Time | Self::Duration => Some(SchemaKind::String),
            Self::Quantity | Self::IntOrString => None,
            _ => Some(SchemaKind::Object),
        }
    }
}

/// Normalized kind of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A builtin scalar.
    Basic(BasicKind),
    /// A struct (package-local or well-known external).
    Struct,
    /// `[]T`
    Slice,
    /// `[N]T`
    Array,
    /// `map[K]V`
    Map,
    /// Any interface type.
    Interface,
    /// Could not be resolved: an unknown external type, a type parameter
    /// or a named-type cycle. Rules skip these.
    Opaque,
}

impl TypeKind {
    /// `[]T` or `[N]T`
    #[must_use]
    pub fn is_list(self) -> bool {
        matches!(self, Self::Slice | Self::Array)
    }

    /// Slice, array or map.
    #[must_use]
    pub fn is_collection(self) -> bool {
        matches!(self, Self::Slice | Self::Array | Self::Map)
    }

    /// Returns the basic kind, if this is one.
    #[must_use]
    pub fn basic(self) -> Option<BasicKind> {
        match self {
            Self::Basic(kind) => Some(kind),
            _ => None,
        }
    }
}

/// A resolved view of a type expression.
#[derive(Debug, Clone)]
pub struct TypeDescriptor<'a> {
    /// Kind after resolution.
    pub kind: TypeKind,
    /// A pointer layer was crossed.
    pub pointer: bool,
    /// Package-local named types crossed, outermost first.
    pub named: Vec<&'a str>,
    /// At least one crossed named type was an alias.
    pub through_alias: bool,
    /// The expression the kind was read from (struct literal, slice, map, ...).
    pub underlying: &'a TypeExpr,
    /// The well-known external type, if resolution ended at one.
    pub well_known: Option<WellKnown>,
    /// Element (slice, array, map value), resolved one level.
    pub elem: Option<Box<TypeDescriptor<'a>>>,
    /// Map key, resolved one level.
    pub key: Option<Box<TypeDescriptor<'a>>>,
}

impl<'a> TypeDescriptor<'a> {
    /// The innermost named type crossed (the one declaring the underlying type).
    #[must_use]
    pub fn declaring_type(&self) -> Option<&'a str> {
        self.named.last().copied()
    }

    /// The outermost named type crossed (as written at the usage site).
    #[must_use]
    pub fn named_type(&self) -> Option<&'a str> {
        self.named.first().copied()
    }

    /// Returns true for builtin strings.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind == TypeKind::Basic(BasicKind::String)
    }

    /// Struct members, when the underlying expression is a struct literal.
    #[must_use]
    pub fn struct_fields(&self) -> Option<&'a [crate::source::FieldDecl]> {
        match self.underlying {
            TypeExpr::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// Schema kind as seen by validation markers.
    #[must_use]
    pub fn schema_kind(&self) -> Option<SchemaKind> {
        if let Some(well_known) = self.well_known {
            return well_known.schema_kind();
        }
        match self.kind {
            TypeKind::Basic(BasicKind::String) => Some(SchemaKind::String),
            TypeKind::Basic(BasicKind::Bool) => Some(SchemaKind::Boolean),
            TypeKind::Basic(b) if b.is_integer() => Some(SchemaKind::Integer),
            TypeKind::Basic(_) => Some(SchemaKind::Number),
            TypeKind::Slice | TypeKind::Array => {
                // []byte serializes as a base64 string.
                let bytes = self
                    .elem
                    .as_ref()
                    .is_some_and(|e| e.kind == TypeKind::Basic(BasicKind::Uint8) && e.named.is_empty());
                Some(if bytes { SchemaKind::String } else { SchemaKind::Array })
            }
            TypeKind::Map | TypeKind::Struct => Some(SchemaKind::Object),
            TypeKind::Interface | TypeKind::Opaque => None,
        }
    }

    /// Describes the type for messages: `string`, `Foo (string)`, `[]Bar`.
    #[must_use]
    pub fn describe(&self) -> String {
        match (self.named_type(), self.kind) {
            (Some(name), TypeKind::Basic(b)) => format!("{name} ({b})"),
            (Some(name), _) => name.to_string(),
            (None, _) => self.underlying.to_string(),
        }
    }
}

/// Where a leaf sits relative to the declaration being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafRole {
    /// The declared type itself.
    Direct,
    /// Behind a pointer.
    Pointer,
    /// Element of a slice or array.
    ArrayElement,
    /// Key of a map.
    MapKey,
    /// Value of a map.
    MapValue,
}

impl LeafRole {
    /// Phrase inserted after the declaration name in messages.
    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            Self::Direct => "",
            Self::Pointer => " pointer",
            Self::ArrayElement => " array element",
            Self::MapKey => " map key",
            Self::MapValue => " map value",
        }
    }
}

/// A node reached by [`TypeGraph::walk_leaves`].
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a> {
    /// Position relative to the declaration.
    pub role: LeafRole,
    /// The node's kind: a builtin, or [`TypeKind::Map`] for map nodes.
    pub kind: TypeKind,
    /// The node's expression.
    pub expr: &'a TypeExpr,
}

#[derive(Debug, Clone)]
enum Resolution<'a> {
    Resolved {
        target: &'a TypeExpr,
        chain: Vec<&'a str>,
        alias: bool,
        pointer: bool,
    },
    Cycle,
}

/// Named-type resolution cache for one package.
#[derive(Debug)]
pub struct TypeGraph<'a> {
    types: HashMap<&'a str, &'a TypeDecl>,
    resolved: HashMap<&'a str, Resolution<'a>>,
}

impl<'a> TypeGraph<'a> {
    /// Builds the graph, resolving every named type of the package.
    #[must_use]
    pub fn new(package: &'a Package) -> Self {
        let types: HashMap<&'a str, &'a TypeDecl> =
            package.types.iter().map(|t| (t.name.as_str(), t)).collect();
        let mut graph = Self {
            types,
            resolved: HashMap::new(),
        };
        for decl in &package.types {
            let resolution = graph.resolve_chain(decl);
            graph.resolved.insert(decl.name.as_str(), resolution);
        }
        graph
    }

    /// Follows `type A B`, `type B = *C`, ... until the right-hand side is
    /// not a package-local named type. Revisiting a name is a cycle.
    fn resolve_chain(&self, start: &'a TypeDecl) -> Resolution<'a> {
        let mut chain = vec![start.name.as_str()];
        let mut alias = start.alias;
        let mut pointer = false;
        let mut expr = &start.expr;
        loop {
            match expr {
                TypeExpr::Pointer { elem } => {
                    pointer = true;
                    expr = &**elem;
                }
                TypeExpr::Named {
                    name,
                    package: None,
                } if BasicKind::from_name(name).is_none() => {
                    let Some(&next) = self.types.get(name.as_str()) else {
                        break;
                    };
                    if chain.contains(&next.name.as_str()) {
                        return Resolution::Cycle;
                    }
                    chain.push(next.name.as_str());
                    alias |= next.alias;
                    expr = &next.expr;
                }
                _ => break,
            }
        }
        Resolution::Resolved {
            target: expr,
            chain,
            alias,
            pointer,
        }
    }

    /// Looks up a package-local type declaration.
    #[must_use]
    pub fn type_decl(&self, name: &str) -> Option<&'a TypeDecl> {
        self.types.get(name).copied()
    }

    /// Resolves a type expression, describing its elements one level deep.
    #[must_use]
    pub fn describe(&self, expr: &'a TypeExpr) -> TypeDescriptor<'a> {
        let mut desc = self.describe_shallow(expr);
        match desc.underlying {
            TypeExpr::Slice { elem } | TypeExpr::Array { elem, .. } => {
                desc.elem = Some(Box::new(self.describe_shallow(elem)));
            }
            TypeExpr::Map { key, value } => {
                desc.key = Some(Box::new(self.describe_shallow(key)));
                desc.elem = Some(Box::new(self.describe_shallow(value)));
            }
            _ => {}
        }
        desc
    }

    fn describe_shallow(&self, expr: &'a TypeExpr) -> TypeDescriptor<'a> {
        let mut desc = TypeDescriptor {
            kind: TypeKind::Opaque,
            pointer: false,
            named: Vec::new(),
            through_alias: false,
            underlying: expr,
            well_known: None,
            elem: None,
            key: None,
        };

        let mut current = expr;
        while let TypeExpr::Pointer { elem } = current {
            desc.pointer = true;
            current = &**elem;
        }

        if let TypeExpr::Named {
            name,
            package: None,
        } = current
        {
            if let Some(resolution) = self.resolved.get(name.as_str()) {
                match resolution {
                    Resolution::Cycle => {
                        desc.named.push(name.as_str());
                        return desc;
                    }
                    Resolution::Resolved {
                        target,
                        chain,
                        alias,
                        pointer,
                    } => {
                        desc.named.extend(chain.iter().copied());
                        desc.through_alias = *alias;
                        desc.pointer |= *pointer;
                        current = *target;
                    }
                }
            }
        }

        desc.underlying = current;
        desc.kind = match current {
            TypeExpr::Named {
                name,
                package: None,
            } => match BasicKind::from_name(name) {
                Some(basic) => TypeKind::Basic(basic),
                None if name == "any" || name == "error" => TypeKind::Interface,
                None => TypeKind::Opaque,
            },
            TypeExpr::Named {
                name,
                package: Some(pkg),
            } => match WellKnown::lookup(pkg, name) {
                Some(well_known) => {
                    desc.well_known = Some(well_known);
                    TypeKind::Struct
                }
                None => TypeKind::Opaque,
            },
            TypeExpr::Struct { .. } => TypeKind::Struct,
            TypeExpr::Slice { .. } => TypeKind::Slice,
            TypeExpr::Array { .. } => TypeKind::Array,
            TypeExpr::Map { .. } => TypeKind::Map,
            TypeExpr::Interface => TypeKind::Interface,
            TypeExpr::TypeParam { .. } | TypeExpr::Pointer { .. } => TypeKind::Opaque,
        };
        desc
    }

    /// Visits the builtin leaves and map nodes reachable from an expression
    /// without crossing a named type.
    ///
    /// Package-local named types are not entered: their own declaration is
    /// inspected separately. Struct literals are not entered either, since
    /// their members are declarations of their own.
    pub fn walk_leaves(&self, expr: &'a TypeExpr, visit: &mut impl FnMut(Leaf<'a>)) {
        self.walk(expr, LeafRole::Direct, visit);
    }

    fn walk(&self, expr: &'a TypeExpr, role: LeafRole, visit: &mut impl FnMut(Leaf<'a>)) {
        let nested = |inner: LeafRole| if role == LeafRole::Direct { inner } else { role };
        match expr {
            TypeExpr::Pointer { elem } => self.walk(elem, nested(LeafRole::Pointer), visit),
            TypeExpr::Slice { elem } | TypeExpr::Array { elem, .. } => {
                self.walk(elem, nested(LeafRole::ArrayElement), visit);
            }
            TypeExpr::Map { key, value } => {
                visit(Leaf {
                    role,
                    kind: TypeKind::Map,
                    expr,
                });
                self.walk(key, nested(LeafRole::MapKey), visit);
                self.walk(value, nested(LeafRole::MapValue), visit);
            }
            TypeExpr::Named {
                name,
                package: None,
            } if !self.types.contains_key(name.as_str()) => {
                if let Some(basic) = BasicKind::from_name(name) {
                    visit(Leaf {
                        role,
                        kind: TypeKind::Basic(basic),
                        expr,
                    });
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FieldDecl;

    fn package() -> Package {
        Package::new("example.com/api/v1")
            .with_type(TypeDecl::new("Name", TypeExpr::named("string")))
            .with_type(TypeDecl::new("Alias", TypeExpr::named("Name")).alias())
            .with_type(TypeDecl::new("PtrName", TypeExpr::pointer(TypeExpr::named("Name"))))
            .with_type(TypeDecl::new("Loop", TypeExpr::named("Loop2")))
            .with_type(TypeDecl::new("Loop2", TypeExpr::named("Loop")))
            .with_type(TypeDecl::structure(
                "Widget",
                vec![FieldDecl::new("Name", TypeExpr::named("Name"))],
            ))
            .with_type(TypeDecl::new("Labels", TypeExpr::map(TypeExpr::named("string"), TypeExpr::named("Name"))))
    }

    #[test]
    fn resolves_alias_chain() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let expr = TypeExpr::named("Alias");
        let desc = graph.describe(&expr);
        assert_eq!(desc.kind, TypeKind::Basic(BasicKind::String));
        assert_eq!(desc.named, vec!["Alias", "Name"]);
        assert!(desc.through_alias);
        assert!(!desc.pointer);
        assert_eq!(desc.describe(), "Alias (string)");
    }

    #[test]
    fn records_pointer_layers() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let direct = TypeExpr::pointer(TypeExpr::named("Widget"));
        let desc = graph.describe(&direct);
        assert!(desc.pointer);
        assert_eq!(desc.kind, TypeKind::Struct);
        assert_eq!(desc.struct_fields().map(<[FieldDecl]>::len), Some(1));

        let through_named = TypeExpr::named("PtrName");
        assert!(graph.describe(&through_named).pointer);
    }

    #[test]
    fn cycles_are_opaque() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let expr = TypeExpr::named("Loop");
        assert_eq!(graph.describe(&expr).kind, TypeKind::Opaque);
    }

    #[test]
    fn externals() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let time = TypeExpr::external("metav1", "Time");
        let desc = graph.describe(&time);
        assert_eq!(desc.well_known, Some(WellKnown::Time));
        assert_eq!(desc.schema_kind(), Some(SchemaKind::String));

        let unknown = TypeExpr::external("corev1", "PodSpec");
        assert_eq!(graph.describe(&unknown).kind, TypeKind::Opaque);
    }

    #[test]
    fn map_elements_resolved_one_level() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let expr = TypeExpr::named("Labels");
        let desc = graph.describe(&expr);
        assert_eq!(desc.kind, TypeKind::Map);
        let value = desc.elem.unwrap();
        assert_eq!(value.kind, TypeKind::Basic(BasicKind::String));
        assert_eq!(value.named, vec!["Name"]);
        assert!(value.elem.is_none());
    }

    #[test]
    fn byte_slices_are_strings() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let expr = TypeExpr::slice(TypeExpr::named("byte"));
        assert_eq!(graph.describe(&expr).schema_kind(), Some(SchemaKind::String));
    }

    #[test]
    fn walk_leaves_reports_roles() {
        let pkg = package();
        let graph = TypeGraph::new(&pkg);
        let expr = TypeExpr::map(
            TypeExpr::named("string"),
            TypeExpr::slice(TypeExpr::pointer(TypeExpr::named("bool"))),
        );
        let mut leaves = Vec::new();
        graph.walk_leaves(&expr, &mut |leaf| leaves.push((leaf.role, leaf.kind)));
        assert_eq!(
            leaves,
            vec![
                (LeafRole::Direct, TypeKind::Map),
                (LeafRole::MapKey, TypeKind::Basic(BasicKind::String)),
                (LeafRole::MapValue, TypeKind::Basic(BasicKind::Bool)),
            ]
        );

        let named = TypeExpr::named("Name");
        let mut count = 0;
        graph.walk_leaves(&named, &mut |_| count += 1);
        assert_eq!(count, 0);
    }
}
