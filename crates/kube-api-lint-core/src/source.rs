//! Declaration snapshot consumed by the analyzer.
//!
//! The host source-parsing collaborator produces these values (usually as
//! JSON). They are immutable for the duration of a run; every rule only
//! ever borrows them.

use crate::types::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw line of a doc comment, including the `//` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentLine {
    /// Raw text of the line (e.g. `// +kubebuilder:validation:MinLength=1`).
    pub text: String,
    /// Where the line starts.
    #[serde(default)]
    pub location: Location,
}

impl CommentLine {
    /// Creates a new comment line.
    #[must_use]
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }

    /// Returns the comment body with the `//` prefix and surrounding
    /// whitespace removed.
    #[must_use]
    pub fn body(&self) -> &str {
        let trimmed = self.text.trim();
        trimmed.strip_prefix("//").unwrap_or(trimmed).trim()
    }
}

/// A raw struct tag literal (contents between the backticks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLiteral {
    /// Raw tag text, e.g. `json:"name,omitempty"`.
    pub raw: String,
    /// Where the literal starts.
    #[serde(default)]
    pub location: Location,
}

/// A type expression as written at a declaration or usage site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    /// A named type: a builtin (`string`), a package-local type, or a
    /// type from another package when `package` is set.
    Named {
        /// Type name without the package qualifier.
        name: String,
        /// Package qualifier (e.g. `metav1`) for external types.
        #[serde(default)]
        package: Option<String>,
    },
    /// `*T`
    Pointer {
        /// Pointee type.
        elem: Box<TypeExpr>,
    },
    /// `[]T`
    Slice {
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `[N]T`
    Array {
        /// Array length.
        len: usize,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        /// Key type.
        key: Box<TypeExpr>,
        /// Value type.
        value: Box<TypeExpr>,
    },
    /// An inline struct literal.
    Struct {
        /// Struct members.
        #[serde(default)]
        fields: Vec<FieldDecl>,
    },
    /// Any interface type.
    Interface,
    /// A generic type parameter without concrete instantiation.
    TypeParam {
        /// Parameter name.
        name: String,
    },
}

impl TypeExpr {
    /// A named type in the current package (or a builtin).
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            package: None,
        }
    }

    /// A named type from another package.
    #[must_use]
    pub fn external(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            package: Some(package.into()),
        }
    }

    /// `*elem`
    #[must_use]
    pub fn pointer(elem: Self) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    /// `[]elem`
    #[must_use]
    pub fn slice(elem: Self) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    /// `map[key]value`
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// An inline struct literal.
    #[must_use]
    pub fn structure(fields: Vec<FieldDecl>) -> Self {
        Self::Struct { fields }
    }

    /// Returns true for `*T`.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer { .. })
    }

    /// Strips a single pointer layer, if any.
    #[must_use]
    pub fn deref(&self) -> &Self {
        match self {
            Self::Pointer { elem } => elem,
            other => other,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                name,
                package: Some(pkg),
            } => write!(f, "{pkg}.{name}"),
            Self::Named { name, package: None } => write!(f, "{name}"),
            Self::Pointer { elem } => write!(f, "*{elem}"),
            Self::Slice { elem } => write!(f, "[]{elem}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Struct { .. } => write!(f, "struct{{...}}"),
            Self::Interface => write!(f, "interface{{}}"),
            Self::TypeParam { name } => write!(f, "{name}"),
        }
    }
}

/// A struct member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name; for embedded fields, the embedded type name.
    pub name: String,
    /// Raw doc comment lines.
    #[serde(default)]
    pub doc: Vec<CommentLine>,
    /// Where the field is declared.
    #[serde(default)]
    pub location: Location,
    /// Struct tag literal, if any.
    #[serde(default)]
    pub tag: Option<TagLiteral>,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    /// Whether the field is embedded.
    #[serde(default)]
    pub embedded: bool,
}

impl FieldDecl {
    /// Creates a field with no doc comment and no tag.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            doc: Vec::new(),
            location: Location::default(),
            tag: None,
            ty,
            embedded: false,
        }
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, file: &str, line: usize) -> Self {
        self.location = Location::new(file, line, 2);
        self
    }

    /// Sets the doc comment; lines are placed directly above the field.
    #[must_use]
    pub fn doc(mut self, lines: &[&str]) -> Self {
        self.doc = doc_lines(&self.location, lines);
        self
    }

    /// Sets the raw struct tag.
    #[must_use]
    pub fn tag(mut self, raw: impl Into<String>) -> Self {
        let location = Location::new(self.location.file.clone(), self.location.line, 40);
        self.tag = Some(TagLiteral {
            raw: raw.into(),
            location,
        });
        self
    }

    /// Sets a `json:"..."` tag.
    #[must_use]
    pub fn json(self, value: &str) -> Self {
        self.tag(format!("json:\"{value}\""))
    }

    /// Marks the field as embedded.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// A package-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Type name.
    pub name: String,
    /// Raw doc comment lines.
    #[serde(default)]
    pub doc: Vec<CommentLine>,
    /// Where the type is declared.
    #[serde(default)]
    pub location: Location,
    /// `type A = B` rather than `type A B`.
    #[serde(default)]
    pub alias: bool,
    /// The right-hand side of the declaration.
    pub expr: TypeExpr,
}

impl TypeDecl {
    /// Creates a defined type `type name expr`.
    #[must_use]
    pub fn new(name: impl Into<String>, expr: TypeExpr) -> Self {
        Self {
            name: name.into(),
            doc: Vec::new(),
            location: Location::default(),
            alias: false,
            expr,
        }
    }

    /// Creates a struct type.
    #[must_use]
    pub fn structure(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self::new(name, TypeExpr::Struct { fields })
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, file: &str, line: usize) -> Self {
        self.location = Location::new(file, line, 6);
        self
    }

    /// Sets the doc comment; lines are placed directly above the type.
    #[must_use]
    pub fn doc(mut self, lines: &[&str]) -> Self {
        self.doc = doc_lines(&self.location, lines);
        self
    }

    /// Turns the declaration into an alias (`type A = B`).
    #[must_use]
    pub fn alias(mut self) -> Self {
        self.alias = true;
        self
    }

    /// Returns the struct members when the declaration is a struct literal.
    #[must_use]
    pub fn struct_fields(&self) -> Option<&[FieldDecl]> {
        match &self.expr {
            TypeExpr::Struct { fields } => Some(fields),
            _ => None,
        }
    }
}

fn doc_lines(anchor: &Location, lines: &[&str]) -> Vec<CommentLine> {
    let count = lines.len();
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let location = Location::new(
                anchor.file.clone(),
                anchor.line.saturating_sub(count - i),
                anchor.column.max(1),
            );
            CommentLine::new(*text, location)
        })
        .collect()
}

/// The value of a package-level constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    /// Boolean constant.
    Bool(bool),
    /// Integer constant.
    Int(i64),
    /// Floating point constant.
    Float(f64),
    /// String constant.
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// A package-level constant declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    /// Constant name.
    pub name: String,
    /// Declared type name, when the constant is typed.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Constant value.
    pub value: ConstValue,
    /// Where the constant is declared.
    #[serde(default)]
    pub location: Location,
}

impl ConstDecl {
    /// Creates a typed string constant.
    #[must_use]
    pub fn string(name: impl Into<String>, type_name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            value: ConstValue::Str(value.to_string()),
            location: Location::default(),
        }
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, file: &str, line: usize) -> Self {
        self.location = Location::new(file, line, 2);
        self
    }
}

/// All declarations of one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Import path of the package.
    pub path: String,
    /// Type declarations in source order.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Constant declarations in source order.
    #[serde(default)]
    pub constants: Vec<ConstDecl>,
}

impl Package {
    /// Creates an empty package.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Adds a type declaration.
    #[must_use]
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Adds a constant declaration.
    #[must_use]
    pub fn with_const(mut self, decl: ConstDecl) -> Self {
        self.constants.push(decl);
        self
    }

    /// Finds a type declaration by name.
    #[must_use]
    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Returns the constants whose declared type is `type_name`.
    pub fn constants_of<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a ConstDecl> + 'a {
        self.constants
            .iter()
            .filter(move |c| c.type_name.as_deref() == Some(type_name))
    }
}

/// A whole analysis input: every package in scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Packages in scope.
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// Kind of declaration a marker is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// A type declaration.
    Type,
    /// A struct field.
    Field,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Field => write!(f, "field"),
        }
    }
}

/// A declaration under analysis: a type, or a field of a struct.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    /// A type declaration.
    Type(&'a TypeDecl),
    /// A field; `owner` is the top-level type that (transitively) contains it.
    Field {
        /// Owning type declaration.
        owner: &'a TypeDecl,
        /// The field itself.
        field: &'a FieldDecl,
    },
}

impl<'a> Declaration<'a> {
    /// Returns the declaration kind.
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        match self {
            Self::Type(_) => DeclKind::Type,
            Self::Field { .. } => DeclKind::Field,
        }
    }

    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Type(t) => &t.name,
            Self::Field { field, .. } => &field.name,
        }
    }

    /// Returns the raw doc comment.
    #[must_use]
    pub fn doc(&self) -> &'a [CommentLine] {
        match self {
            Self::Type(t) => &t.doc,
            Self::Field { field, .. } => &field.doc,
        }
    }

    /// Returns the declaration location.
    #[must_use]
    pub fn location(&self) -> &'a Location {
        match self {
            Self::Type(t) => &t.location,
            Self::Field { field, .. } => &field.location,
        }
    }

    /// Returns the declared type expression.
    #[must_use]
    pub fn type_expr(&self) -> &'a TypeExpr {
        match self {
            Self::Type(t) => &t.expr,
            Self::Field { field, .. } => &field.ty,
        }
    }

    /// Returns the field, if this is a field declaration.
    #[must_use]
    pub fn as_field(&self) -> Option<&'a FieldDecl> {
        match self {
            Self::Field { field, .. } => Some(field),
            Self::Type(_) => None,
        }
    }

    /// Returns the type declaration, if this is one.
    #[must_use]
    pub fn as_type(&self) -> Option<&'a TypeDecl> {
        match self {
            Self::Type(t) => Some(t),
            Self::Field { .. } => None,
        }
    }

    /// Returns the owning type for fields, the type itself otherwise.
    #[must_use]
    pub fn owner(&self) -> &'a TypeDecl {
        match self {
            Self::Type(t) => t,
            Self::Field { owner, .. } => owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_expr_display_uses_go_syntax() {
        let expr = TypeExpr::map(
            TypeExpr::named("string"),
            TypeExpr::slice(TypeExpr::pointer(TypeExpr::external("metav1", "Time"))),
        );
        assert_eq!(expr.to_string(), "map[string][]*metav1.Time");
    }

    #[test]
    fn doc_lines_are_placed_above_declaration() {
        let field = FieldDecl::new("Name", TypeExpr::named("string"))
            .at("types.go", 10)
            .doc(&["// name is the name.", "// +optional"]);
        assert_eq!(field.doc[0].location.line, 8);
        assert_eq!(field.doc[1].location.line, 9);
        assert_eq!(field.doc[1].body(), "+optional");
    }

    #[test]
    fn snapshot_deserializes_from_json() {
        let json = r#"{
            "packages": [{
                "path": "example.com/api/v1",
                "types": [{
                    "name": "Widget",
                    "location": {"file": "types.go", "line": 5, "column": 6},
                    "expr": {"kind": "struct", "fields": [{
                        "name": "Replicas",
                        "type": {"kind": "pointer", "elem": {"kind": "named", "name": "int32"}},
                        "tag": {"raw": "json:\"replicas,omitempty\""},
                        "doc": [{"text": "// +optional"}]
                    }]}
                }],
                "constants": [{"name": "Ready", "type_name": "Phase", "value": "Ready"}]
            }]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let pkg = &snapshot.packages[0];
        let widget = pkg.type_decl("Widget").unwrap();
        let fields = widget.struct_fields().unwrap();
        assert_eq!(fields[0].ty.to_string(), "*int32");
        assert_eq!(pkg.constants_of("Phase").count(), 1);
        assert_eq!(pkg.constants[0].value, ConstValue::Str("Ready".into()));
    }

    #[test]
    fn declaration_accessors() {
        let field = FieldDecl::new("Name", TypeExpr::named("string"));
        let owner = TypeDecl::structure("Widget", vec![field.clone()]);
        let decl = Declaration::Field {
            owner: &owner,
            field: &field,
        };
        assert_eq!(decl.kind(), DeclKind::Field);
        assert_eq!(decl.name(), "Name");
        assert_eq!(decl.owner().name, "Widget");
        assert!(decl.as_type().is_none());
    }
}
