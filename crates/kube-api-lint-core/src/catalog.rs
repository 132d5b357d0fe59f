//! Built-in marker metadata.
//!
//! The catalog is an injected read-only value: the analyzer builds one per
//! run (usually [`MarkerCatalog::builtin`] extended from configuration) and
//! hands it to every package context. Tests substitute their own.

use crate::markers::known;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Declaration kinds a marker may annotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Fields only.
    Field,
    /// Types only.
    Type,
    /// Fields and types.
    Any,
}

impl Scope {
    /// Parses the configuration keyword (`field`, `type`, `any`).
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "field" => Some(Self::Field),
            "type" => Some(Self::Type),
            "any" | "both" => Some(Self::Any),
            _ => None,
        }
    }

    /// Returns true if the declaration kind is allowed.
    #[must_use]
    pub fn allows(self, kind: crate::source::DeclKind) -> bool {
        use crate::source::DeclKind;
        matches!(
            (self, kind),
            (Self::Any, _) | (Self::Field, DeclKind::Field) | (Self::Type, DeclKind::Type)
        )
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => write!(f, "fields"),
            Self::Type => write!(f, "types"),
            Self::Any => write!(f, "fields and types"),
        }
    }
}

/// Schema-level kind of a declaration, as seen by validation markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Strings.
    String,
    /// Integers.
    Integer,
    /// Floating point numbers.
    Number,
    /// Booleans.
    Boolean,
    /// Slices and arrays.
    Array,
    /// Structs and maps.
    Object,
}

impl SchemaKind {
    /// Parses the configuration keyword.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        };
        write!(f, "{s}")
    }
}

/// Metadata about one recognized marker identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    /// Declaration kinds the marker may annotate.
    pub scope: Scope,
    /// Schema kinds the marker constrains; empty means unconstrained.
    pub schema: Vec<SchemaKind>,
    /// Whether the marker carries `name=value` attributes.
    pub attributes: bool,
    /// Whether the marker may appear at most once per declaration.
    pub unique: bool,
}

impl MarkerSpec {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            schema: Vec::new(),
            attributes: false,
            unique: false,
        }
    }

    fn schema(mut self, kinds: &[SchemaKind]) -> Self {
        self.schema = kinds.to_vec();
        self
    }

    fn attributes(mut self) -> Self {
        self.attributes = true;
        self
    }

    fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Words the typo check compares marker segments against, on top of every
/// segment of a cataloged identifier.
const TYPO_WORDS: &[&str] = &[
    "kubebuilder",
    "required",
    "optional",
    "validation",
    "default",
    "example",
    "nullable",
    "listType",
    "listMapKey",
    "MinLength",
    "MaxLength",
    "MinItems",
    "MaxItems",
    "Minimum",
    "Maximum",
    "Pattern",
    "Enum",
    "XValidation",
];

/// Read-only registry of recognized markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerCatalog {
    specs: BTreeMap<String, MarkerSpec>,
    attribute_markers: BTreeSet<String>,
    dictionary: BTreeSet<String>,
}

impl MarkerCatalog {
    /// An empty catalog: no marker is recognized.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog of kubebuilder and Kubernetes markers.
    #[must_use]
    pub fn builtin() -> Self {
        use SchemaKind::{Array, Integer, Number, Object, String as Str};

        let mut catalog = Self::empty();

        for id in known::OPTIONAL_SPELLINGS.iter().chain(known::REQUIRED_SPELLINGS) {
            catalog.insert(id, MarkerSpec::new(Scope::Any).unique());
        }
        for id in known::DEFAULT_SPELLINGS {
            catalog.insert(id, MarkerSpec::new(Scope::Any).unique());
        }
        catalog.insert(known::KUBEBUILDER_EXAMPLE, MarkerSpec::new(Scope::Any).unique());
        catalog.insert(known::KUBEBUILDER_ENUM, MarkerSpec::new(Scope::Any).unique());
        catalog.insert(known::K8S_ENUM, MarkerSpec::new(Scope::Type).unique());
        catalog.insert(known::ENUM, MarkerSpec::new(Scope::Type).unique());

        for id in [known::MIN_LENGTH, known::MAX_LENGTH, known::PATTERN, known::FORMAT] {
            catalog.insert(id, MarkerSpec::new(Scope::Any).schema(&[Str]).unique());
        }
        for id in [
            known::MINIMUM,
            known::MAXIMUM,
            known::EXCLUSIVE_MINIMUM,
            known::EXCLUSIVE_MAXIMUM,
            known::MULTIPLE_OF,
        ] {
            catalog.insert(id, MarkerSpec::new(Scope::Any).schema(&[Integer, Number]).unique());
        }
        for id in [known::MIN_ITEMS, known::MAX_ITEMS, known::UNIQUE_ITEMS] {
            catalog.insert(id, MarkerSpec::new(Scope::Any).schema(&[Array]).unique());
        }
        for id in [known::MIN_PROPERTIES, known::MAX_PROPERTIES] {
            catalog.insert(id, MarkerSpec::new(Scope::Any).schema(&[Object]).unique());
        }
        for id in [known::ITEMS_MAX_LENGTH, known::ITEMS_MIN_LENGTH, known::ITEMS_ENUM] {
            catalog.insert(id, MarkerSpec::new(Scope::Any).schema(&[Array]).unique());
        }
        for id in [known::LIST_TYPE, known::LIST_MAP_KEY] {
            catalog.insert(id, MarkerSpec::new(Scope::Any).schema(&[Array]));
        }
        for id in [known::PATCH_STRATEGY, known::PATCH_MERGE_KEY] {
            catalog.insert(id, MarkerSpec::new(Scope::Field).unique());
        }

        catalog.insert(known::XVALIDATION, MarkerSpec::new(Scope::Any).attributes());
        catalog.insert(known::EMBEDDED_RESOURCE, MarkerSpec::new(Scope::Any));
        catalog.insert(known::PRESERVE_UNKNOWN_FIELDS, MarkerSpec::new(Scope::Any));
        catalog.insert(known::SCHEMA_TYPE, MarkerSpec::new(Scope::Any).unique());
        catalog.insert(known::NULLABLE, MarkerSpec::new(Scope::Any));
        catalog.insert(known::KUBEBUILDER_NULLABLE, MarkerSpec::new(Scope::Any));

        catalog.insert(known::OBJECT_ROOT, MarkerSpec::new(Scope::Type).unique());
        catalog.insert(known::SUBRESOURCE_STATUS, MarkerSpec::new(Scope::Type).unique());
        catalog.insert(known::STORAGE_VERSION, MarkerSpec::new(Scope::Type).unique());
        catalog.insert(known::RESOURCE, MarkerSpec::new(Scope::Type).attributes());
        catalog.insert(known::PRINT_COLUMN, MarkerSpec::new(Scope::Type).attributes());
        catalog.insert(known::SUBRESOURCE_SCALE, MarkerSpec::new(Scope::Type).attributes());

        catalog.insert(known::K8S_UNION_MEMBER, MarkerSpec::new(Scope::Field));
        catalog.insert(known::K8S_UNION_DISCRIMINATOR, MarkerSpec::new(Scope::Field));
        catalog.insert(known::UNION_DISCRIMINATOR, MarkerSpec::new(Scope::Field));

        catalog.dictionary.extend(TYPO_WORDS.iter().map(|w| (*w).to_string()));
        catalog
    }

    fn insert(&mut self, identifier: &str, spec: MarkerSpec) {
        if spec.attributes {
            self.attribute_markers.insert(identifier.to_string());
        }
        for segment in identifier.split(':') {
            self.dictionary.insert(segment.to_string());
        }
        self.specs.insert(identifier.to_string(), spec);
    }

    /// Registers an attribute-bearing marker identifier, so lines such as
    /// `+custom:Marker:fruit=apple` parse into attributes.
    #[must_use]
    pub fn with_attribute_marker(mut self, identifier: &str) -> Self {
        if !identifier.is_empty() {
            self.attribute_markers.insert(identifier.to_string());
        }
        self
    }

    /// Returns the metadata of a recognized marker.
    #[must_use]
    pub fn spec(&self, identifier: &str) -> Option<&MarkerSpec> {
        self.specs.get(identifier)
    }

    /// Returns true for recognized identifiers.
    #[must_use]
    pub fn is_known(&self, identifier: &str) -> bool {
        self.specs.contains_key(identifier)
    }

    /// Returns the longest attribute-bearing identifier that prefixes the
    /// marker text followed by `:`.
    #[must_use]
    pub fn attribute_marker_prefix(&self, text: &str) -> Option<&str> {
        self.attribute_markers
            .iter()
            .filter(|id| {
                text.strip_prefix(id.as_str())
                    .is_some_and(|rest| rest.starts_with(':'))
            })
            .max_by_key(|id| id.len())
            .map(String::as_str)
    }

    /// Identifiers that may appear at most once per declaration.
    pub fn unique_markers(&self) -> impl Iterator<Item = &str> {
        self.specs
            .iter()
            .filter(|(_, spec)| spec.unique)
            .map(|(id, _)| id.as_str())
    }

    /// Words the typo check treats as correctly spelled.
    #[must_use]
    pub fn dictionary(&self) -> &BTreeSet<String> {
        &self.dictionary
    }
}
