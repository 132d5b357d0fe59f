//! Marker scope resolution.

use crate::catalog::{MarkerCatalog, SchemaKind, Scope};
use crate::markers::Marker;
use crate::source::DeclKind;
use std::collections::HashMap;
use std::fmt;

/// Scope and schema constraints configured for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeOverride {
    /// Declaration kinds the marker may annotate.
    pub scope: Scope,
    /// Schema kinds the marker constrains; `None` keeps the built-in list.
    pub schema: Option<Vec<SchemaKind>>,
}

/// Effective constraints for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    /// Declaration kinds the marker may annotate.
    pub scope: Scope,
    /// Schema kinds the marker constrains; empty means unconstrained.
    pub schema: Vec<SchemaKind>,
}

/// A marker applied where it does not belong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeViolation {
    /// Wrong declaration kind (a field-only marker on a type, ...).
    Declaration {
        /// The marker identifier.
        identifier: String,
        /// Where it is allowed.
        allowed: Scope,
    },
    /// Wrong schema kind (a string marker on an integer, ...).
    Schema {
        /// The marker identifier.
        identifier: String,
        /// Kinds it constrains.
        allowed: Vec<SchemaKind>,
        /// Kind of the declaration it was applied to.
        actual: SchemaKind,
    },
}

impl fmt::Display for ScopeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration {
                identifier,
                allowed,
            } => write!(f, "marker {identifier:?} can only be applied to {allowed}"),
            Self::Schema {
                identifier,
                allowed,
                actual,
            } => {
                let kinds: Vec<String> = allowed.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "marker {identifier:?} can only be applied to {} types, not {actual}",
                    kinds.join(" or ")
                )
            }
        }
    }
}

/// Looks up marker scopes: configured override, then built-in default.
///
/// Markers that are neither configured nor cataloged are never checked.
#[derive(Debug, Clone)]
pub struct ScopeResolver<'a> {
    catalog: &'a MarkerCatalog,
    overrides: &'a HashMap<String, ScopeOverride>,
}

impl<'a> ScopeResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(catalog: &'a MarkerCatalog, overrides: &'a HashMap<String, ScopeOverride>) -> Self {
        Self { catalog, overrides }
    }

    /// Resolves the constraints of an identifier.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<ResolvedScope> {
        let builtin = self.catalog.spec(identifier);
        match (self.overrides.get(identifier), builtin) {
            (Some(o), spec) => Some(ResolvedScope {
                scope: o.scope,
                schema: o
                    .schema
                    .clone()
                    .or_else(|| spec.map(|s| s.schema.clone()))
                    .unwrap_or_default(),
            }),
            (None, Some(spec)) => Some(ResolvedScope {
                scope: spec.scope,
                schema: spec.schema.clone(),
            }),
            (None, None) => None,
        }
    }

    /// Checks one marker against the declaration it is attached to.
    ///
    /// `schema` is the declaration's resolved schema kind; `None` (an
    /// unresolved type) skips the schema check.
    #[must_use]
    pub fn check(
        &self,
        marker: &Marker,
        kind: DeclKind,
        schema: Option<SchemaKind>,
    ) -> Option<ScopeViolation> {
        let resolved = self.resolve(&marker.identifier)?;
        if !resolved.scope.allows(kind) {
            return Some(ScopeViolation::Declaration {
                identifier: marker.identifier.clone(),
                allowed: resolved.scope,
            });
        }
        let actual = schema?;
        if resolved.schema.is_empty() || resolved.schema.contains(&actual) {
            return None;
        }
        Some(ScopeViolation::Schema {
            identifier: marker.identifier.clone(),
            allowed: resolved.schema,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::known;
    use crate::types::Location;

    fn marker(identifier: &str) -> Marker {
        Marker {
            identifier: identifier.to_string(),
            attributes: Vec::new(),
            value: None,
            raw: format!("// +{identifier}"),
            location: Location::default(),
        }
    }

    #[test]
    fn field_only_marker_on_type() {
        let catalog = MarkerCatalog::builtin();
        let overrides = HashMap::new();
        let resolver = ScopeResolver::new(&catalog, &overrides);
        let violation = resolver
            .check(&marker(known::K8S_UNION_MEMBER), DeclKind::Type, None)
            .unwrap();
        assert_eq!(
            violation.to_string(),
            "marker \"k8s:unionMember\" can only be applied to fields"
        );
        assert!(resolver
            .check(&marker(known::K8S_UNION_MEMBER), DeclKind::Field, None)
            .is_none());
        assert!(resolver
            .check(&marker(known::REQUIRED), DeclKind::Type, None)
            .is_none());
    }

    #[test]
    fn schema_constraint() {
        let catalog = MarkerCatalog::builtin();
        let overrides = HashMap::new();
        let resolver = ScopeResolver::new(&catalog, &overrides);
        let violation = resolver
            .check(&marker(known::MIN_LENGTH), DeclKind::Field, Some(SchemaKind::Integer))
            .unwrap();
        assert_eq!(
            violation.to_string(),
            "marker \"kubebuilder:validation:MinLength\" can only be applied to string types, not integer"
        );
        assert!(resolver
            .check(&marker(known::MIN_LENGTH), DeclKind::Field, None)
            .is_none());
    }

    #[test]
    fn unknown_markers_are_unchecked() {
        let catalog = MarkerCatalog::builtin();
        let overrides = HashMap::new();
        let resolver = ScopeResolver::new(&catalog, &overrides);
        assert!(resolver.resolve("custom:Thing").is_none());
        assert!(resolver
            .check(&marker("custom:Thing"), DeclKind::Type, Some(SchemaKind::String))
            .is_none());
    }

    #[test]
    fn overrides_widen_and_declare() {
        let catalog = MarkerCatalog::builtin();
        let mut overrides = HashMap::new();
        overrides.insert(
            known::K8S_UNION_MEMBER.to_string(),
            ScopeOverride {
                scope: Scope::Any,
                schema: None,
            },
        );
        overrides.insert(
            "custom:Thing".to_string(),
            ScopeOverride {
                scope: Scope::Type,
                schema: Some(vec![SchemaKind::Object]),
            },
        );
        let resolver = ScopeResolver::new(&catalog, &overrides);
        assert!(resolver
            .check(&marker(known::K8S_UNION_MEMBER), DeclKind::Type, None)
            .is_none());
        assert!(matches!(
            resolver.check(&marker("custom:Thing"), DeclKind::Field, None),
            Some(ScopeViolation::Declaration { .. })
        ));
        assert!(matches!(
            resolver.check(&marker("custom:Thing"), DeclKind::Type, Some(SchemaKind::String)),
            Some(ScopeViolation::Schema { .. })
        ));
    }
}
