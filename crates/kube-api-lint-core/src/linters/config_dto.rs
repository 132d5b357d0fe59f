//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization of the `[linters]`
//! table. They are converted to the validated model via the loader.

use serde::{Deserialize, Serialize};

/// Raw `[linters]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintersDto {
    /// `[linters.conflictingmarkers]`
    pub conflictingmarkers: ConflictingMarkersDto,
    /// `[linters.dependentmarkers]`
    pub dependentmarkers: DependentMarkersDto,
    /// `[linters.markerscope]`
    pub markerscope: MarkerScopeDto,
    /// `[linters.namingconventions]`
    pub namingconventions: NamingConventionsDto,
    /// `[linters.noreferences]`
    pub noreferences: NoReferencesDto,
    /// `[linters.optionalfields]`
    pub optionalfields: SerializationDto,
    /// `[linters.requiredfields]`
    pub requiredfields: SerializationDto,
    /// `[linters.optionalorrequired]`
    pub optionalorrequired: OptionalOrRequiredDto,
    /// `[linters.numericbounds]`
    pub numericbounds: NumericBoundsDto,
    /// `[linters.forbiddenmarkers]`
    pub forbiddenmarkers: ForbiddenMarkersDto,
    /// `[linters.uniquemarkers]`
    pub uniquemarkers: UniqueMarkersDto,
    /// `[linters.jsontags]`
    pub jsontags: JsonTagsDto,
    /// `[linters.nomaps]`
    pub nomaps: PolicyDto,
    /// `[linters.conditions]`
    pub conditions: ConditionsDto,
}

/// Configured conflict sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictingMarkersDto {
    /// Conflict entries.
    pub conflicts: Vec<ConflictDto>,
}

/// One conflict entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDto {
    /// Conflict name.
    pub name: String,
    /// Mutually exclusive groups of marker identifiers.
    pub sets: Vec<Vec<String>>,
    /// Explanation shown with every diagnostic.
    #[serde(default)]
    pub description: String,
}

/// Configured dependencies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependentMarkersDto {
    /// Dependency entries.
    pub rules: Vec<DependencyDto>,
}

/// One dependency entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyDto {
    /// Triggering identifier.
    pub identifier: String,
    /// Identifiers of which at least one must be present.
    pub requires: Vec<String>,
}

/// Marker scope settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerScopeDto {
    /// `Warn` or `SuggestFix`.
    pub policy: Option<String>,
    /// Scope overrides.
    pub overrides: Vec<ScopeOverrideDto>,
}

/// One scope override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeOverrideDto {
    /// Marker identifier.
    pub identifier: String,
    /// `field`, `type` or `any`.
    pub scope: String,
    /// Schema kinds the marker constrains.
    #[serde(default)]
    pub schema: Option<Vec<String>>,
}

/// Naming conventions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventionsDto {
    /// Convention entries.
    pub conventions: Vec<NamingConventionDto>,
}

/// One naming convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConventionDto {
    /// Convention name.
    pub name: String,
    /// Regex matching violating names.
    pub violation_matcher: String,
    /// `Inform`, `Drop` or `Replacement`.
    pub operation: String,
    /// Replacement text, for `Replacement`.
    #[serde(default)]
    pub replacement: Option<String>,
    /// Explanation shown with every diagnostic.
    pub message: String,
}

/// Reference naming settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoReferencesDto {
    /// `PreferAbbreviatedReference` or `NoReferences`.
    pub policy: Option<String>,
}

/// Settings shared by the optional and required field checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationDto {
    /// Pointer settings.
    pub pointers: PointersDto,
    /// `omitempty` settings.
    pub omitempty: PolicyDto,
    /// `omitzero` settings.
    pub omitzero: PolicyDto,
}

/// Pointer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PointersDto {
    /// `Always` or `WhenRequired` (optional fields only).
    pub preference: Option<String>,
    /// `SuggestFix` or `Warn`.
    pub policy: Option<String>,
}

/// A table holding a single `policy` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDto {
    /// Policy keyword.
    pub policy: Option<String>,
}

/// Preferred marker spellings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalOrRequiredDto {
    /// Preferred optional spelling.
    pub preferred_optional_marker: Option<String>,
    /// Preferred required spelling.
    pub preferred_required_marker: Option<String>,
    /// Whether embedded fields may omit both markers.
    pub exempt_embedded_fields: Option<bool>,
    /// Whether type declarations are checked.
    pub check_types: Option<bool>,
}

/// Numeric bounds envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericBoundsDto {
    /// Lower edge.
    pub min: Option<i64>,
    /// Upper edge.
    pub max: Option<i64>,
}

/// Forbidden markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForbiddenMarkersDto {
    /// Marker entries.
    pub markers: Vec<MarkerRefDto>,
}

/// A marker reference, optionally attribute-qualified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerRefDto {
    /// Identifier, e.g. `kubebuilder:object:root=true`.
    pub identifier: String,
}

/// Additional unique markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniqueMarkersDto {
    /// Marker entries.
    pub custom_markers: Vec<UniqueMarkerDto>,
}

/// One unique marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueMarkerDto {
    /// Identifier.
    pub identifier: String,
    /// Attributes forming the identity.
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// JSON tag settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonTagsDto {
    /// Pattern JSON names must match.
    pub json_tag_regex: Option<String>,
}

/// Conditions settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionsDto {
    /// `Warn` or `Ignore`.
    pub is_first_field: Option<String>,
    /// `SuggestFix`, `Warn`, `Ignore` or `Forbid`.
    pub use_protobuf: Option<String>,
    /// `SuggestFix`, `Warn`, `Ignore` or `Forbid`.
    pub use_patch_strategy: Option<String>,
}
