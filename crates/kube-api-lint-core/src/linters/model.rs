//! Validated configuration model for the configurable rules.
//!
//! No serde and no I/O here. Every invariant is enforced at construction
//! time, so rules can rely on the values they are given.

use crate::catalog::{SchemaKind, Scope};
use crate::markers::{known, Marker, MarkerPattern, MarkerSet};
use crate::scope::ScopeOverride;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Largest integer both bounds may reach by default (2^53 - 1).
pub const SAFE_INTEGER_MAX: i64 = 9_007_199_254_740_991;

/// Default JSON property name pattern: lower camel case.
pub const DEFAULT_JSON_TAG_REGEX: &str = "^[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)*$";

#[allow(clippy::expect_used)]
static DEFAULT_JSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_JSON_TAG_REGEX).expect("default json tag regex"));

/// Errors raised while constructing model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A required name or identifier is empty.
    #[error("must not be empty")]
    Empty,

    /// A conflict set has fewer than two groups.
    #[error("conflict {name} needs at least two sets, found {found}")]
    TooFewSets {
        /// Conflict name.
        name: String,
        /// Number of sets given.
        found: usize,
    },

    /// A conflict group lists no marker.
    #[error("conflict {name} has an empty set at index {index}")]
    EmptySet {
        /// Conflict name.
        name: String,
        /// Index of the empty set.
        index: usize,
    },

    /// A dependency lists no required marker.
    #[error("dependency on {identifier} requires at least one marker")]
    NoRequirements {
        /// Trigger identifier.
        identifier: String,
    },

    /// A regular expression did not compile.
    #[error("invalid regex {pattern:?}: {reason}")]
    InvalidRegex {
        /// The pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Lower bound above upper bound.
    #[error("minimum {min} is greater than maximum {max}")]
    BoundsInverted {
        /// Configured minimum.
        min: i64,
        /// Configured maximum.
        max: i64,
    },

    /// A replacement convention without replacement text.
    #[error("convention {name} uses operation Replacement but sets no replacement")]
    MissingReplacement {
        /// Convention name.
        name: String,
    },

    /// Unknown scope keyword.
    #[error("unknown scope {value:?}, expected: field, type, any")]
    UnknownScope {
        /// The invalid value.
        value: String,
    },

    /// Unknown schema kind keyword.
    #[error("unknown schema kind {value:?}, expected: string, integer, number, boolean, array, object")]
    UnknownSchemaKind {
        /// The invalid value.
        value: String,
    },

    /// A preferred marker that is not a recognized spelling.
    #[error("{value:?} is not one of: {}", expected.join(", "))]
    UnsupportedMarker {
        /// The invalid value.
        value: String,
        /// Accepted spellings.
        expected: Vec<String>,
    },
}

fn compile(pattern: &str) -> Result<Regex, ModelError> {
    Regex::new(pattern).map_err(|e| ModelError::InvalidRegex {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

// ────────────────────────────────────────────
// Policies
// ────────────────────────────────────────────

macro_rules! policy {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Accepted spellings, for error messages.
            pub const EXPECTED: &'static str = concat!($(stringify!($variant), " "),+);

            /// Parses the configuration keyword (case-sensitive).
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $(stringify!($variant) => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $(Self::$variant => stringify!($variant),)+
                };
                write!(f, "{s}")
            }
        }
    };
}

policy!(
    /// Whether a rule attaches an automatic fix or only reports.
    FixPolicy {
        /// Report and attach a fix where one is unambiguous.
        SuggestFix,
        /// Report only.
        Warn,
    }
);

policy!(
    /// Handling of a missing `omitempty` option.
    OmitEmptyPolicy {
        /// Report and attach a fix.
        SuggestFix,
        /// Report only.
        Warn,
        /// Do not check.
        Ignore,
    }
);

policy!(
    /// Handling of `omitzero` on struct fields.
    OmitZeroPolicy {
        /// Require `omitzero` on non-pointer structs, with a fix.
        SuggestFix,
        /// Require `omitzero` on non-pointer structs, report only.
        Warn,
        /// Disallow `omitzero`; structs use pointers with `omitempty`.
        Forbid,
    }
);

policy!(
    /// When optional fields must be pointers.
    PointerPreference {
        /// Every optional field (except collections) is a pointer.
        Always,
        /// Only when the zero value is a valid choice.
        WhenRequired,
    }
);

policy!(
    /// Checks on the position of a conditions field.
    FirstFieldPolicy {
        /// Report when it is not the first field.
        Warn,
        /// Do not check.
        Ignore,
    }
);

policy!(
    /// Handling of an optional conditions field tag or marker.
    ConditionsPolicy {
        /// Require it, with a fix.
        SuggestFix,
        /// Require it, report only.
        Warn,
        /// Do not check.
        Ignore,
        /// Disallow it.
        Forbid,
    }
);

policy!(
    /// Which maps are disallowed.
    NoMapsPolicy {
        /// Every map.
        Enforce,
        /// Every map except `map[string]string`.
        AllowStringToStringMaps,
        /// Only maps whose key or value is not a builtin scalar.
        Ignore,
    }
);

policy!(
    /// Naming policy for reference fields.
    NoReferencesPolicy {
        /// `Reference` becomes `Ref`, `References` becomes `Refs`.
        PreferAbbreviatedReference,
        /// No reference words at all.
        NoReferences,
    }
);

// ────────────────────────────────────────────
// Conflicts and dependencies
// ────────────────────────────────────────────

/// Mutually exclusive groups of markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSet {
    name: String,
    sets: Vec<Vec<MarkerPattern>>,
    description: String,
}

impl ConflictSet {
    /// Creates a conflict set.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty, fewer than two sets are given, or
    /// a set is empty.
    pub fn new(
        name: &str,
        sets: Vec<Vec<MarkerPattern>>,
        description: &str,
    ) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::Empty);
        }
        if sets.len() < 2 {
            return Err(ModelError::TooFewSets {
                name: name.to_string(),
                found: sets.len(),
            });
        }
        if let Some(index) = sets.iter().position(Vec::is_empty) {
            return Err(ModelError::EmptySet {
                name: name.to_string(),
                index,
            });
        }
        Ok(Self {
            name: name.to_string(),
            sets,
            description: description.to_string(),
        })
    }

    /// The built-in conflict between required and default markers.
    #[must_use]
    pub fn default_or_required() -> Self {
        let patterns = |ids: &[&str]| -> Vec<MarkerPattern> {
            ids.iter().map(|id| MarkerPattern::parse(id)).collect()
        };
        Self {
            name: "default_or_required".to_string(),
            sets: vec![
                patterns(known::DEFAULT_SPELLINGS),
                patterns(known::REQUIRED_SPELLINGS),
            ],
            description: "A declaration with a default value cannot be required".to_string(),
        }
    }

    /// Conflict name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explanation shown with every diagnostic.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the populated groups, in configured order, when at least two
    /// groups are populated.
    #[must_use]
    pub fn evaluate<'m>(&self, markers: &'m MarkerSet) -> Option<Vec<Vec<&'m Marker>>> {
        let populated: Vec<Vec<&Marker>> = self
            .sets
            .iter()
            .map(|set| {
                markers
                    .iter()
                    .filter(|m| set.iter().any(|p| p.matches(m)))
                    .collect::<Vec<_>>()
            })
            .filter(|present| !present.is_empty())
            .collect();
        (populated.len() >= 2).then_some(populated)
    }

    /// Every pattern of every set.
    pub fn patterns(&self) -> impl Iterator<Item = &MarkerPattern> {
        self.sets.iter().flatten()
    }
}

/// A marker that requires at least one of several others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    trigger: MarkerPattern,
    requires: Vec<MarkerPattern>,
}

impl Dependency {
    /// Creates a dependency.
    ///
    /// # Errors
    ///
    /// Returns error if the trigger is empty or nothing is required.
    pub fn new(trigger: MarkerPattern, requires: Vec<MarkerPattern>) -> Result<Self, ModelError> {
        if trigger.identifier.is_empty() {
            return Err(ModelError::Empty);
        }
        if requires.is_empty() {
            return Err(ModelError::NoRequirements {
                identifier: trigger.to_string(),
            });
        }
        Ok(Self { trigger, requires })
    }

    /// The marker that triggers the requirement.
    #[must_use]
    pub fn trigger(&self) -> &MarkerPattern {
        &self.trigger
    }

    /// The accepted markers, in configured order.
    #[must_use]
    pub fn requires(&self) -> &[MarkerPattern] {
        &self.requires
    }

    /// Returns the trigger marker when it is present without any of the
    /// required markers.
    #[must_use]
    pub fn evaluate<'m>(&self, markers: &'m MarkerSet) -> Option<&'m Marker> {
        let trigger = markers.iter().find(|m| self.trigger.matches(m))?;
        let satisfied = self.requires.iter().any(|p| markers.has_matching(p));
        (!satisfied).then_some(trigger)
    }
}

// ────────────────────────────────────────────
// Naming
// ────────────────────────────────────────────

/// What a naming convention does with a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingOperation {
    /// Report only.
    Inform,
    /// Suggest removing the matched text.
    Drop,
    /// Suggest replacing the matched text.
    Replacement(String),
}

/// A configured naming convention.
#[derive(Debug, Clone)]
pub struct NamingConvention {
    /// Convention name.
    pub name: String,
    /// Matches names that violate the convention.
    pub matcher: Regex,
    /// What to suggest.
    pub operation: NamingOperation,
    /// Explanation shown with every diagnostic.
    pub message: String,
}

impl NamingConvention {
    /// Creates a convention.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or the matcher does not compile.
    pub fn new(
        name: &str,
        matcher: &str,
        operation: NamingOperation,
        message: &str,
    ) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(Self {
            name: name.to_string(),
            matcher: compile(matcher)?,
            operation,
            message: message.to_string(),
        })
    }

    /// Returns the suggested name for a violating identifier.
    #[must_use]
    pub fn suggest(&self, identifier: &str) -> Option<String> {
        match &self.operation {
            NamingOperation::Inform => None,
            NamingOperation::Drop => Some(self.matcher.replace_all(identifier, "").into_owned()),
            NamingOperation::Replacement(text) => Some(
                self.matcher
                    .replace_all(identifier, regex::NoExpand(text))
                    .into_owned(),
            ),
        }
    }
}

// ────────────────────────────────────────────
// Other rule settings
// ────────────────────────────────────────────

/// Envelope both numeric bounds must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericBounds {
    min: i64,
    max: i64,
}

impl NumericBounds {
    /// Creates an envelope.
    ///
    /// # Errors
    ///
    /// Returns error if `min > max`.
    pub fn new(min: i64, max: i64) -> Result<Self, ModelError> {
        if min > max {
            return Err(ModelError::BoundsInverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower edge.
    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper edge.
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Returns true if the value lies within the envelope.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min as f64 && value <= self.max as f64
    }
}

impl Default for NumericBounds {
    fn default() -> Self {
        Self {
            min: -SAFE_INTEGER_MAX,
            max: SAFE_INTEGER_MAX,
        }
    }
}

/// A marker that may appear once per declaration, keyed by attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueMarker {
    /// Marker identifier.
    pub identifier: String,
    /// Attributes whose values make up the identity.
    pub attributes: Vec<String>,
}

/// Settings of the marker scope check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerScopeConfig {
    /// Whether misplaced markers get a removal fix.
    pub policy: FixPolicy,
    /// Per-identifier overrides.
    pub overrides: HashMap<String, ScopeOverride>,
}

impl Default for MarkerScopeConfig {
    fn default() -> Self {
        Self {
            policy: FixPolicy::Warn,
            overrides: HashMap::new(),
        }
    }
}

impl MarkerScopeConfig {
    /// Builds an override from configuration keywords.
    ///
    /// # Errors
    ///
    /// Returns error on an unknown scope or schema keyword.
    pub fn parse_override(scope: &str, schema: Option<&[String]>) -> Result<ScopeOverride, ModelError> {
        let scope = Scope::parse(scope).ok_or_else(|| ModelError::UnknownScope {
            value: scope.to_string(),
        })?;
        let schema = schema
            .map(|kinds| {
                kinds
                    .iter()
                    .map(|k| {
                        SchemaKind::parse(k).ok_or_else(|| ModelError::UnknownSchemaKind {
                            value: k.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(ScopeOverride { scope, schema })
    }
}

/// Settings of the optional fields check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalFieldsConfig {
    /// When a pointer is needed.
    pub pointer_preference: PointerPreference,
    /// Whether pointer diagnostics carry a suggestion.
    pub pointer_policy: FixPolicy,
    /// Missing `omitempty` handling.
    pub omitempty: OmitEmptyPolicy,
    /// `omitzero` handling.
    pub omitzero: OmitZeroPolicy,
}

impl Default for OptionalFieldsConfig {
    fn default() -> Self {
        Self {
            pointer_preference: PointerPreference::WhenRequired,
            pointer_policy: FixPolicy::SuggestFix,
            omitempty: OmitEmptyPolicy::SuggestFix,
            omitzero: OmitZeroPolicy::SuggestFix,
        }
    }
}

/// Settings of the required fields check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFieldsConfig {
    /// Whether pointer diagnostics carry a suggestion.
    pub pointer_policy: FixPolicy,
    /// Missing `omitempty` handling.
    pub omitempty: OmitEmptyPolicy,
    /// `omitzero` handling.
    pub omitzero: OmitZeroPolicy,
}

impl Default for RequiredFieldsConfig {
    fn default() -> Self {
        Self {
            pointer_policy: FixPolicy::SuggestFix,
            omitempty: OmitEmptyPolicy::SuggestFix,
            omitzero: OmitZeroPolicy::SuggestFix,
        }
    }
}

/// Preferred spellings of the optional and required markers, and which
/// declarations must carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalOrRequiredConfig {
    preferred_optional: &'static str,
    preferred_required: &'static str,
    exempt_embedded: bool,
    check_types: bool,
}

impl OptionalOrRequiredConfig {
    /// Creates the setting from configured spellings.
    ///
    /// # Errors
    ///
    /// Returns error if a spelling is not recognized.
    pub fn new(optional: &str, required: &str) -> Result<Self, ModelError> {
        Ok(Self {
            preferred_optional: spelling(optional, known::OPTIONAL_SPELLINGS)?,
            preferred_required: spelling(required, known::REQUIRED_SPELLINGS)?,
            ..Self::default()
        })
    }

    /// Whether embedded fields may omit both markers.
    #[must_use]
    pub fn with_embedded_exempt(mut self, exempt: bool) -> Self {
        self.exempt_embedded = exempt;
        self
    }

    /// Whether type declarations must carry a marker too.
    #[must_use]
    pub fn with_types(mut self, check: bool) -> Self {
        self.check_types = check;
        self
    }

    /// Embedded fields are exempt.
    #[must_use]
    pub fn exempts_embedded(&self) -> bool {
        self.exempt_embedded
    }

    /// Type declarations are checked.
    #[must_use]
    pub fn checks_types(&self) -> bool {
        self.check_types
    }

    /// Preferred optional spelling.
    #[must_use]
    pub fn preferred_optional(&self) -> &'static str {
        self.preferred_optional
    }

    /// Preferred required spelling.
    #[must_use]
    pub fn preferred_required(&self) -> &'static str {
        self.preferred_required
    }
}

impl Default for OptionalOrRequiredConfig {
    fn default() -> Self {
        Self {
            preferred_optional: known::OPTIONAL,
            preferred_required: known::REQUIRED,
            exempt_embedded: true,
            check_types: true,
        }
    }
}

fn spelling(value: &str, accepted: &[&'static str]) -> Result<&'static str, ModelError> {
    accepted
        .iter()
        .copied()
        .find(|s| *s == value)
        .ok_or_else(|| ModelError::UnsupportedMarker {
            value: value.to_string(),
            expected: accepted.iter().map(|s| (*s).to_string()).collect(),
        })
}

/// Pattern JSON property names must match.
#[derive(Debug, Clone)]
pub struct JsonTagPattern(Regex);

impl JsonTagPattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        compile(pattern).map(Self)
    }

    /// Returns true if the name conforms.
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.0.is_match(name)
    }

    /// The pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for JsonTagPattern {
    fn default() -> Self {
        Self(DEFAULT_JSON_TAG.clone())
    }
}

/// Settings of the conditions check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionsConfig {
    /// Conditions must come first.
    pub is_first_field: FirstFieldPolicy,
    /// Protobuf tag handling.
    pub use_protobuf: ConditionsPolicy,
    /// Patch strategy marker and tag handling.
    pub use_patch_strategy: ConditionsPolicy,
}

impl Default for ConditionsConfig {
    fn default() -> Self {
        Self {
            is_first_field: FirstFieldPolicy::Warn,
            use_protobuf: ConditionsPolicy::SuggestFix,
            use_patch_strategy: ConditionsPolicy::SuggestFix,
        }
    }
}

/// Validated settings of every configurable rule.
#[derive(Debug, Clone)]
pub struct LintersConfig {
    /// Conflict sets.
    pub conflicts: Vec<ConflictSet>,
    /// Marker dependencies.
    pub dependencies: Vec<Dependency>,
    /// Marker scope check.
    pub marker_scope: MarkerScopeConfig,
    /// Naming conventions.
    pub naming_conventions: Vec<NamingConvention>,
    /// Reference naming policy.
    pub no_references: NoReferencesPolicy,
    /// Optional fields check.
    pub optional_fields: OptionalFieldsConfig,
    /// Required fields check.
    pub required_fields: RequiredFieldsConfig,
    /// Preferred optional/required spellings.
    pub optional_or_required: OptionalOrRequiredConfig,
    /// Numeric bounds envelope.
    pub numeric_bounds: NumericBounds,
    /// Forbidden markers.
    pub forbidden_markers: Vec<MarkerPattern>,
    /// Additional unique markers.
    pub unique_markers: Vec<UniqueMarker>,
    /// JSON property name pattern.
    pub json_tags: JsonTagPattern,
    /// Map policy.
    pub no_maps: NoMapsPolicy,
    /// Conditions check.
    pub conditions: ConditionsConfig,
}

impl Default for LintersConfig {
    fn default() -> Self {
        Self {
            conflicts: Vec::new(),
            dependencies: Vec::new(),
            marker_scope: MarkerScopeConfig::default(),
            naming_conventions: Vec::new(),
            no_references: NoReferencesPolicy::PreferAbbreviatedReference,
            optional_fields: OptionalFieldsConfig::default(),
            required_fields: RequiredFieldsConfig::default(),
            optional_or_required: OptionalOrRequiredConfig::default(),
            numeric_bounds: NumericBounds::default(),
            forbidden_markers: Vec::new(),
            unique_markers: Vec::new(),
            json_tags: JsonTagPattern::default(),
            no_maps: NoMapsPolicy::AllowStringToStringMaps,
            conditions: ConditionsConfig::default(),
        }
    }
}

impl LintersConfig {
    /// Identifiers the parser must treat as attribute-bearing markers.
    ///
    /// A pattern with a single attribute also matches the scalar spelling
    /// (`id:attr=value`), so only unique markers keyed by attributes and
    /// patterns with several attributes need registering.
    #[must_use]
    pub fn attribute_markers(&self) -> Vec<String> {
        let patterns = self
            .conflicts
            .iter()
            .flat_map(ConflictSet::patterns)
            .chain(self.forbidden_markers.iter())
            .chain(
                self.dependencies
                    .iter()
                    .flat_map(|d| std::iter::once(d.trigger()).chain(d.requires())),
            )
            .filter(|p| p.attributes.len() > 1)
            .map(|p| p.identifier.clone());
        let unique = self
            .unique_markers
            .iter()
            .filter(|u| !u.attributes.is_empty())
            .map(|u| u.identifier.clone());
        let mut ids: Vec<String> = patterns.chain(unique).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
