//! Rule presets and construction of the rule list from configuration.

use crate::{
    array_of_struct, comment_start, conditions, conflicting_markers, default_or_required,
    dependent_markers, duplicate_markers, enums, forbidden_markers, integers, json_tags,
    malformed_markers, marker_scope, max_length, naming_conventions, no_bools, no_floats, no_maps,
    no_nullable, no_phase, no_references, no_timestamp, numeric_bounds, optional_fields,
    optional_or_required, required_fields, status_optional, typo, unique_markers,
};
use crate::{
    ArrayOfStruct, CommentStart, Conditions, ConflictingMarkers, DefaultOrRequired,
    DependentMarkers, DuplicateMarkers, Enums, ForbiddenMarkers, Integers, JsonTags,
    MalformedMarkers, MarkerScope, MaxLength, NamingConventions, NoBools, NoFloats, NoMaps,
    NoNullable, NoPhase, NoReferences, NoTimestamp, NumericBounds, OptionalFields,
    OptionalOrRequired, RequiredFields, StatusOptional, Typo, UniqueMarkers,
};
use kube_api_lint_core::linters::LintersConfig;
use kube_api_lint_core::{Config, ConfigError, RuleBox};
use tracing::debug;

/// Preset configurations for kube-api-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule except the opinionated type restrictions.
    Recommended,
    /// Every rule.
    Strict,
    /// Markers that must be right before anything else matters.
    Minimal,
}

const OPT_IN: &[&str] = &[
    no_bools::NAME,
    no_maps::NAME,
    no_nullable::NAME,
    no_floats::NAME,
    max_length::NAME,
];

const MINIMAL: &[&str] = &[
    optional_or_required::NAME,
    json_tags::NAME,
    conflicting_markers::NAME,
    default_or_required::NAME,
    malformed_markers::NAME,
];

impl Preset {
    /// Known preset names, for error messages.
    pub const NAMES: &'static str = "recommended, strict, minimal";

    /// Looks a preset up by its configuration name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns true if the preset enables the named rule.
    #[must_use]
    pub fn includes(self, rule: &str) -> bool {
        match self {
            Self::Recommended => !OPT_IN.contains(&rule),
            Self::Strict => true,
            Self::Minimal => MINIMAL.contains(&rule),
        }
    }

    /// Returns the rules of this preset, configured from `linters`.
    #[must_use]
    pub fn rules_with(self, linters: &LintersConfig) -> Vec<RuleBox> {
        all_rules_with(linters)
            .into_iter()
            .filter(|rule| self.includes(rule.name()))
            .collect()
    }

    /// Returns the rules of this preset with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.rules_with(&LintersConfig::default())
    }
}

/// Returns the recommended set of rules.
///
/// Everything except `no-bools`, `no-maps`, `no-nullable`, `no-floats`
/// and `max-length`.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns every rule.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `optional-or-required` (KAL022)
/// - `json-tags` (KAL010)
/// - `conflicting-markers` (KAL003)
/// - `default-or-required` (KAL004)
/// - `malformed-markers` (KAL028)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    all_rules_with(&LintersConfig::default())
}

/// Returns all available rules configured from `linters`, in code order.
#[must_use]
pub fn all_rules_with(linters: &LintersConfig) -> Vec<RuleBox> {
    let optional_or_required = linters.optional_or_required.clone();
    vec![
        Box::new(CommentStart::new()),
        Box::new(Conditions::new().config(linters.conditions)),
        Box::new(ConflictingMarkers::new().conflicts(linters.conflicts.clone())),
        Box::new(DefaultOrRequired::new()),
        Box::new(DependentMarkers::new().dependencies(linters.dependencies.clone())),
        Box::new(DuplicateMarkers::new()),
        Box::new(Enums::new()),
        Box::new(ForbiddenMarkers::new().markers(linters.forbidden_markers.clone())),
        Box::new(Integers::new()),
        Box::new(JsonTags::new().pattern(linters.json_tags.clone())),
        Box::new(MarkerScope::new().config(linters.marker_scope.clone())),
        Box::new(MaxLength::new()),
        Box::new(NamingConventions::new().conventions(linters.naming_conventions.clone())),
        Box::new(NoBools::new()),
        Box::new(NoFloats::new()),
        Box::new(NoMaps::new().policy(linters.no_maps)),
        Box::new(NoPhase::new()),
        Box::new(NoReferences::new().policy(linters.no_references)),
        Box::new(NoTimestamp::new()),
        Box::new(NumericBounds::new().envelope(linters.numeric_bounds)),
        Box::new(OptionalFields::new().config(linters.optional_fields)),
        Box::new(OptionalOrRequired::new().config(optional_or_required.clone())),
        Box::new(RequiredFields::new().config(linters.required_fields)),
        Box::new(ArrayOfStruct::new()),
        Box::new(StatusOptional::new().config(optional_or_required)),
        Box::new(Typo::new()),
        Box::new(UniqueMarkers::new().custom(linters.unique_markers.clone())),
        Box::new(MalformedMarkers::new()),
        Box::new(NoNullable::new()),
    ]
}

/// Builds the rule list a configuration asks for.
///
/// The preset defaults to `recommended`. Rules outside the preset are still
/// enabled when `[rules.<name>] enabled = true`; `enabled = false` is
/// applied later, by the analyzer.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] for an unknown preset name.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::parse(name).ok_or_else(|| ConfigError::UnknownPreset {
            name: name.to_string(),
            expected: Preset::NAMES.to_string(),
        })?,
    };
    debug!("Using preset {preset:?}");

    Ok(all_rules_with(&config.linters)
        .into_iter()
        .filter(|rule| {
            preset.includes(rule.name())
                || config
                    .rules
                    .get(rule.name())
                    .and_then(|r| r.enabled)
                    .unwrap_or(false)
        })
        .collect())
}

/// Every rule code and name, in code order.
pub const RULE_NAMES: &[(&str, &str)] = &[
    (comment_start::CODE, comment_start::NAME),
    (conditions::CODE, conditions::NAME),
    (conflicting_markers::CODE, conflicting_markers::NAME),
    (default_or_required::CODE, default_or_required::NAME),
    (dependent_markers::CODE, dependent_markers::NAME),
    (duplicate_markers::CODE, duplicate_markers::NAME),
    (enums::CODE, enums::NAME),
    (forbidden_markers::CODE, forbidden_markers::NAME),
    (integers::CODE, integers::NAME),
    (json_tags::CODE, json_tags::NAME),
    (marker_scope::CODE, marker_scope::NAME),
    (max_length::CODE, max_length::NAME),
    (naming_conventions::CODE, naming_conventions::NAME),
    (no_bools::CODE, no_bools::NAME),
    (no_floats::CODE, no_floats::NAME),
    (no_maps::CODE, no_maps::NAME),
    (no_phase::CODE, no_phase::NAME),
    (no_references::CODE, no_references::NAME),
    (no_timestamp::CODE, no_timestamp::NAME),
    (numeric_bounds::CODE, numeric_bounds::NAME),
    (optional_fields::CODE, optional_fields::NAME),
    (optional_or_required::CODE, optional_or_required::NAME),
    (required_fields::CODE, required_fields::NAME),
    (array_of_struct::CODE, array_of_struct::NAME),
    (status_optional::CODE, status_optional::NAME),
    (typo::CODE, typo::NAME),
    (unique_markers::CODE, unique_markers::NAME),
    (malformed_markers::CODE, malformed_markers::NAME),
    (no_nullable::CODE, no_nullable::NAME),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(strict_rules().len(), 29);
        assert_eq!(recommended_rules().len(), 24);
        assert_eq!(
            names(&minimal_rules()),
            vec![
                "conflicting-markers",
                "default-or-required",
                "json-tags",
                "optional-or-required",
                "malformed-markers",
            ]
        );
    }

    #[test]
    fn test_codes_are_ordered_and_match_rules() {
        let rules = all_rules();
        assert_eq!(rules.len(), RULE_NAMES.len());
        for (rule, (code, name)) in rules.iter().zip(RULE_NAMES) {
            assert_eq!(rule.code(), *code);
            assert_eq!(rule.name(), *name);
        }
        let codes: Vec<&str> = RULE_NAMES.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_rules_from_config() {
        let config = Config::parse("preset = \"minimal\"\n[rules.no-bools]\nenabled = true").unwrap();
        let rules = rules_from_config(&config).unwrap();
        assert_eq!(rules.len(), 6);
        assert!(names(&rules).contains(&"no-bools"));

        let default = rules_from_config(&Config::default()).unwrap();
        assert_eq!(default.len(), 24);
    }

    #[test]
    fn test_unknown_preset() {
        let config = Config::parse("preset = \"everything\"").unwrap();
        assert!(matches!(
            rules_from_config(&config),
            Err(ConfigError::UnknownPreset { name, .. }) if name == "everything"
        ));
    }
}
