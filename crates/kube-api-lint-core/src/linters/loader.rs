//! DTO → model conversion with validation.

use super::config_dto::{
    ConditionsDto, ConflictDto, DependencyDto, LintersDto, NamingConventionDto, SerializationDto,
};
use super::model::{
    ConditionsConfig, ConditionsPolicy, ConflictSet, Dependency, FirstFieldPolicy, FixPolicy,
    JsonTagPattern, LintersConfig, MarkerScopeConfig, ModelError, NamingConvention,
    NamingOperation, NoMapsPolicy, NoReferencesPolicy, NumericBounds, OmitEmptyPolicy,
    OmitZeroPolicy, OptionalFieldsConfig, OptionalOrRequiredConfig, PointerPreference,
    RequiredFieldsConfig, UniqueMarker,
};
use crate::markers::MarkerPattern;
use std::collections::HashMap;

/// Errors during DTO → model conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "linters.conflictingmarkers.conflicts[0]").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown policy keyword.
    #[error("{context}: unknown policy `{value}`, expected one of: {expected}")]
    UnknownPolicy {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
        /// Accepted keywords.
        expected: String,
    },
}

fn validation(context: impl Into<String>) -> impl FnOnce(ModelError) -> LoadError {
    let context = context.into();
    move |source| LoadError::Validation { context, source }
}

macro_rules! policy_or {
    ($ty:ty, $value:expr, $default:expr, $context:expr) => {
        match $value.as_deref() {
            None => Ok($default),
            Some(v) => <$ty>::parse(v).ok_or_else(|| LoadError::UnknownPolicy {
                context: $context.to_string(),
                value: v.to_string(),
                expected: <$ty>::EXPECTED.trim_end().replace(' ', ", "),
            }),
        }
    };
}

/// Converts a `LintersDto` to a validated `LintersConfig`.
///
/// Absent sections and keys take their defaults.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: LintersDto) -> Result<LintersConfig, LoadError> {
    let defaults = LintersConfig::default();

    let conflicts = dto
        .conflictingmarkers
        .conflicts
        .iter()
        .enumerate()
        .map(|(i, c)| convert_conflict(c, i))
        .collect::<Result<Vec<_>, _>>()?;

    let dependencies = dto
        .dependentmarkers
        .rules
        .iter()
        .enumerate()
        .map(|(i, d)| convert_dependency(d, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut overrides = HashMap::new();
    for (i, o) in dto.markerscope.overrides.iter().enumerate() {
        let parsed = MarkerScopeConfig::parse_override(&o.scope, o.schema.as_deref())
            .map_err(validation(format!("linters.markerscope.overrides[{i}]")))?;
        overrides.insert(o.identifier.clone(), parsed);
    }
    let marker_scope = MarkerScopeConfig {
        policy: policy_or!(
            FixPolicy,
            dto.markerscope.policy,
            defaults.marker_scope.policy,
            "linters.markerscope.policy"
        )?,
        overrides,
    };

    let naming_conventions = dto
        .namingconventions
        .conventions
        .iter()
        .enumerate()
        .map(|(i, c)| convert_naming(c, i))
        .collect::<Result<Vec<_>, _>>()?;

    let no_references = policy_or!(
        NoReferencesPolicy,
        dto.noreferences.policy,
        defaults.no_references,
        "linters.noreferences.policy"
    )?;

    let optional_fields = convert_optional(&dto.optionalfields, defaults.optional_fields)?;
    let required_fields = convert_required(&dto.requiredfields, defaults.required_fields)?;

    let preferred = &dto.optionalorrequired;
    let optional_or_required = OptionalOrRequiredConfig::new(
        preferred
            .preferred_optional_marker
            .as_deref()
            .unwrap_or(defaults.optional_or_required.preferred_optional()),
        preferred
            .preferred_required_marker
            .as_deref()
            .unwrap_or(defaults.optional_or_required.preferred_required()),
    )
    .map_err(validation("linters.optionalorrequired"))?
    .with_embedded_exempt(
        preferred
            .exempt_embedded_fields
            .unwrap_or(defaults.optional_or_required.exempts_embedded()),
    )
    .with_types(
        preferred
            .check_types
            .unwrap_or(defaults.optional_or_required.checks_types()),
    );

    let numeric_bounds = NumericBounds::new(
        dto.numericbounds.min.unwrap_or(defaults.numeric_bounds.min()),
        dto.numericbounds.max.unwrap_or(defaults.numeric_bounds.max()),
    )
    .map_err(validation("linters.numericbounds"))?;

    let forbidden_markers = dto
        .forbiddenmarkers
        .markers
        .iter()
        .enumerate()
        .map(|(i, m)| pattern(&m.identifier, &format!("linters.forbiddenmarkers.markers[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let unique_markers = dto
        .uniquemarkers
        .custom_markers
        .into_iter()
        .enumerate()
        .map(|(i, m)| {
            if m.identifier.is_empty() {
                return Err(LoadError::Validation {
                    context: format!("linters.uniquemarkers.custom_markers[{i}].identifier"),
                    source: ModelError::Empty,
                });
            }
            Ok(UniqueMarker {
                identifier: m.identifier,
                attributes: m.attributes,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let json_tags = match dto.jsontags.json_tag_regex.as_deref() {
        Some(pattern) => JsonTagPattern::new(pattern)
            .map_err(validation("linters.jsontags.json_tag_regex"))?,
        None => defaults.json_tags,
    };

    let no_maps = policy_or!(
        NoMapsPolicy,
        dto.nomaps.policy,
        defaults.no_maps,
        "linters.nomaps.policy"
    )?;

    let conditions = convert_conditions(&dto.conditions, defaults.conditions)?;

    Ok(LintersConfig {
        conflicts,
        dependencies,
        marker_scope,
        naming_conventions,
        no_references,
        optional_fields,
        required_fields,
        optional_or_required,
        numeric_bounds,
        forbidden_markers,
        unique_markers,
        json_tags,
        no_maps,
        conditions,
    })
}

fn pattern(identifier: &str, context: &str) -> Result<MarkerPattern, LoadError> {
    if identifier.trim().is_empty() {
        return Err(LoadError::Validation {
            context: context.to_string(),
            source: ModelError::Empty,
        });
    }
    Ok(MarkerPattern::parse(identifier.trim()))
}

fn convert_conflict(dto: &ConflictDto, index: usize) -> Result<ConflictSet, LoadError> {
    let ctx = format!("linters.conflictingmarkers.conflicts[{index}]");
    let sets = dto
        .sets
        .iter()
        .enumerate()
        .map(|(s, set)| {
            set.iter()
                .enumerate()
                .map(|(m, id)| pattern(id, &format!("{ctx}.sets[{s}][{m}]")))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    ConflictSet::new(&dto.name, sets, &dto.description).map_err(validation(ctx))
}

fn convert_dependency(dto: &DependencyDto, index: usize) -> Result<Dependency, LoadError> {
    let ctx = format!("linters.dependentmarkers.rules[{index}]");
    let trigger = pattern(&dto.identifier, &format!("{ctx}.identifier"))?;
    let requires = dto
        .requires
        .iter()
        .enumerate()
        .map(|(i, id)| pattern(id, &format!("{ctx}.requires[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    Dependency::new(trigger, requires).map_err(validation(ctx))
}

fn convert_naming(dto: &NamingConventionDto, index: usize) -> Result<NamingConvention, LoadError> {
    let ctx = format!("linters.namingconventions.conventions[{index}]");
    let operation = match dto.operation.as_str() {
        "Inform" => NamingOperation::Inform,
        "Drop" => NamingOperation::Drop,
        "Replacement" => match &dto.replacement {
            Some(text) => NamingOperation::Replacement(text.clone()),
            None => {
                return Err(LoadError::Validation {
                    context: ctx,
                    source: ModelError::MissingReplacement {
                        name: dto.name.clone(),
                    },
                })
            }
        },
        other => {
            return Err(LoadError::UnknownPolicy {
                context: format!("{ctx}.operation"),
                value: other.to_string(),
                expected: "Inform, Drop, Replacement".to_string(),
            })
        }
    };
    NamingConvention::new(&dto.name, &dto.violation_matcher, operation, &dto.message)
        .map_err(validation(ctx))
}

fn convert_optional(
    dto: &SerializationDto,
    defaults: OptionalFieldsConfig,
) -> Result<OptionalFieldsConfig, LoadError> {
    Ok(OptionalFieldsConfig {
        pointer_preference: policy_or!(
            PointerPreference,
            dto.pointers.preference,
            defaults.pointer_preference,
            "linters.optionalfields.pointers.preference"
        )?,
        pointer_policy: policy_or!(
            FixPolicy,
            dto.pointers.policy,
            defaults.pointer_policy,
            "linters.optionalfields.pointers.policy"
        )?,
        omitempty: policy_or!(
            OmitEmptyPolicy,
            dto.omitempty.policy,
            defaults.omitempty,
            "linters.optionalfields.omitempty.policy"
        )?,
        omitzero: policy_or!(
            OmitZeroPolicy,
            dto.omitzero.policy,
            defaults.omitzero,
            "linters.optionalfields.omitzero.policy"
        )?,
    })
}

fn convert_required(
    dto: &SerializationDto,
    defaults: RequiredFieldsConfig,
) -> Result<RequiredFieldsConfig, LoadError> {
    Ok(RequiredFieldsConfig {
        pointer_policy: policy_or!(
            FixPolicy,
            dto.pointers.policy,
            defaults.pointer_policy,
            "linters.requiredfields.pointers.policy"
        )?,
        omitempty: policy_or!(
            OmitEmptyPolicy,
            dto.omitempty.policy,
            defaults.omitempty,
            "linters.requiredfields.omitempty.policy"
        )?,
        omitzero: policy_or!(
            OmitZeroPolicy,
            dto.omitzero.policy,
            defaults.omitzero,
            "linters.requiredfields.omitzero.policy"
        )?,
    })
}

fn convert_conditions(
    dto: &ConditionsDto,
    defaults: ConditionsConfig,
) -> Result<ConditionsConfig, LoadError> {
    Ok(ConditionsConfig {
        is_first_field: policy_or!(
            FirstFieldPolicy,
            dto.is_first_field,
            defaults.is_first_field,
            "linters.conditions.is_first_field"
        )?,
        use_protobuf: policy_or!(
            ConditionsPolicy,
            dto.use_protobuf,
            defaults.use_protobuf,
            "linters.conditions.use_protobuf"
        )?,
        use_patch_strategy: policy_or!(
            ConditionsPolicy,
            dto.use_patch_strategy,
            defaults.use_patch_strategy,
            "linters.conditions.use_patch_strategy"
        )?,
    })
}
