//! # kube-api-lint-rules
//!
//! Built-in lint rules for Kubernetes-style API declarations.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | KAL001 | `comment-start` | Field docs start with the JSON name |
//! | KAL002 | `conditions` | Shape, markers and tags of `Conditions` fields |
//! | KAL003 | `conflicting-markers` | Configured mutually exclusive marker sets |
//! | KAL004 | `default-or-required` | A default value on a required field |
//! | KAL005 | `dependent-markers` | Markers that need another marker |
//! | KAL006 | `duplicate-markers` | The same marker written twice |
//! | KAL007 | `enums` | Enum markers and PascalCase enum values |
//! | KAL008 | `forbidden-markers` | Configured forbidden markers |
//! | KAL009 | `integers` | `int`, `int8`, `int16` and unsigned integers |
//! | KAL010 | `json-tags` | Presence and camelCase of `json` tags |
//! | KAL011 | `marker-scope` | Markers on the wrong declaration or type |
//! | KAL012 | `max-length` | Length limits on strings and lists |
//! | KAL013 | `naming-conventions` | Configured naming conventions |
//! | KAL014 | `no-bools` | Booleans |
//! | KAL015 | `no-floats` | Floating-point numbers |
//! | KAL016 | `no-maps` | Maps |
//! | KAL017 | `no-phase` | Phase fields |
//! | KAL018 | `no-references` | `Reference`/`Ref` in field names |
//! | KAL019 | `no-timestamp` | `Timestamp` in field names |
//! | KAL020 | `numeric-bounds` | Minimum and maximum on numbers |
//! | KAL021 | `optional-fields` | Tags and pointers of optional fields |
//! | KAL022 | `optional-or-required` | Optional/required markers and spellings |
//! | KAL023 | `required-fields` | Tags and pointers of required fields |
//! | KAL024 | `array-of-struct` | List items without a required field |
//! | KAL025 | `status-optional` | Required members of status structs |
//! | KAL026 | `typo` | Misspelled or misspaced markers |
//! | KAL027 | `unique-markers` | Markers defined more than once |
//! | KAL028 | `malformed-markers` | Marker lines that do not parse |
//! | KAL029 | `no-nullable` | The `nullable` marker |
//!
//! ## Usage
//!
//! ```ignore
//! use kube_api_lint_core::{Analyzer, Config};
//! use kube_api_lint_rules::rules_from_config;
//!
//! let config = Config::from_file(path)?;
//! let analyzer = Analyzer::builder()
//!     .snapshot(snapshot)
//!     .rules(rules_from_config(&config)?)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fixes;
mod presets;
mod serialization;
#[cfg(test)]
mod testing;

pub mod array_of_struct;
pub mod comment_start;
pub mod conditions;
pub mod conflicting_markers;
pub mod default_or_required;
pub mod dependent_markers;
pub mod duplicate_markers;
pub mod enums;
pub mod forbidden_markers;
pub mod integers;
pub mod json_tags;
pub mod malformed_markers;
pub mod marker_scope;
pub mod max_length;
pub mod naming_conventions;
pub mod no_bools;
pub mod no_floats;
pub mod no_maps;
pub mod no_nullable;
pub mod no_phase;
pub mod no_references;
pub mod no_timestamp;
pub mod numeric_bounds;
pub mod optional_fields;
pub mod optional_or_required;
pub mod required_fields;
pub mod status_optional;
pub mod typo;
pub mod unique_markers;

pub use array_of_struct::ArrayOfStruct;
pub use comment_start::CommentStart;
pub use conditions::Conditions;
pub use conflicting_markers::ConflictingMarkers;
pub use default_or_required::DefaultOrRequired;
pub use dependent_markers::DependentMarkers;
pub use duplicate_markers::DuplicateMarkers;
pub use enums::Enums;
pub use forbidden_markers::ForbiddenMarkers;
pub use integers::Integers;
pub use json_tags::JsonTags;
pub use malformed_markers::MalformedMarkers;
pub use marker_scope::MarkerScope;
pub use max_length::MaxLength;
pub use naming_conventions::NamingConventions;
pub use no_bools::NoBools;
pub use no_floats::NoFloats;
pub use no_maps::NoMaps;
pub use no_nullable::NoNullable;
pub use no_phase::NoPhase;
pub use no_references::NoReferences;
pub use no_timestamp::NoTimestamp;
pub use numeric_bounds::NumericBounds;
pub use optional_fields::OptionalFields;
pub use optional_or_required::OptionalOrRequired;
pub use presets::{
    all_rules, all_rules_with, minimal_rules, recommended_rules, rules_from_config, strict_rules,
    Preset, RULE_NAMES,
};
pub use required_fields::RequiredFields;
pub use status_optional::StatusOptional;
pub use typo::Typo;
pub use unique_markers::UniqueMarkers;

/// Re-export core types for convenience.
pub use kube_api_lint_core::{Diagnostic, Rule, RuleBox};
