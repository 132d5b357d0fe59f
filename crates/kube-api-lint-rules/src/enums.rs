//! Rule checking enum declarations and enum values.
//!
//! # Rationale
//!
//! Enum values are part of the API and follow the same `PascalCase`
//! convention as type names. String types with a closed set of values
//! should say so with an enum marker, so clients and validation agree.
//!
//! # Checks
//!
//! - values of `+kubebuilder:validation:Enum` lists must be `PascalCase`
//! - for `+enum` / `+k8s:enum` types without a list, the values of the
//!   constants declared with the type must be `PascalCase`
//! - a string type with typed constants, or a plain string field whose
//!   name ends like an enum (`Type`, `Mode`, ...), needs an enum marker

use kube_api_lint_core::markers::{known, unquote};
use kube_api_lint_core::source::ConstValue;
use kube_api_lint_core::utils::{is_pascal_case, to_pascal_case};
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Location, Rule, Suggestion};

/// Rule code for enums.
pub const CODE: &str = "KAL007";

/// Rule name for enums.
pub const NAME: &str = "enums";

/// Field name endings that suggest a closed set of values.
const ENUM_LIKE_SUFFIXES: &[&str] = &["Type", "Mode", "Policy", "Strategy", "State"];

/// Checks enum markers and enum values.
#[derive(Debug, Clone, Default)]
pub struct Enums;

impl Enums {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn value_diagnostic(value: &str, location: Location) -> Diagnostic {
    let suggested = to_pascal_case(value);
    Diagnostic::new(
        CODE,
        NAME,
        location,
        format!("enum value {value:?} should be PascalCase"),
    )
    .with_suggestion(Suggestion::new(format!("use {suggested:?}")))
}

fn missing_marker(ctx: &DeclContext<'_, '_>) -> Diagnostic {
    Diagnostic::new(
        CODE,
        NAME,
        ctx.location(),
        format!(
            "{} should be an enum: add a +enum or +kubebuilder:validation:Enum marker",
            ctx.subject()
        ),
    )
}

fn conforms(value: &str) -> bool {
    value.is_empty() || is_pascal_case(value)
}

fn check_type(ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
    if !ctx.describe().is_string() {
        return Vec::new();
    }
    let constants = ctx.package.enum_values(ctx.name());

    // A valueless Enum marker falls through to constant discovery.
    let listed = ctx
        .markers
        .get_single(known::KUBEBUILDER_ENUM)
        .and_then(|m| m.unquoted_value().map(|values| (m, values)));
    if let Some((list, values)) = listed {
        return values
            .split(';')
            .map(unquote)
            .filter(|value| !conforms(value))
            .map(|value| value_diagnostic(value, list.location.clone()))
            .collect();
    }

    if !ctx.markers.has_any(known::ENUM_SPELLINGS) {
        return if constants.is_empty() {
            Vec::new()
        } else {
            vec![missing_marker(ctx)]
        };
    }

    constants
        .iter()
        .filter_map(|constant| match &constant.value {
            ConstValue::Str(value) if !conforms(value) => {
                Some(value_diagnostic(value, constant.location.clone()))
            }
            _ => None,
        })
        .collect()
}

fn check_field(ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
    let desc = ctx.describe();
    let plain_string = desc.is_string() && desc.named.is_empty();
    let enum_like = ENUM_LIKE_SUFFIXES.iter().any(|s| ctx.name().ends_with(s));
    if plain_string && enum_like && !ctx.markers.has_any(known::ENUM_SPELLINGS) {
        return vec![missing_marker(ctx)];
    }
    Vec::new()
}

impl Rule for Enums {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enum values must be PascalCase and enum-like strings need an enum marker"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        match ctx.kind() {
            DeclKind::Type => check_type(ctx),
            DeclKind::Field => check_field(ctx),
        }
    }
}
