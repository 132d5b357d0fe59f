//! Serialization checks shared by the optional and required field rules.
//!
//! Two questions are asked of every field, in this order:
//!
//! 1. Does the `json` tag carry the option that omits the field's zero
//!    value (`omitzero` for struct values, `omitempty` otherwise)?
//! 2. Does the pointer-ness of the field match its zero-value semantics?
//!    A pointer is needed when the zero value is a valid choice, so that
//!    "unset" and "set to zero" serialize differently.

use kube_api_lint_core::linters::{FixPolicy, OmitEmptyPolicy, OmitZeroPolicy, PointerPreference};
use kube_api_lint_core::tags::{self, OMIT_EMPTY, OMIT_ZERO};
use kube_api_lint_core::{DeclContext, Diagnostic, FieldDecl, Suggestion, TypeKind, ZeroValue};

/// Policies in effect for one rule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub preference: PointerPreference,
    pub pointer_policy: FixPolicy,
    pub omitempty: OmitEmptyPolicy,
    pub omitzero: OmitZeroPolicy,
}

struct Reporter<'r, 'c, 'a> {
    code: &'static str,
    name: &'static str,
    ctx: &'r DeclContext<'c, 'a>,
    out: Vec<Diagnostic>,
}

impl Reporter<'_, '_, '_> {
    fn push(&mut self, text: &str, suggestion: Option<Suggestion>) {
        self.out.push(
            Diagnostic::new(
                self.code,
                self.name,
                self.ctx.location(),
                format!("{} {text}", self.ctx.subject()),
            )
            .with_optional_suggestion(suggestion),
        );
    }
}

/// Runs both checks over a field already known to be in scope.
pub(crate) fn check(
    code: &'static str,
    name: &'static str,
    ctx: &DeclContext<'_, '_>,
    settings: Settings,
) -> Vec<Diagnostic> {
    let Some(field) = ctx.field() else {
        return Vec::new();
    };
    if field.embedded {
        return Vec::new();
    }
    let tag = ctx.json_tag();
    if tag.as_ref().is_some_and(tags::JsonTag::ignored) {
        return Vec::new();
    }
    let Some(zero) = ctx.package.zero_value(field) else {
        return Vec::new();
    };

    let desc = ctx.describe();
    let struct_value = desc.kind == TypeKind::Struct && !desc.pointer;
    let has = |option: &str| tag.as_ref().is_some_and(|t| t.has(option));

    let mut reporter = Reporter {
        code,
        name,
        ctx,
        out: Vec::new(),
    };

    if struct_value && settings.omitzero != OmitZeroPolicy::Forbid {
        if !has(OMIT_ZERO) {
            let fix = (settings.omitzero == OmitZeroPolicy::SuggestFix)
                .then(|| option_fix(field, OMIT_ZERO, true))
                .flatten();
            reporter.push("should have the omitzero tag.", fix);
        }
    } else {
        if settings.omitzero == OmitZeroPolicy::Forbid && has(OMIT_ZERO) {
            reporter.push(
                "should not have the omitzero tag.",
                option_fix(field, OMIT_ZERO, false),
            );
        }
        if settings.omitempty != OmitEmptyPolicy::Ignore && !has(OMIT_EMPTY) {
            let fix = (settings.omitempty == OmitEmptyPolicy::SuggestFix)
                .then(|| option_fix(field, OMIT_EMPTY, true))
                .flatten();
            reporter.push("should have the omitempty tag.", fix);
        }
    }

    check_pointer(&mut reporter, &zero, desc.pointer, desc.kind, settings);
    reporter.out
}

fn check_pointer(
    reporter: &mut Reporter<'_, '_, '_>,
    zero: &ZeroValue,
    pointer: bool,
    kind: TypeKind,
    settings: Settings,
) {
    let suggest = |message: &str| {
        (settings.pointer_policy == FixPolicy::SuggestFix).then(|| Suggestion::new(message))
    };

    if kind.is_collection() {
        if pointer {
            reporter.push(
                "is a pointer to a slice or map, which does not need to be a pointer. The pointer should be removed.",
                suggest("remove the pointer"),
            );
        }
        return;
    }

    let always = settings.preference == PointerPreference::Always;
    let forbidden_struct = kind == TypeKind::Struct && settings.omitzero == OmitZeroPolicy::Forbid;
    let needs_pointer = always || zero.is_valid() || forbidden_struct;

    if !pointer && needs_pointer {
        let text = if always || !zero.is_valid() {
            "should be a pointer.".to_string()
        } else if zero.is_complete() {
            format!("has a valid zero value ({}) and should be a pointer.", zero.literal)
        } else {
            format!(
                "has a valid zero value ({}), but the validation is not complete (e.g. minimum length). The field should be a pointer to allow the zero value to be set. If the zero value is not a valid use case, complete the validation and remove the pointer.",
                zero.literal
            )
        };
        reporter.push(&text, suggest("make the field a pointer"));
    } else if pointer && !needs_pointer && zero.is_complete() {
        reporter.push(
            "does not allow the zero value. The field does not need to be a pointer.",
            suggest("remove the pointer"),
        );
    }
}

fn option_fix(field: &FieldDecl, option: &str, add: bool) -> Option<Suggestion> {
    let replacement = if add {
        tags::add_option_fix(field, option)?
    } else {
        tags::remove_option_fix(field, option)?
    };
    let verb = if add { "add" } else { "remove" };
    Some(Suggestion::with_fix(format!("{verb} the {option} tag"), replacement))
}
