//! Rule checking the shape of `Conditions` fields.
//!
//! # Rationale
//!
//! Conditions are read by generic tooling, so every API exposes them the
//! same way: a list of `metav1.Condition` keyed by `type`, with the
//! markers and tags strategic merge patch and protobuf expect.
//!
//! # Configuration
//!
//! `[linters.conditions]`:
//! - `is_first_field`: `Warn` | `Ignore` (default: `Warn`)
//! - `use_protobuf`: `SuggestFix` | `Warn` | `Ignore` | `Forbid` (default: `SuggestFix`)
//! - `use_patch_strategy`: `SuggestFix` | `Warn` | `Ignore` | `Forbid` (default: `SuggestFix`)

use crate::fixes::insert_markers;
use kube_api_lint_core::linters::{ConditionsConfig, ConditionsPolicy, FirstFieldPolicy};
use kube_api_lint_core::markers::known;
use kube_api_lint_core::tags;
use kube_api_lint_core::typegraph::WellKnown;
use kube_api_lint_core::{
    DeclContext, DeclKind, Diagnostic, FieldDecl, MarkerPattern, Replacement, Rule, Suggestion,
    TypeKind,
};

/// Rule code for conditions.
pub const CODE: &str = "KAL002";

/// Rule name for conditions.
pub const NAME: &str = "conditions";

const FIELD_NAME: &str = "Conditions";
const DEFAULT_PROTOBUF: &str = "bytes,1,rep,name=conditions";

/// Checks `Conditions` fields.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    /// Policies for position, protobuf tags and patch strategy.
    pub config: ConditionsConfig,
}

impl Conditions {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policies.
    #[must_use]
    pub fn config(mut self, config: ConditionsConfig) -> Self {
        self.config = config;
        self
    }

    fn uses(policy: ConditionsPolicy) -> bool {
        matches!(policy, ConditionsPolicy::SuggestFix | ConditionsPolicy::Warn)
    }

    fn expected_markers(&self) -> Vec<&'static str> {
        let mut markers = vec!["listType=map", "listMapKey=type"];
        if Self::uses(self.config.use_patch_strategy) {
            markers.push("patchStrategy=merge");
            markers.push("patchMergeKey=type");
        }
        markers
    }

    fn expected_tag(&self, current: Option<&str>) -> String {
        let mut parts = vec!["json:\"conditions,omitempty\"".to_string()];
        if Self::uses(self.config.use_patch_strategy) {
            parts.push("patchStrategy:\"merge\"".to_string());
            parts.push("patchMergeKey:\"type\"".to_string());
        }
        if Self::uses(self.config.use_protobuf) {
            let protobuf = current
                .and_then(|raw| tags::lookup(raw, "protobuf"))
                .filter(|p| Self::protobuf_ok(p))
                .unwrap_or(DEFAULT_PROTOBUF);
            parts.push(format!("protobuf:\"{protobuf}\""));
        }
        parts.join(" ")
    }

    fn protobuf_ok(value: &str) -> bool {
        value.starts_with("bytes,") && value.ends_with(",rep,name=conditions")
    }

    fn tag_ok(&self, raw: &str) -> bool {
        let lookup = |key| tags::lookup(raw, key);
        let patch = match self.config.use_patch_strategy {
            ConditionsPolicy::SuggestFix | ConditionsPolicy::Warn => {
                lookup("patchStrategy") == Some("merge") && lookup("patchMergeKey") == Some("type")
            }
            ConditionsPolicy::Forbid => {
                lookup("patchStrategy").is_none() && lookup("patchMergeKey").is_none()
            }
            ConditionsPolicy::Ignore => true,
        };
        let protobuf = match self.config.use_protobuf {
            ConditionsPolicy::SuggestFix | ConditionsPolicy::Warn => {
                lookup("protobuf").is_some_and(Self::protobuf_ok)
            }
            ConditionsPolicy::Forbid => lookup("protobuf").is_none(),
            ConditionsPolicy::Ignore => true,
        };
        lookup("json") == Some("conditions,omitempty") && patch && protobuf
    }

    fn check_markers(&self, ctx: &DeclContext<'_, '_>, owner: &str, out: &mut Vec<Diagnostic>) {
        let mut expected: Vec<String> = self
            .expected_markers()
            .into_iter()
            .filter(|m| !ctx.markers.has_matching(&MarkerPattern::parse(m)))
            .map(str::to_string)
            .collect();
        if !ctx.markers.is_optional() {
            expected.push(known::OPTIONAL.to_string());
        }
        if !expected.is_empty() {
            let message = format!(
                "Conditions field in {owner} is missing the following markers: {}",
                expected.join(", ")
            );
            let suggestion = (self.config.use_patch_strategy != ConditionsPolicy::Warn).then(|| {
                Suggestion::with_fix(
                    "add the missing markers",
                    insert_markers(&ctx.location(), &expected),
                )
            });
            out.push(Diagnostic::new(CODE, NAME, ctx.location(), message).with_optional_suggestion(suggestion));
        }

        if self.config.use_patch_strategy == ConditionsPolicy::Forbid {
            let extra: Vec<String> = [known::PATCH_STRATEGY, known::PATCH_MERGE_KEY]
                .iter()
                .flat_map(|id| ctx.markers.get(id))
                .map(ToString::to_string)
                .collect();
            if !extra.is_empty() {
                out.push(Diagnostic::new(
                    CODE,
                    NAME,
                    ctx.location(),
                    format!(
                        "Conditions field in {owner} has the following additional markers: {}",
                        extra.join(", ")
                    ),
                ));
            }
        }
    }

    fn check_tags(&self, ctx: &DeclContext<'_, '_>, field: &FieldDecl, owner: &str, out: &mut Vec<Diagnostic>) {
        let raw = field.tag.as_ref().map(|t| t.raw.as_str());
        if raw.is_some_and(|raw| self.tag_ok(raw)) {
            return;
        }
        let expected = self.expected_tag(raw);
        let fix_allowed = self.config.use_protobuf == ConditionsPolicy::SuggestFix
            || self.config.use_patch_strategy == ConditionsPolicy::SuggestFix;
        let suggestion = field
            .tag
            .as_ref()
            .filter(|_| fix_allowed)
            .map(|tag| {
                let location = tag.location.clone().with_span(tag.location.offset, tag.raw.len());
                Suggestion::with_fix("replace the tags", Replacement::new(location, expected.clone()))
            });
        out.push(
            Diagnostic::new(
                CODE,
                NAME,
                ctx.location(),
                format!("Conditions field in {owner} has incorrect tags, should be: `{expected}`"),
            )
            .with_optional_suggestion(suggestion),
        );
    }
}

impl Rule for Conditions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Conditions fields must be []metav1.Condition with list and patch markers"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let Some(field) = ctx.field() else {
            return Vec::new();
        };
        if field.name != FIELD_NAME {
            return Vec::new();
        }
        let owner = ctx.decl.owner();

        let desc = ctx.describe();
        let is_condition_list = desc.kind == TypeKind::Slice
            && desc
                .elem
                .as_ref()
                .is_some_and(|e| e.well_known == Some(WellKnown::Condition) && !e.pointer);
        if !is_condition_list {
            return vec![Diagnostic::new(
                CODE,
                NAME,
                ctx.location(),
                format!("Conditions field in {} must be a slice of metav1.Condition", owner.name),
            )];
        }

        let mut out = Vec::new();
        if self.config.is_first_field == FirstFieldPolicy::Warn {
            let members = owner.struct_fields().unwrap_or_default();
            let direct = members.iter().any(|m| std::ptr::eq(m, field));
            let first = members.first().is_some_and(|m| std::ptr::eq(m, field));
            if direct && !first {
                out.push(Diagnostic::new(
                    CODE,
                    NAME,
                    ctx.location(),
                    format!("Conditions field in {} must be the first field in the struct", owner.name),
                ));
            }
        }
        self.check_markers(ctx, &owner.name, &mut out);
        self.check_tags(ctx, field, &owner.name, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::linters::ConditionsConfig;
    use kube_api_lint_core::{Package, TypeDecl, TypeExpr};

    const GOOD_TAG: &str =
        r#"json:"conditions,omitempty" patchStrategy:"merge" patchMergeKey:"type" protobuf:"bytes,3,rep,name=conditions""#;

    fn conditions(doc: &[&str], tag: &str) -> FieldDecl {
        FieldDecl::new(
            "Conditions",
            TypeExpr::slice(TypeExpr::external("metav1", "Condition")),
        )
        .at("types.go", 20)
        .doc(doc)
        .tag(tag)
    }

    fn package(fields: Vec<FieldDecl>) -> Package {
        Package::new("example.com/api/v1").with_type(TypeDecl::structure("WidgetStatus", fields))
    }

    const ALL_MARKERS: &[&str] = &[
        "// conditions describe the widget.",
        "// +listType=map",
        "// +listMapKey=type",
        "// +patchStrategy=merge",
        "// +patchMergeKey=type",
        "// +optional",
    ];

    #[test]
    fn test_well_formed_conditions_pass() {
        let diagnostics = run(Conditions::new(), package(vec![conditions(ALL_MARKERS, GOOD_TAG)]));
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_wrong_element_type() {
        let field = FieldDecl::new("Conditions", TypeExpr::slice(TypeExpr::named("string")));
        let diagnostics = run(Conditions::new(), package(vec![field]));
        assert_eq!(
            messages(&diagnostics),
            vec!["Conditions field in WidgetStatus must be a slice of metav1.Condition"]
        );
    }

    #[test]
    fn test_missing_markers_are_listed_once() {
        let diagnostics = run(
            Conditions::new(),
            package(vec![conditions(&["// +listType=map"], GOOD_TAG)]),
        );
        assert_eq!(
            messages(&diagnostics),
            vec!["Conditions field in WidgetStatus is missing the following markers: listMapKey=type, patchStrategy=merge, patchMergeKey=type, optional"]
        );
        assert!(diagnostics[0].has_fix());
    }

    #[test]
    fn test_incorrect_tags_keep_protobuf_number() {
        let diagnostics = run(
            Conditions::new(),
            package(vec![conditions(
                ALL_MARKERS,
                r#"json:"conditions" protobuf:"bytes,3,rep,name=conditions""#,
            )]),
        );
        assert_eq!(diagnostics.len(), 1);
        let fix = diagnostics[0]
            .suggestion
            .as_ref()
            .and_then(|s| s.replacement.as_ref())
            .expect("fix expected");
        assert_eq!(fix.new_text, GOOD_TAG);
    }

    #[test]
    fn test_must_be_first_field() {
        let phase = FieldDecl::new("ObservedGeneration", TypeExpr::named("int64"));
        let diagnostics = run(
            Conditions::new(),
            package(vec![phase, conditions(ALL_MARKERS, GOOD_TAG)]),
        );
        assert_eq!(
            messages(&diagnostics),
            vec!["Conditions field in WidgetStatus must be the first field in the struct"]
        );

        let config = ConditionsConfig {
            is_first_field: FirstFieldPolicy::Ignore,
            ..ConditionsConfig::default()
        };
        let phase = FieldDecl::new("ObservedGeneration", TypeExpr::named("int64"));
        let diagnostics = run(
            Conditions::new().config(config),
            package(vec![phase, conditions(ALL_MARKERS, GOOD_TAG)]),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_forbidden_patch_strategy() {
        let config = ConditionsConfig {
            use_patch_strategy: ConditionsPolicy::Forbid,
            use_protobuf: ConditionsPolicy::Ignore,
            ..ConditionsConfig::default()
        };
        let diagnostics = run(
            Conditions::new().config(config),
            package(vec![conditions(ALL_MARKERS, GOOD_TAG)]),
        );
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Conditions field in WidgetStatus has the following additional markers: patchStrategy=merge, patchMergeKey=type",
                "Conditions field in WidgetStatus has incorrect tags, should be: `json:\"conditions,omitempty\"`",
            ]
        );
    }
}
