//! Rule reporting markers applied where they do not belong.
//!
//! Every cataloged marker has a scope (field, type or both) and, for
//! validation markers, the schema kinds it constrains. Unknown markers are
//! never checked.
//!
//! # Configuration
//!
//! ```toml
//! [linters.markerscope]
//! policy = "SuggestFix"   # or "Warn"
//!
//! [[linters.markerscope.overrides]]
//! identifier = "custom:Flag"
//! scope = "type"
//! ```

use crate::fixes::remove_marker;
use kube_api_lint_core::linters::{FixPolicy, MarkerScopeConfig};
use kube_api_lint_core::{DeclContext, Diagnostic, Rule, ScopeResolver, Suggestion};

/// Rule code for marker-scope.
pub const CODE: &str = "KAL011";

/// Rule name for marker-scope.
pub const NAME: &str = "marker-scope";

/// Checks marker placement against the catalog and overrides.
#[derive(Debug, Clone, Default)]
pub struct MarkerScope {
    /// Policy and overrides.
    pub config: MarkerScopeConfig,
}

impl MarkerScope {
    /// Creates a new rule with built-in scopes only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets policy and overrides.
    #[must_use]
    pub fn config(mut self, config: MarkerScopeConfig) -> Self {
        self.config = config;
        self
    }
}

impl Rule for MarkerScope {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Markers must be applied to the declarations and types they support"
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let resolver = ScopeResolver::new(ctx.package.catalog(), &self.config.overrides);
        let schema = ctx.describe().schema_kind();
        ctx.markers
            .iter()
            .filter_map(|marker| {
                let violation = resolver.check(marker, ctx.kind(), schema)?;
                let suggestion = (self.config.policy == FixPolicy::SuggestFix)
                    .then(|| Suggestion::with_fix("remove the marker", remove_marker(marker)));
                Some(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        marker.location.clone(),
                        format!("{}: {violation}", ctx.subject()),
                    )
                    .with_optional_suggestion(suggestion),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, run};
    use kube_api_lint_core::catalog::Scope;
    use kube_api_lint_core::scope::ScopeOverride;
    use kube_api_lint_core::{FieldDecl, Package, TypeDecl, TypeExpr};

    fn package() -> Package {
        Package::new("p").with_type(
            TypeDecl::structure(
                "WidgetSpec",
                vec![FieldDecl::new("Replicas", TypeExpr::named("int32"))
                    .at("types.go", 12)
                    .doc(&[
                        "// +optional",
                        "// +kubebuilder:validation:MaxLength=10",
                        "// +custom:Flag",
                    ])],
            )
            .at("types.go", 9)
            .doc(&["// +required", "// +k8s:unionMember"]),
        )
    }

    #[test]
    fn test_declaration_and_schema_violations() {
        let diagnostics = run(MarkerScope::new(), package());
        assert_eq!(
            messages(&diagnostics),
            vec![
                "type WidgetSpec: marker \"k8s:unionMember\" can only be applied to fields",
                "field Replicas: marker \"kubebuilder:validation:MaxLength\" can only be applied to string types, not integer",
            ]
        );
        assert!(diagnostics.iter().all(|d| !d.has_fix()));
    }

    #[test]
    fn test_override_and_fix_policy() {
        let mut config = MarkerScopeConfig {
            policy: FixPolicy::SuggestFix,
            ..MarkerScopeConfig::default()
        };
        config.overrides.insert(
            "custom:Flag".to_string(),
            ScopeOverride {
                scope: Scope::Type,
                schema: None,
            },
        );
        let diagnostics = run(MarkerScope::new().config(config), package());
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(
            diagnostics[2].message,
            "field Replicas: marker \"custom:Flag\" can only be applied to types"
        );
        assert!(diagnostics.iter().all(|d| d.has_fix()));
    }
}
