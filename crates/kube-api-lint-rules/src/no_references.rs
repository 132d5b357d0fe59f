//! Rule on the words used for reference fields.
//!
//! # Configuration
//!
//! `[linters.noreferences] policy = "PreferAbbreviatedReference" | "NoReferences"`
//!
//! With `PreferAbbreviatedReference`, `Reference` becomes `Ref` and
//! `References` becomes `Refs`. With `NoReferences`, none of the four
//! words may appear.

use crate::fixes::rename;
use kube_api_lint_core::linters::NoReferencesPolicy;
use kube_api_lint_core::utils::split_words;
use kube_api_lint_core::{DeclContext, DeclKind, Diagnostic, Rule, Suggestion};

/// Rule code for no-references.
pub const CODE: &str = "KAL018";

/// Rule name for no-references.
pub const NAME: &str = "no-references";

const REFERENCE_WORDS: &[&str] = &["Ref", "Refs", "Reference", "References"];

/// Checks reference words in field names.
#[derive(Debug, Clone, Copy)]
pub struct NoReferences {
    /// Naming policy.
    pub policy: NoReferencesPolicy,
}

impl Default for NoReferences {
    fn default() -> Self {
        Self {
            policy: NoReferencesPolicy::PreferAbbreviatedReference,
        }
    }
}

impl NoReferences {
    /// Creates a new rule preferring abbreviations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy.
    #[must_use]
    pub fn policy(mut self, policy: NoReferencesPolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn abbreviate(word: &str) -> Option<&'static str> {
    match word {
        "Reference" => Some("Ref"),
        "References" => Some("Refs"),
        _ => None,
    }
}

impl Rule for NoReferences {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reference fields use the configured naming"
    }

    fn applies_to(&self, kind: DeclKind) -> bool {
        kind == DeclKind::Field
    }

    fn check(&self, ctx: &DeclContext<'_, '_>) -> Vec<Diagnostic> {
        let name = ctx.name();
        let words = split_words(name);

        let (message, renamed) = match self.policy {
            NoReferencesPolicy::PreferAbbreviatedReference => {
                let Some((word, short)) = words.iter().find_map(|w| abbreviate(w).map(|s| (w, s))) else {
                    return Vec::new();
                };
                let renamed: String = words
                    .iter()
                    .map(|w| abbreviate(w).unwrap_or(w.as_str()))
                    .collect();
                (
                    format!("{} should use {short:?} instead of {word:?}", ctx.subject()),
                    renamed,
                )
            }
            NoReferencesPolicy::NoReferences => {
                let Some(word) = words.iter().find(|w| REFERENCE_WORDS.contains(&w.as_str())) else {
                    return Vec::new();
                };
                let renamed: String = words
                    .iter()
                    .filter(|w| !REFERENCE_WORDS.contains(&w.as_str()))
                    .map(String::as_str)
                    .collect();
                (
                    format!(
                        "{} should not use a reference word ({word:?}) in its name",
                        ctx.subject()
                    ),
                    renamed,
                )
            }
        };

        let suggestion = (!renamed.is_empty()).then(|| {
            Suggestion::with_fix(
                format!("rename to {renamed}"),
                rename(ctx.decl.location(), name, &renamed),
            )
        });
        vec![Diagnostic::new(CODE, NAME, ctx.location(), message).with_optional_suggestion(suggestion)]
    }
}
