//! Core types for diagnostics and lint results.

use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source code location.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as reported by the source collaborator.
    #[serde(default)]
    pub file: PathBuf,
    /// Line number (1-indexed).
    #[serde(default)]
    pub line: usize,
    /// Column number (1-indexed).
    #[serde(default)]
    pub column: usize,
    /// Byte offset in file (for miette integration).
    #[serde(default)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Returns the same location moved `lines` lines up, keeping the file.
    #[must_use]
    pub fn lines_before(&self, lines: usize) -> Self {
        Self::new(self.file.clone(), self.line.saturating_sub(lines), self.column)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A labeled span for additional context in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A suggested fix for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Optional automatic replacement.
    pub replacement: Option<Replacement>,
}

impl Suggestion {
    /// Creates a new suggestion without automatic fix.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: None,
        }
    }

    /// Creates a new suggestion with automatic fix.
    #[must_use]
    pub fn with_fix(message: impl Into<String>, replacement: Replacement) -> Self {
        Self {
            message: message.into(),
            replacement: Some(replacement),
        }
    }
}

/// An automatic text replacement.
///
/// The span is `location` plus `location.length` bytes; a zero length
/// inserts `new_text` at the location. An empty `new_text` deletes the span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Location to replace.
    pub location: Location,
    /// New text to insert.
    pub new_text: String,
}

impl Replacement {
    /// Creates a new replacement.
    #[must_use]
    pub fn new(location: Location, new_text: impl Into<String>) -> Self {
        Self {
            location,
            new_text: new_text.into(),
        }
    }
}

/// A finding produced by a rule.
///
/// Diagnostics are created by rules, passed through the emitter unchanged,
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "KAL020").
    pub code: String,
    /// Rule name (e.g., "numeric-bounds").
    pub rule: String,
    /// Primary location of the finding.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a suggestion only when one is given.
    #[must_use]
    pub fn with_optional_suggestion(mut self, suggestion: Option<Suggestion>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Adds a label to this diagnostic.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Returns true if the diagnostic carries an automatic fix.
    #[must_use]
    pub fn has_fix(&self) -> bool {
        self.suggestion
            .as_ref()
            .is_some_and(|s| s.replacement.is_some())
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.location);
        let _ = writeln!(output, "  issue: {}", self.message);
        for label in &self.labels {
            let _ = writeln!(output, "  = note: {} ({})", label.message, label.location);
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: [{}] {}", self.location, self.code, self.message)
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich error display.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {} ({})", d.code, d.message, d.location),
            help: d.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((d.location.offset, d.location.length)),
            label_message: d.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics found, in deterministic order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of declarations (types and fields) checked.
    pub declarations_checked: usize,
    /// Number of packages checked.
    pub packages_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any diagnostic was reported.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Returns diagnostics reported by a given rule name.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.rule == rule).collect()
    }

    /// Counts diagnostics that carry an automatic fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.has_fix()).count()
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.declarations_checked += other.declarations_checked;
        self.packages_checked += other.packages_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic() -> Diagnostic {
        Diagnostic::new(
            "KAL020",
            "numeric-bounds",
            Location::new("api/v1/types.go", 42, 2),
            "field Count should have minimum and maximum bounds validation markers",
        )
    }

    #[test]
    fn format_includes_location_and_message() {
        let formatted = make_diagnostic().format();
        assert!(formatted.starts_with("KAL020 numeric-bounds at api/v1/types.go:42:2"));
        assert!(formatted.contains("issue: field Count should have minimum"));
    }

    #[test]
    fn format_includes_suggestion() {
        let d = make_diagnostic().with_suggestion(Suggestion::new("add +kubebuilder:validation:Minimum"));
        assert!(d.format().contains("= help: add +kubebuilder:validation:Minimum"));
    }

    #[test]
    fn display_is_single_line() {
        let display = format!("{}", make_diagnostic());
        assert_eq!(
            display,
            "api/v1/types.go:42:2: [KAL020] field Count should have minimum and maximum bounds validation markers"
        );
    }

    #[test]
    fn has_fix_requires_replacement() {
        let plain = make_diagnostic().with_suggestion(Suggestion::new("do something"));
        assert!(!plain.has_fix());

        let fixed = make_diagnostic().with_suggestion(Suggestion::with_fix(
            "add omitempty",
            Replacement::new(Location::new("a.go", 1, 1), "json:\"a,omitempty\""),
        ));
        assert!(fixed.has_fix());
    }

    #[test]
    fn result_counts_and_filters() {
        let mut result = LintResult::new();
        assert!(!result.has_issues());
        result.diagnostics.push(make_diagnostic());
        result.declarations_checked = 3;
        assert!(result.has_issues());
        assert_eq!(result.by_rule("numeric-bounds").len(), 1);
        assert!(result.by_rule("no-bools").is_empty());
        assert_eq!(result.fixable_count(), 0);
    }

    #[test]
    fn lines_before_saturates() {
        let loc = Location::new("a.go", 2, 5);
        assert_eq!(loc.lines_before(1).line, 1);
        assert_eq!(loc.lines_before(10).line, 0);
    }
}
