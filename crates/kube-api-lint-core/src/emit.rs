//! Diagnostic ordering and output formats.

use crate::types::{Diagnostic, LintResult};
use std::io::{self, Write};

/// Sorts diagnostics by file, line, column and rule code.
///
/// The sort is stable: diagnostics one rule reports at the same location
/// keep the order the rule produced them in.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
            .then_with(|| a.code.cmp(&b.code))
    });
}

/// Writes a lint result in one output format.
pub trait Emitter {
    /// Writes every diagnostic of `result` to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn emit(&self, result: &LintResult, out: &mut dyn Write) -> io::Result<()>;
}

/// Human-readable output with help lines and a summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEmitter {
    color: bool,
}

impl TextEmitter {
    /// Creates a plain-text emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl Emitter for TextEmitter {
    fn emit(&self, result: &LintResult, out: &mut dyn Write) -> io::Result<()> {
        for d in &result.diagnostics {
            writeln!(out, "{} {} at {}", d.code, d.rule, d.location)?;
            writeln!(out, "  {}: {}", self.paint("33", "issue"), d.message)?;
            for label in &d.labels {
                writeln!(out, "  = note: {} ({})", label.message, label.location)?;
            }
            if let Some(suggestion) = &d.suggestion {
                writeln!(out, "  = help: {}", suggestion.message)?;
                if let Some(fix) = &suggestion.replacement {
                    writeln!(out, "  = fix: {} -> {}", fix.location, fix.new_text)?;
                }
            }
            writeln!(out)?;
        }

        let summary = format!(
            "Found {} issue(s) ({} fixable) in {} declaration(s) across {} package(s)",
            result.diagnostics.len(),
            result.fixable_count(),
            result.declarations_checked,
            result.packages_checked
        );
        let color = if result.has_issues() { "33" } else { "32" };
        writeln!(out, "{}", self.paint(color, &summary))
    }
}

/// Pretty-printed JSON of the whole result.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, result: &LintResult, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, result)?;
        writeln!(out)
    }
}

/// One line per diagnostic: `file:line:col: [CODE] message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactEmitter;

impl Emitter for CompactEmitter {
    fn emit(&self, result: &LintResult, out: &mut dyn Write) -> io::Result<()> {
        for d in &result.diagnostics {
            writeln!(out, "{d}")?;
        }
        Ok(())
    }
}
