//! Shared output formatting for lint results.

use anyhow::Result;
use kube_api_lint_core::emit::{CompactEmitter, Emitter, JsonEmitter, TextEmitter};
use kube_api_lint_core::{DiagnosticReport, LintResult};
use std::io::{self, IsTerminal, Write};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => TextEmitter::new().with_color(color).emit(result, &mut out)?,
        OutputFormat::Json => JsonEmitter.emit(result, &mut out)?,
        OutputFormat::Compact => CompactEmitter.emit(result, &mut out)?,
        OutputFormat::Pretty => print_pretty(result, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn print_pretty(result: &LintResult, out: &mut dyn Write) -> io::Result<()> {
    for d in &result.diagnostics {
        let report = miette::Report::new(DiagnosticReport::from(d));
        writeln!(out, "{report:?}")?;
    }
    writeln!(
        out,
        "Found {} issue(s) in {} declaration(s)",
        result.diagnostics.len(),
        result.declarations_checked
    )
}
