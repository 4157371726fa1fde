//! Shared output formatting for run summaries.
//!
//! Provides JSON and plain-text formatters for `RunSummary`.
//! Color/terminal formatting belongs to the CLI layer.

use std::io::Write;

use crate::error::describe_code;
use crate::report::{RunSummary, ValidationOutcome};

/// Format a `RunSummary` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(summary: &RunSummary, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `RunSummary` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(summary: &RunSummary, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(writer, "  OME SCHEMA PIPELINE")?;
    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(
        writer,
        "  Schemas:     {} ({})",
        summary.output_location.display(),
        if summary.partitioned {
            "partitioned"
        } else {
            "single file"
        }
    )?;

    match &summary.validation {
        ValidationOutcome::Skipped { reason } => {
            writeln!(writer, "  Validation:  skipped ({reason})")?;
        }
        ValidationOutcome::Passed { report } => {
            writeln!(writer, "  Validation:  passed")?;
            writeln!(writer, "  Report:      {}", report.display())?;
        }
        ValidationOutcome::Failed { report, code } => {
            writeln!(
                writer,
                "  Validation:  errors found ({})",
                describe_code(*code)
            )?;
            writeln!(writer, "  Report:      {}", report.display())?;
        }
    }
    writeln!(writer, "{}", "=".repeat(60))?;

    if let ValidationOutcome::Failed { report, .. } = &summary.validation {
        writeln!(
            writer,
            "Pipeline completed with validation errors. See {} for details.",
            report.display()
        )?;
    } else {
        writeln!(writer, "Pipeline completed successfully.")?;
    }

    Ok(())
}
