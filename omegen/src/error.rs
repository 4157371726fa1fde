//! Error types for the pipeline driver.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A failure that stops the pipeline.
///
/// Validator findings are deliberately absent: a validator that exits
/// non-zero still completes the run, see [`crate::ValidationOutcome::Failed`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// The XSD input file does not exist.
    #[error("Input file not found: {}", .path.display())]
    MissingInput {
        /// The configured input path.
        path: PathBuf,
    },

    /// A required runtime library (or the interpreter itself) is missing.
    #[error("Missing dependency '{name}': {hint}")]
    MissingDependency {
        /// Module or program name.
        name: String,
        /// What to install.
        hint: String,
    },

    /// The user declined to continue without the validation library.
    #[error("Aborted: validation library '{name}' is not installed")]
    Declined {
        /// The missing optional module.
        name: String,
    },

    /// The generator exited non-zero.
    #[error("Schema generation failed ({})", describe_code(*.code))]
    Generation {
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured stdout and stderr.
        output: String,
    },

    /// A tool could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// The program that was executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a started tool failed.
    #[error("Failed while waiting for '{program}': {source}")]
    Wait {
        /// The program that was executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A tool ran longer than the configured bound and was killed.
    #[error("'{program}' did not finish within {}s", .after.as_secs())]
    Timeout {
        /// The program that was executed.
        program: String,
        /// The configured bound.
        after: Duration,
    },

    /// Filesystem failure while preparing the output location.
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Captured tool output attached to the error, if any.
    #[must_use]
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Generation { output, .. } if !output.trim().is_empty() => Some(output),
            _ => None,
        }
    }
}

/// `exit code N`, or `terminated by signal` when the process has no code.
#[must_use]
pub fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_owned(),
        |c| format!("exit code {c}"),
    )
}
