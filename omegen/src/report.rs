//! Run summary types.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::invocation::Invocation;

/// Why the validator did not run.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SkipReason {
    /// `--no-validate` was given.
    Disabled,
    /// The validation library is missing and the user chose to continue.
    DependencyMissing,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled with --no-validate"),
            Self::DependencyMissing => write!(f, "validation library not installed"),
        }
    }
}

/// What happened in the validation stage.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ValidationOutcome {
    /// The validator was not invoked.
    Skipped {
        /// Why it was skipped.
        reason: SkipReason,
    },
    /// The validator exited zero.
    Passed {
        /// Report written by the validator.
        report: PathBuf,
    },
    /// The validator exited non-zero: the schemas have errors.
    Failed {
        /// Report written by the validator.
        report: PathBuf,
        /// Validator exit code, `None` when killed by a signal.
        code: Option<i32>,
    },
}

/// Result of a pipeline run that got past generation.
///
/// A failed validation is still a completed run; check [`RunSummary::ok`].
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct RunSummary {
    /// Where the generator wrote its schema(s).
    pub output_location: PathBuf,
    /// Whether the schema was partitioned into one file per class.
    pub partitioned: bool,
    /// The generator command that ran.
    pub generator: Invocation,
    /// Validation stage outcome.
    pub validation: ValidationOutcome,
}

impl RunSummary {
    /// Generation succeeded and validation either passed or was skipped.
    #[must_use]
    pub const fn ok(&self) -> bool {
        !matches!(self.validation, ValidationOutcome::Failed { .. })
    }

    /// Process exit status for this run: 0 when [`ok`](Self::ok), else 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.ok() { 0 } else { 1 }
    }

    /// The validation report path, if the validator ran.
    #[must_use]
    pub fn report(&self) -> Option<&Path> {
        match &self.validation {
            ValidationOutcome::Passed { report } | ValidationOutcome::Failed { report, .. } => {
                Some(report.as_path())
            }
            ValidationOutcome::Skipped { .. } => None,
        }
    }
}
