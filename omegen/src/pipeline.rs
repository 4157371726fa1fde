//! The generate → validate sequence.

use std::fs;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::deps;
use crate::error::PipelineError;
use crate::invocation::{generator_invocation, validator_invocation};
use crate::prompt::Confirm;
use crate::report::{RunSummary, SkipReason, ValidationOutcome};
use crate::runner::{CommandRunner, InvocationResult};

/// Run the pipeline once.
///
/// Stages, in order, each blocking on the previous one:
/// 1. the input file must exist;
/// 2. required Python modules must import;
/// 3. if validation is requested, the validation module is probed and the
///    user is asked whether to continue without it when absent;
/// 4. the output directory is created;
/// 5. the generator runs;
/// 6. the validator runs, unless validation was disabled or skipped.
///
/// # Errors
///
/// Returns an error for every failure up to and including generation. A
/// validator that exits non-zero is not an error: the returned summary
/// carries [`ValidationOutcome::Failed`] and a non-zero exit code.
pub fn run(
    config: &PipelineConfig,
    runner: &mut dyn CommandRunner,
    confirm: &mut dyn Confirm,
) -> Result<RunSummary, PipelineError> {
    if !config.input.exists() {
        return Err(PipelineError::MissingInput {
            path: config.input.clone(),
        });
    }

    deps::check_required(runner, &config.python)?;

    let skip = if config.validate {
        resolve_validation_dependency(config, runner, confirm)?
    } else {
        Some(SkipReason::Disabled)
    };

    fs::create_dir_all(&config.output).map_err(|source| PipelineError::OutputDir {
        path: config.output.clone(),
        source,
    })?;

    let generator = generator_invocation(config);
    info!(
        "Generating {} schema from {} into {}",
        if config.partition { "partitioned" } else { "single-file" },
        config.input.display(),
        config.output_location().display()
    );
    if let InvocationResult::Failure { code, output } = runner.run(&generator)? {
        return Err(PipelineError::Generation { code, output });
    }

    let validation = match skip {
        Some(reason) => {
            info!("Skipping validation: {reason}");
            ValidationOutcome::Skipped { reason }
        }
        None => validate(config, runner)?,
    };

    Ok(RunSummary {
        output_location: config.output_location(),
        partitioned: config.partition,
        generator,
        validation,
    })
}

/// `Ok(None)` when the validator can run, `Ok(Some(_))` when the user agreed
/// to go on without it.
fn resolve_validation_dependency(
    config: &PipelineConfig,
    runner: &mut dyn CommandRunner,
    confirm: &mut dyn Confirm,
) -> Result<Option<SkipReason>, PipelineError> {
    let dep = &deps::VALIDATION;
    if deps::is_available(runner, &config.python, dep)? {
        return Ok(None);
    }

    warn!(
        "Validation library '{}' is not installed (pip install {})",
        dep.module, dep.package
    );
    let question = format!(
        "Validation library '{}' is not installed. Continue without validation?",
        dep.module
    );
    if config.assume_yes || confirm.confirm(&question) {
        Ok(Some(SkipReason::DependencyMissing))
    } else {
        Err(PipelineError::Declined {
            name: dep.module.to_owned(),
        })
    }
}

fn validate(
    config: &PipelineConfig,
    runner: &mut dyn CommandRunner,
) -> Result<ValidationOutcome, PipelineError> {
    info!(
        "Validating schemas in {} (report: {})",
        config.schemas_dir().display(),
        config.report.display()
    );
    let report = config.report.clone();
    Ok(match runner.run(&validator_invocation(config))? {
        InvocationResult::Success => ValidationOutcome::Passed { report },
        InvocationResult::Failure { code, .. } => {
            warn!("Validator reported errors, see {}", report.display());
            ValidationOutcome::Failed { report, code }
        }
    })
}
