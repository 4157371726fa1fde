//! Runtime dependency probes.
//!
//! Each dependency is a Python module checked with `python -c "import <module>"`
//! through the same [`CommandRunner`] the tools run on.

use tracing::debug;

use crate::error::PipelineError;
use crate::invocation::probe_invocation;
use crate::runner::CommandRunner;

/// A Python module the tools need at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// Importable module name.
    pub module: &'static str,
    /// Distribution to install when the import fails.
    pub package: &'static str,
}

/// Modules the generator cannot run without.
pub const REQUIRED: &[Dependency] = &[
    Dependency {
        module: "xmlschema",
        package: "xmlschema",
    },
    Dependency {
        module: "yaml",
        package: "pyyaml",
    },
];

/// Module the validator needs. Only probed when validation is requested.
pub const VALIDATION: Dependency = Dependency {
    module: "linkml",
    package: "linkml",
};

impl Dependency {
    fn install_hint(&self) -> String {
        format!("install it with `pip install {}`", self.package)
    }

    fn missing(&self) -> PipelineError {
        PipelineError::MissingDependency {
            name: self.module.to_owned(),
            hint: self.install_hint(),
        }
    }
}

/// Whether `dep` imports cleanly under `python`.
///
/// # Errors
///
/// Returns [`PipelineError::MissingDependency`] if the interpreter itself
/// cannot be started, and passes through timeouts.
pub fn is_available(
    runner: &mut dyn CommandRunner,
    python: &str,
    dep: &Dependency,
) -> Result<bool, PipelineError> {
    let result = match runner.run(&probe_invocation(python, dep.module)) {
        Ok(result) => result,
        Err(PipelineError::Spawn { program, source }) => {
            return Err(PipelineError::MissingDependency {
                name: program,
                hint: format!("interpreter could not be started ({source})"),
            });
        }
        Err(e) => return Err(e),
    };
    let available = result.is_success();
    debug!(
        "Dependency '{}': {}",
        dep.module,
        if available { "found" } else { "missing" }
    );
    Ok(available)
}

/// Fail on the first required module that does not import.
///
/// # Errors
///
/// Returns [`PipelineError::MissingDependency`] naming the missing module.
pub fn check_required(runner: &mut dyn CommandRunner, python: &str) -> Result<(), PipelineError> {
    for dep in REQUIRED {
        if !is_available(runner, python, dep)? {
            return Err(dep.missing());
        }
    }
    Ok(())
}
