//! Command lines for the generator, the validator and the dependency probes.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::PipelineConfig;

/// Python module run as the generator.
pub const GENERATOR_MODULE: &str = "src.generator";

/// Python module run as the validator.
pub const VALIDATOR_MODULE: &str = "src.validate_schema";

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Program to execute (resolved through `PATH`).
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl Invocation {
    /// Start an invocation of `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Whether `flag` appears among the arguments.
    #[must_use]
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// The argument following `flag`, if any.
    #[must_use]
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// `<python> -m src.generator <input> --output <location> [--partition] [options] [-v]`
#[must_use]
pub fn generator_invocation(config: &PipelineConfig) -> Invocation {
    let opts = &config.generator;
    let mut inv = Invocation::new(&config.python)
        .arg("-m")
        .arg(GENERATOR_MODULE)
        .path_arg(&config.input)
        .arg("--output")
        .path_arg(&config.output_location());

    if config.partition {
        inv = inv.arg("--partition");
    }
    if !opts.elements.is_empty() {
        inv = inv.arg("--elements").arg(opts.elements.join(","));
    }
    for (flag, value) in [
        ("--schema-id", &opts.schema_id),
        ("--name", &opts.schema_name),
        ("--title", &opts.schema_title),
        ("--default-prefix", &opts.default_prefix),
    ] {
        if let Some(value) = value {
            inv = inv.arg(flag).arg(value);
        }
    }
    for (prefix, uri) in &opts.extra_prefixes {
        inv = inv.arg("--extra-prefix").arg(format!("{prefix}={uri}"));
    }
    if let Some(path) = &opts.json_out {
        inv = inv.arg("--json-out").path_arg(path);
    }
    if let Some(path) = &opts.doc_overrides {
        inv = inv.arg("--doc-overrides").path_arg(path);
    }
    if config.verbose {
        inv = inv.arg("-v");
    }
    inv
}

/// `<python> -m src.validate_schema <schemas dir> --output <report> [-v]`
#[must_use]
pub fn validator_invocation(config: &PipelineConfig) -> Invocation {
    let inv = Invocation::new(&config.python)
        .arg("-m")
        .arg(VALIDATOR_MODULE)
        .path_arg(config.schemas_dir())
        .arg("--output")
        .path_arg(&config.report);
    if config.verbose { inv.arg("-v") } else { inv }
}

/// `<python> -c "import <module>"`
#[must_use]
pub fn probe_invocation(python: &str, module: &str) -> Invocation {
    Invocation::new(python)
        .arg("-c")
        .arg(format!("import {module}"))
}
