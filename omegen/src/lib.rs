//! # omegen
//!
//! Driver for the OME XSD → `LinkML` schema pipeline.
//!
//! The heavy lifting is done by two external Python tools: a generator that
//! translates the XSD into `LinkML` schema files, and a validator that checks
//! those files and writes a markdown report. This crate sequences them:
//! it checks preconditions, runs the generator, optionally runs the
//! validator, and reports the outcome.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use omegen::{PipelineConfig, ProcessRunner, TerminalPrompt, run};
//!
//! let mut config = PipelineConfig::default();
//! config.partition = false;
//!
//! let mut runner = ProcessRunner::new(config.timeout);
//! match run(&config, &mut runner, &mut TerminalPrompt) {
//!     Ok(summary) => println!("exit code: {}", summary.exit_code()),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

mod config;
pub mod deps;
mod error;
pub mod invocation;
pub mod output;
mod pipeline;
mod prompt;
mod report;
mod runner;

pub use config::{
    DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_PYTHON, DEFAULT_REPORT, GeneratorOptions,
    PipelineConfig, SINGLE_SCHEMA_FILE, parse_prefix_mapping,
};
pub use error::PipelineError;
pub use invocation::Invocation;
pub use pipeline::run;
pub use prompt::{Confirm, TerminalPrompt, is_yes};
pub use report::{RunSummary, SkipReason, ValidationOutcome};
pub use runner::{CommandRunner, InvocationResult, ProcessRunner};
