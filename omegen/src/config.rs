//! Configuration types for a pipeline run.
//!
//! A [`PipelineConfig`] is built once from CLI arguments plus defaults and is
//! never mutated afterwards. Decisions made while the pipeline runs (such as
//! skipping validation after the user accepts the prompt) are recorded in the
//! run summary instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default XSD input path.
pub const DEFAULT_INPUT: &str = "data/ome.xsd";

/// Default output directory for generated schemas.
pub const DEFAULT_OUTPUT: &str = "ome_schemas";

/// Default validation report path.
pub const DEFAULT_REPORT: &str = "validation_report.md";

/// Default Python interpreter used to run the generator and validator.
pub const DEFAULT_PYTHON: &str = "python3";

/// File name of the combined schema written in single-file mode.
pub const SINGLE_SCHEMA_FILE: &str = "ome_schema.yaml";

/// Options forwarded verbatim to the generator.
///
/// Every field is optional; unset fields produce no generator argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct GeneratorOptions {
    /// Top-level elements to keep (`--elements a,b`).
    pub elements: Vec<String>,
    /// Override for the schema id.
    pub schema_id: Option<String>,
    /// Override for the schema name.
    pub schema_name: Option<String>,
    /// Override for the schema title.
    pub schema_title: Option<String>,
    /// Override for the default prefix.
    pub default_prefix: Option<String>,
    /// Extra `prefix=URI` mappings, in the order given.
    pub extra_prefixes: Vec<(String, String)>,
    /// Where to write the intermediate JSON Schema.
    pub json_out: Option<PathBuf>,
    /// YAML file with documentation overrides.
    pub doc_overrides: Option<PathBuf>,
}

/// Parse a `prefix=URI` mapping.
///
/// # Errors
///
/// Returns a message if the `=` is missing or either side is empty.
pub fn parse_prefix_mapping(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((prefix, uri)) if !prefix.trim().is_empty() && !uri.trim().is_empty() => {
            Ok((prefix.trim().to_owned(), uri.trim().to_owned()))
        }
        _ => Err(format!("expected prefix=URI, got '{raw}'")),
    }
}

/// Immutable configuration for one pipeline run.
#[derive(Debug, Clone)]
#[non_exhaustive]
#[allow(clippy::struct_excessive_bools)]
pub struct PipelineConfig {
    /// XSD file handed to the generator.
    pub input: PathBuf,
    /// Output directory for generated schemas.
    pub output: PathBuf,
    /// Split the schema into one file per class (default: on).
    pub partition: bool,
    /// Run the validator after generation (default: on).
    pub validate: bool,
    /// Pass `-v` to both tools.
    pub verbose: bool,
    /// Report file written by the validator.
    pub report: PathBuf,
    /// Interpreter used for the tools and the dependency probes.
    pub python: String,
    /// Answer the "continue without validation" prompt with yes.
    pub assume_yes: bool,
    /// Upper bound on each tool invocation. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Options forwarded to the generator.
    pub generator: GeneratorOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            partition: true,
            validate: true,
            verbose: false,
            report: PathBuf::from(DEFAULT_REPORT),
            python: DEFAULT_PYTHON.to_owned(),
            assume_yes: false,
            timeout: None,
            generator: GeneratorOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Where the generator writes: the output directory when partitioned,
    /// otherwise a single file inside it.
    #[must_use]
    pub fn output_location(&self) -> PathBuf {
        if self.partition {
            self.output.clone()
        } else {
            self.output.join(SINGLE_SCHEMA_FILE)
        }
    }

    /// Directory handed to the validator.
    #[must_use]
    pub fn schemas_dir(&self) -> &Path {
        &self.output
    }
}
