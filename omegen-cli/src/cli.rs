use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use omegen::output::{write_human, write_json};
use omegen::{
    DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_PYTHON, DEFAULT_REPORT, GeneratorOptions,
    PipelineConfig, PipelineError, ProcessRunner, TerminalPrompt, parse_prefix_mapping,
};
use tracing::debug;

use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "omegen",
    version,
    about = "Generate LinkML schemas from the OME XSD and validate them",
    after_help = "Exit status: 0 on success, 1 on any failure (including validation errors)."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input XSD file
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Output directory for generated schemas
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Generate a single schema file instead of one file per class
    #[arg(short, long)]
    pub single: bool,

    /// Skip schema validation
    #[arg(short, long)]
    pub no_validate: bool,

    /// Verbose output from the driver and both tools
    #[arg(short, long)]
    pub verbose: bool,

    /// Validation report path
    #[arg(short, long, default_value = DEFAULT_REPORT)]
    pub report: PathBuf,

    /// Python interpreter used to run the tools
    #[arg(long, env = "OMEGEN_PYTHON", default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// Continue without validation if the validation library is missing
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Kill a tool that runs longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Comma-separated top-level elements to include
    #[arg(long, value_delimiter = ',', help_heading = "Generator options")]
    pub elements: Vec<String>,

    /// Override the schema id
    #[arg(long, help_heading = "Generator options")]
    pub schema_id: Option<String>,

    /// Override the schema name
    #[arg(long, help_heading = "Generator options")]
    pub name: Option<String>,

    /// Override the schema title
    #[arg(long, help_heading = "Generator options")]
    pub title: Option<String>,

    /// Override the default prefix
    #[arg(long, help_heading = "Generator options")]
    pub default_prefix: Option<String>,

    /// Extra prefix mapping (prefix=URI); can be repeated
    #[arg(
        long,
        value_name = "PREFIX=URI",
        value_parser = parse_prefix_mapping,
        help_heading = "Generator options"
    )]
    pub extra_prefix: Vec<(String, String)>,

    /// Also write the intermediate JSON Schema to this path
    #[arg(long, help_heading = "Generator options")]
    pub json_out: Option<PathBuf>,

    /// YAML file with documentation overrides
    #[arg(long, help_heading = "Generator options")]
    pub doc_overrides: Option<PathBuf>,
}

impl Cli {
    /// Resolve the immutable pipeline configuration.
    pub fn into_config(self) -> PipelineConfig {
        let mut generator = GeneratorOptions::default();
        generator.elements = self
            .elements
            .into_iter()
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty())
            .collect();
        generator.schema_id = self.schema_id;
        generator.schema_name = self.name;
        generator.schema_title = self.title;
        generator.default_prefix = self.default_prefix;
        generator.extra_prefixes = self.extra_prefix;
        generator.json_out = self.json_out;
        generator.doc_overrides = self.doc_overrides;

        let mut config = PipelineConfig::default();
        config.input = self.input;
        config.output = self.output;
        config.partition = !self.single;
        config.validate = !self.no_validate;
        config.verbose = self.verbose;
        config.report = self.report;
        config.python = self.python;
        config.assume_yes = self.yes;
        config.timeout = self.timeout.map(Duration::from_secs);
        config.generator = generator;
        config
    }
}

/// Parse arguments, run the pipeline and return the process exit code.
pub fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return Ok(usage_exit(&e)),
    };

    logging::init(cli.verbose);
    let json = cli.json;
    let config = cli.into_config();
    debug!(
        input = %config.input.display(),
        output = %config.output.display(),
        partition = config.partition,
        validate = config.validate,
        python = %config.python,
        "resolved configuration"
    );

    let mut runner = ProcessRunner::new(config.timeout);
    match omegen::run(&config, &mut runner, &mut TerminalPrompt) {
        Ok(summary) => {
            let mut stdout = io::stdout().lock();
            if json {
                write_json(&summary, &mut stdout)?;
            } else {
                write_human(&summary, &mut stdout)?;
            }
            stdout.flush()?;
            Ok(summary.exit_code())
        }
        Err(e) => {
            report_error(&e);
            Ok(1)
        }
    }
}

fn usage_exit(err: &clap::Error) -> i32 {
    // Nothing useful is left to do if the terminal is gone.
    let _ = err.print();
    usage_exit_code(err.kind())
}

/// Help and usage errors both exit 1; only `--version` exits 0.
fn usage_exit_code(kind: ErrorKind) -> i32 {
    if kind == ErrorKind::DisplayVersion { 0 } else { 1 }
}

fn report_error(err: &PipelineError) {
    eprintln!("{} {err}", "Error:".red().bold());
    if let Some(output) = err.captured_output() {
        eprintln!("{}", "Generator output:".dimmed());
        eprintln!("{}", output.trim_end());
    }
    match err {
        PipelineError::MissingInput { .. } => {
            eprintln!("Pass the XSD with --input, or place it at {DEFAULT_INPUT}.");
        }
        PipelineError::Declined { .. } => {
            eprintln!("Re-run with --no-validate to generate without validation.");
        }
        _ => {}
    }
}
