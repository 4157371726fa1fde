//! Shared fakes for pipeline tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use omegen::{CommandRunner, Invocation, InvocationResult, PipelineConfig, PipelineError};
use tempfile::TempDir;

/// Which role an invocation plays, derived from its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Probe,
    Generator,
    Validator,
}

pub fn role_of(inv: &Invocation) -> Role {
    if inv.has_arg("-c") {
        Role::Probe
    } else if inv.has_arg("src.generator") {
        Role::Generator
    } else if inv.has_arg("src.validate_schema") {
        Role::Validator
    } else {
        panic!("unexpected invocation: {inv}")
    }
}

/// Records every invocation and answers from a script.
#[derive(Debug, Default)]
pub struct FakeRunner {
    pub calls: Vec<Invocation>,
    pub missing_modules: Vec<&'static str>,
    pub generator_code: i32,
    pub validator_code: i32,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(mut self, module: &'static str) -> Self {
        self.missing_modules.push(module);
        self
    }

    pub fn generator_exits(mut self, code: i32) -> Self {
        self.generator_code = code;
        self
    }

    pub fn validator_exits(mut self, code: i32) -> Self {
        self.validator_code = code;
        self
    }

    pub fn calls_for(&self, role: Role) -> Vec<&Invocation> {
        self.calls.iter().filter(|c| role_of(c) == role).collect()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.calls.iter().map(role_of).collect()
    }
}

fn exit(code: i32, output: &str) -> InvocationResult {
    if code == 0 {
        InvocationResult::Success
    } else {
        InvocationResult::Failure {
            code: Some(code),
            output: output.to_owned(),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult, PipelineError> {
        self.calls.push(invocation.clone());
        Ok(match role_of(invocation) {
            Role::Probe => {
                let missing = self
                    .missing_modules
                    .iter()
                    .any(|m| invocation.value_of("-c") == Some(format!("import {m}").as_str()));
                exit(i32::from(missing), "ModuleNotFoundError")
            }
            Role::Generator => exit(self.generator_code, "Error generating LinkML schema"),
            Role::Validator => exit(self.validator_code, "2 schemas invalid"),
        })
    }
}

/// A temp workspace with an input XSD and a config pointing into it.
pub struct Workspace {
    pub tmp: TempDir,
    pub config: PipelineConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("ome.xsd");
        fs::write(
            &input,
            "<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\"/>",
        )
        .unwrap();

        let mut config = PipelineConfig::default();
        config.input = input;
        config.output = tmp.path().join("ome_schemas");
        config.report = tmp.path().join("validation_report.md");
        Self { tmp, config }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }
}
