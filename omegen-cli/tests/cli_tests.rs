#![cfg(unix)]
#![allow(clippy::unwrap_used)]
//! End-to-end tests for the `omegen` binary.
//!
//! A shell script stands in for the Python interpreter: it logs every call,
//! fails `import` probes for the modules listed in `OMEGEN_TEST_MISSING`, and
//! exits the generator/validator with `OMEGEN_TEST_GEN_RC`/`OMEGEN_TEST_VAL_RC`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

const FAKE_PYTHON: &str = r##"#!/bin/sh
printf '%s\n' "$*" >> "$OMEGEN_TEST_LOG"
case "$1" in
  -c)
    for m in $OMEGEN_TEST_MISSING; do
      if [ "$2" = "import $m" ]; then
        echo "ModuleNotFoundError: No module named '$m'" >&2
        exit 1
      fi
    done
    exit 0
    ;;
  -m)
    case "$2" in
      src.generator)
        echo "Successfully generated LinkML schema"
        exit "${OMEGEN_TEST_GEN_RC:-0}"
        ;;
      src.validate_schema)
        prev=""
        for a in "$@"; do
          if [ "$prev" = "--output" ]; then echo "# Validation report" > "$a"; fi
          prev="$a"
        done
        exit "${OMEGEN_TEST_VAL_RC:-0}"
        ;;
    esac
    ;;
esac
exit 99
"##;

struct TestEnv {
    tmp: TempDir,
    python: PathBuf,
    log: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let python = tmp.path().join("fake-python");
        fs::write(&python, FAKE_PYTHON).unwrap();
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(tmp.path().join("ome.xsd"), "<xs:schema/>").unwrap();
        let log = tmp.path().join("calls.log");
        Self { tmp, python, log }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// The binary pointed at the fake interpreter, with no `--input`.
    fn bare(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("omegen");
        cmd.current_dir(self.root())
            .env_remove("RUST_LOG")
            .env_remove("OMEGEN_PYTHON")
            .env("OMEGEN_TEST_LOG", &self.log)
            .arg("--python")
            .arg(&self.python);
        cmd
    }

    fn cmd(&self) -> Command {
        let mut cmd = self.bare();
        cmd.args(["--input", "ome.xsd"]);
        cmd
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn generator_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains("src.generator"))
            .collect()
    }

    fn validator_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains("src.validate_schema"))
            .collect()
    }
}

#[test]
fn full_run_succeeds() {
    let env = TestEnv::new();
    env.cmd()
        .assert()
        .success()
        .stdout(contains("Validation:  passed"))
        .stdout(contains("validation_report.md"));

    assert_eq!(
        env.generator_calls(),
        vec!["-m src.generator ome.xsd --output ome_schemas --partition"]
    );
    assert_eq!(
        env.validator_calls(),
        vec!["-m src.validate_schema ome_schemas --output validation_report.md"]
    );
    assert!(env.root().join("ome_schemas").is_dir());
    assert!(env.root().join("validation_report.md").exists());
}

#[test]
fn single_verbose_run() {
    let env = TestEnv::new();
    env.cmd().args(["-s", "-v", "-n"]).assert().success();

    assert_eq!(
        env.generator_calls(),
        vec!["-m src.generator ome.xsd --output ome_schemas/ome_schema.yaml -v"]
    );
    assert!(env.validator_calls().is_empty());
}

#[test]
fn missing_input_exits_one() {
    let env = TestEnv::new();
    env.bare()
        .args(["--input", "absent.xsd"])
        .assert()
        .code(1)
        .stderr(contains("Input file not found: absent.xsd"));

    assert!(env.calls().is_empty());
}

#[test]
fn missing_required_module_exits_one() {
    let env = TestEnv::new();
    env.cmd()
        .env("OMEGEN_TEST_MISSING", "xmlschema")
        .assert()
        .code(1)
        .stderr(contains("Missing dependency 'xmlschema'"));

    assert!(env.generator_calls().is_empty());
}

#[test]
fn generator_failure_exits_one_without_validation() {
    let env = TestEnv::new();
    env.cmd()
        .env("OMEGEN_TEST_GEN_RC", "2")
        .assert()
        .code(1)
        .stderr(contains("Schema generation failed (exit code 2)"))
        .stderr(contains("Successfully generated LinkML schema"));

    assert_eq!(env.generator_calls().len(), 1);
    assert!(env.validator_calls().is_empty());
}

#[test]
fn validation_errors_exit_one_and_name_report() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--report", "out.md"])
        .env("OMEGEN_TEST_VAL_RC", "1")
        .assert()
        .code(1)
        .stdout(contains("See out.md for details."));

    assert!(env.root().join("out.md").exists());
}

#[test]
fn missing_validation_library_declined_without_terminal() {
    let env = TestEnv::new();
    env.cmd()
        .env("OMEGEN_TEST_MISSING", "linkml")
        .assert()
        .code(1)
        .stderr(contains("validation library 'linkml' is not installed"));

    assert!(env.generator_calls().is_empty());
}

#[test]
fn missing_validation_library_with_yes_skips_validation() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--yes")
        .env("OMEGEN_TEST_MISSING", "linkml")
        .assert()
        .success()
        .stdout(contains("skipped (validation library not installed)"));

    assert_eq!(env.generator_calls().len(), 1);
    assert!(env.validator_calls().is_empty());
}

#[test]
fn json_summary() {
    let env = TestEnv::new();
    let output = env.cmd().args(["--json", "-n"]).output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["validation"]["status"], "skipped");
    assert_eq!(summary["validation"]["reason"], "disabled");
    assert_eq!(summary["partitioned"], true);
}

#[test]
fn help_exits_one() {
    cargo_bin_cmd!("omegen")
        .arg("--help")
        .assert()
        .code(1)
        .stdout(contains("--no-validate"));
}

#[test]
fn unknown_flag_exits_one_with_usage() {
    cargo_bin_cmd!("omegen")
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(contains("Usage:"));
}
