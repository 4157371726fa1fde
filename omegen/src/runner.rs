//! Blocking execution of external tools.
//!
//! The pipeline only talks to [`CommandRunner`]; [`ProcessRunner`] is the
//! real implementation and tests substitute fakes.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{PipelineError, describe_code};
use crate::invocation::Invocation;

/// Interval between exit checks while a bounded wait is in progress.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of one finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    /// Exit status zero.
    Success,
    /// Non-zero exit or termination by signal.
    Failure {
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
        /// Captured stdout followed by stderr.
        output: String,
    },
}

impl InvocationResult {
    /// Whether the invocation exited with status zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Runs an [`Invocation`] to completion.
pub trait CommandRunner {
    /// Execute `invocation` and block until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Spawn`] if the program cannot be started,
    /// [`PipelineError::Wait`] if its exit status cannot be collected and
    /// [`PipelineError::Timeout`] if a bounded wait elapses. A program that
    /// starts and exits non-zero is an `Ok(InvocationResult::Failure)`.
    fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult, PipelineError>;
}

/// Runs invocations as child processes, capturing their output.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Runner that waits at most `timeout` for each child (`None`: no bound).
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn wait(&self, child: &mut Child, program: &str) -> Result<Option<i32>, PipelineError> {
        let wait_err = |source| PipelineError::Wait {
            program: program.to_owned(),
            source,
        };

        let Some(limit) = self.timeout else {
            return child.wait().map(|s| s.code()).map_err(wait_err);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(wait_err)? {
                return Ok(status.code());
            }
            if started.elapsed() >= limit {
                // The child may exit between the check and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(PipelineError::Timeout {
                    program: program.to_owned(),
                    after: limit,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult, PipelineError> {
        debug!("Running: {invocation}");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PipelineError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(|s| capture(s, "stdout"));
        let stderr = child.stderr.take().map(|s| capture(s, "stderr"));

        // On timeout the reader threads are left detached: a grandchild may
        // still hold the pipes open.
        let code = self.wait(&mut child, &invocation.program)?;

        let mut output = collect(stdout);
        output.push_str(&collect(stderr));

        debug!("'{}' finished: {}", invocation.program, describe_code(code));
        if code == Some(0) {
            Ok(InvocationResult::Success)
        } else {
            Ok(InvocationResult::Failure { code, output })
        }
    }
}

/// Drain a child pipe on its own thread, echoing lines to the debug log.
///
/// Lines are decoded lossily; the pipe is read until EOF so the child never
/// sees a closed pipe while it is still writing.
fn capture<R: Read + Send + 'static>(pipe: R, stream: &'static str) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = String::new();
        let mut raw = Vec::new();
        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(target: "omegen::tool", "[{stream}] read failed: {e}");
                    break;
                }
            }
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            debug!(target: "omegen::tool", "[{stream}] {line}");
            buf.push_str(line);
            buf.push('\n');
        }
        buf
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
