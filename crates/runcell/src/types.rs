use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One code-execution request
///
/// Requests are independent; nothing about them survives the call that
/// executes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Source text to execute (UTF-8, arbitrary length)
    pub code: String,

    /// Language ID that must resolve in the registry (e.g., "python")
    pub language: String,

    /// Lines fed to the program's standard input, newline-joined.
    /// An empty list means standard input is left unconnected.
    #[serde(default)]
    pub inputs: Vec<String>,
}

impl ExecutionRequest {
    /// Create a request with no standard input
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            inputs: Vec::new(),
        }
    }

    /// Set the standard-input lines
    pub fn with_inputs(mut self, inputs: Vec<String>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Newline-joined stdin payload, or `None` when there is no input
    pub(crate) fn stdin_payload(&self) -> Option<String> {
        if self.inputs.is_empty() {
            None
        } else {
            Some(self.inputs.join("\n"))
        }
    }
}

/// How an execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Program exited with code 0
    Ok,

    /// Program started but exited non-zero (or died on a signal)
    RuntimeError,

    /// The interpreter process could not be started
    SpawnFailed,

    /// Program did not finish within the deadline and was killed
    Timeout,

    /// The language ID did not resolve; nothing was spawned
    Unsupported,
}

/// Result of one execution
///
/// All failure kinds are reported through this one shape so callers only
/// need `error` being null or not to classify success. The serialized form
/// carries exactly `output`, `error`, and `execution_time`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Outcome discriminant (not part of the wire shape)
    #[serde(skip)]
    pub status: ExecutionStatus,

    /// Captured standard output, decoded as text.
    /// Preserved on runtime failures; empty on timeout and rejection.
    pub output: String,

    /// Captured standard error or a fixed rejection message;
    /// `None` means clean completion.
    pub error: Option<String>,

    /// Wall-clock seconds from spawn to termination. Pinned to the
    /// deadline value on timeout; elapsed-before-rejection otherwise.
    pub execution_time: f64,
}

impl ExecutionResult {
    /// Clean completion (exit code 0)
    pub fn completed(output: String, elapsed: Duration) -> Self {
        Self {
            status: ExecutionStatus::Ok,
            output,
            error: None,
            execution_time: elapsed.as_secs_f64(),
        }
    }

    /// Non-zero exit. Partial stdout is kept alongside the stderr payload.
    pub fn runtime_error(output: String, stderr: String, elapsed: Duration) -> Self {
        Self {
            status: ExecutionStatus::RuntimeError,
            output,
            error: Some(stderr),
            execution_time: elapsed.as_secs_f64(),
        }
    }

    /// The operating system could not start (or wait on) the interpreter
    pub fn spawn_failed(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status: ExecutionStatus::SpawnFailed,
            output: String::new(),
            error: Some(message.into()),
            execution_time: elapsed.as_secs_f64(),
        }
    }

    /// Deadline elapsed and the child was killed.
    ///
    /// `execution_time` is pinned to the deadline value, not measured
    /// elapsed time; no further measurement occurs after a forced kill.
    pub fn timeout(deadline_secs: u64) -> Self {
        Self {
            status: ExecutionStatus::Timeout,
            output: String::new(),
            error: Some(format!("Code execution timeout ({deadline_secs} seconds)")),
            execution_time: deadline_secs as f64,
        }
    }

    /// Language ID not in the registry; rejected before any side effect
    pub fn unsupported(language: &str, elapsed: Duration) -> Self {
        Self {
            status: ExecutionStatus::Unsupported,
            output: String::new(),
            error: Some(format!("Language '{language}' not supported for execution")),
            execution_time: elapsed.as_secs_f64(),
        }
    }

    /// Check if the execution completed cleanly
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, ExecutionStatus::Ok) && self.error.is_none()
    }
}
