//! Execution pipeline
//!
//! Dispatches a request to its language strategy, materializes the source
//! artifact, and supervises the interpreter under a hard deadline.

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::artifact::SourceArtifact;
use crate::config::{Config, Language};
use crate::types::{ExecutionRequest, ExecutionResult};

/// Execute one request to completion
///
/// Every failure kind is normalized into the returned result; see
/// [`ExecutionResult`] for the classification.
#[instrument(skip(config, request), fields(language = %request.language))]
pub async fn execute(config: &Config, request: &ExecutionRequest) -> ExecutionResult {
    let started = Instant::now();

    // Dispatch before any file or process is created
    let language = match config.get_language(&request.language) {
        Ok(language) => language,
        Err(_) => {
            debug!("rejected unsupported language");
            return ExecutionResult::unsupported(&request.language, started.elapsed());
        }
    };

    let artifact = match SourceArtifact::create(
        &config.artifact_dir(),
        &language.extension,
        request.code.as_bytes(),
    )
    .await
    {
        Ok(artifact) => artifact,
        Err(e) => {
            warn!(error = %e, "failed to materialize source artifact");
            return ExecutionResult::spawn_failed(e.to_string(), started.elapsed());
        }
    };

    let result = supervise(config, language, &artifact, request, started).await;

    // The child has fully terminated by now, so no in-flight read can race
    // the deletion.
    artifact.remove();

    result
}

/// Spawn the interpreter and wait on it under the configured deadline
async fn supervise(
    config: &Config,
    language: &Language,
    artifact: &SourceArtifact,
    request: &ExecutionRequest,
    started: Instant,
) -> ExecutionResult {
    let source = artifact.path().to_string_lossy();
    let argv = language.command_for(&source);
    let Some((program, args)) = argv.split_first() else {
        return ExecutionResult::spawn_failed(
            format!("language '{}' has an empty command", language.name),
            started.elapsed(),
        );
    };

    let stdin_payload = request.stdin_payload();

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin_payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in &language.env {
        command.env(key, value);
    }

    debug!(?argv, "spawning interpreter");

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            debug!(error = %e, "interpreter failed to spawn");
            return ExecutionResult::spawn_failed(e.to_string(), started.elapsed());
        }
    };

    // Capture and feeding run concurrently with the wait so a full pipe
    // can never stall the child past the deadline.
    let stdout_task = capture(child.stdout.take());
    let stderr_task = capture(child.stderr.take());
    feed_stdin(child.stdin.take(), stdin_payload);

    match tokio::time::timeout(config.deadline(), child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = drain(stdout_task).await;
            let stderr = drain(stderr_task).await;
            let elapsed = started.elapsed();
            let output = String::from_utf8_lossy(&stdout).into_owned();

            if status.success() {
                debug!(?elapsed, "execution completed");
                ExecutionResult::completed(output, elapsed)
            } else {
                let stderr_text = String::from_utf8_lossy(&stderr).into_owned();
                debug!(exit_code = ?status.code(), ?elapsed, "execution failed");
                ExecutionResult::runtime_error(output, stderr_text, elapsed)
            }
        }
        Ok(Err(e)) => {
            warn!(error = %e, "failed to wait on interpreter");
            ExecutionResult::spawn_failed(e.to_string(), started.elapsed())
        }
        Err(_) => {
            // kill() delivers SIGKILL and reaps the direct child; processes
            // the child spawned itself are not tracked.
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill timed-out interpreter");
            }
            debug!(timeout_secs = config.timeout_secs, "execution deadline elapsed");
            // Partial buffers are discarded; the capture tasks end at EOF
            // once the kill closes the pipes.
            ExecutionResult::timeout(config.timeout_secs)
        }
    }
}

/// Read a child output pipe to the end in a background task
fn capture<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|mut pipe| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf).await {
                warn!(error = %e, "failed to capture child output");
            }
            buf
        })
    })
}

/// Write the stdin payload in a background task
///
/// Dropping the handle at the end closes the pipe and signals EOF.
fn feed_stdin(pipe: Option<ChildStdin>, payload: Option<String>) {
    if let (Some(mut pipe), Some(payload)) = (pipe, payload) {
        tokio::spawn(async move {
            if let Err(e) = pipe.write_all(payload.as_bytes()).await {
                debug!(error = %e, "child closed stdin before input was fully written");
            }
        });
    }
}

async fn drain(task: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    match task {
        Some(task) => match task.await {
            Ok(buf) => buf,
            Err(e) => {
                warn!(error = %e, "output capture task failed");
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}
