use std::collections::HashMap;
use std::time::{Duration, Instant};

use runcell::config::{FileExtension, Language};
use runcell::runner::Runner;
use runcell::types::{ExecutionRequest, ExecutionStatus};

use super::shell_config;

#[tokio::test]
async fn test_run_writes_literal_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 10));

    let request = ExecutionRequest::new("echo 'hello from the cell'", "shell");
    let result = runner.execute(&request).await;

    assert!(result.is_success());
    assert_eq!(result.status, ExecutionStatus::Ok);
    assert!(result.output.contains("hello from the cell"));
    assert!(result.error.is_none());
    assert!(result.execution_time >= 0.0);
}

#[tokio::test]
async fn test_run_feeds_inputs_to_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 10));

    let request = ExecutionRequest::new("cat", "shell")
        .with_inputs(vec!["first line".to_owned(), "second line".to_owned()]);
    let result = runner.execute(&request).await;

    assert!(result.is_success());
    // Inputs are newline-joined with nothing appended
    assert_eq!(result.output, "first line\nsecond line");
}

#[tokio::test]
async fn test_run_without_inputs_sees_closed_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 10));

    // `cat` must hit EOF immediately rather than block on an open pipe
    let request = ExecutionRequest::new("cat", "shell");
    let result = runner.execute(&request).await;

    assert!(result.is_success());
    assert_eq!(result.output, "");
}

#[tokio::test]
async fn test_run_nonzero_exit_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 10));

    let request = ExecutionRequest::new(
        "echo partial output\necho 'boom' >&2\nexit 3",
        "shell",
    );
    let result = runner.execute(&request).await;

    assert!(!result.is_success());
    assert_eq!(result.status, ExecutionStatus::RuntimeError);
    // Partial stdout before the failure is still returned
    assert!(result.output.contains("partial output"));
    assert!(result.error.as_deref().unwrap().contains("boom"));
    assert!(result.execution_time >= 0.0);
}

#[tokio::test]
async fn test_run_timeout_kills_child_within_window() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 1));

    let started = Instant::now();
    let request = ExecutionRequest::new("sleep 30", "shell");
    let result = runner.execute(&request).await;

    // The call must come back shortly after the deadline, not after sleep 30
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(result.status, ExecutionStatus::Timeout);
    assert_eq!(result.output, "");
    assert_eq!(
        result.error.as_deref(),
        Some("Code execution timeout (1 seconds)")
    );
    // Pinned to the deadline value, not measured elapsed time
    assert_eq!(result.execution_time, 1.0);
}

#[tokio::test]
async fn test_run_timeout_discards_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 1));

    let request = ExecutionRequest::new("echo early output\nsleep 30", "shell");
    let result = runner.execute(&request).await;

    assert_eq!(result.status, ExecutionStatus::Timeout);
    assert_eq!(result.output, "");
}

#[tokio::test]
async fn test_unsupported_language_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 10));

    let request = ExecutionRequest::new("puts 'hi'", "ruby");
    let result = runner.execute(&request).await;

    assert_eq!(result.status, ExecutionStatus::Unsupported);
    assert_eq!(result.output, "");
    assert_eq!(
        result.error.as_deref(),
        Some("Language 'ruby' not supported for execution")
    );
}

#[tokio::test]
async fn test_missing_interpreter_is_spawn_failure_not_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = shell_config(dir.path(), 10);
    config.languages.insert(
        "ghost".to_owned(),
        Language {
            name: "Ghost".to_owned(),
            extension: FileExtension::new("ghost").unwrap(),
            command: vec![
                "runcell-no-such-interpreter".to_owned(),
                "{source}".to_owned(),
            ],
            env: HashMap::new(),
        },
    );
    let runner = Runner::new(config);

    let request = ExecutionRequest::new("anything", "ghost");
    let result = runner.execute(&request).await;

    assert_eq!(result.status, ExecutionStatus::SpawnFailed);
    let error = result.error.as_deref().unwrap();
    assert!(!error.is_empty());
    assert!(!error.contains("timeout"));
}

#[tokio::test]
async fn test_concurrent_executions_do_not_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(shell_config(dir.path(), 10));

    let mut handles = Vec::new();
    for i in 0..8 {
        let runner = runner.clone();
        handles.push(tokio::spawn(async move {
            let request = ExecutionRequest::new(format!("echo token-{i}"), "shell");
            (i, runner.execute(&request).await)
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        assert!(result.is_success(), "execution {i} failed: {:?}", result.error);
        assert_eq!(result.output, format!("token-{i}\n"));
    }
}

#[tokio::test]
#[ignore = "requires python3"]
async fn test_python_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = runcell::Config::default();
    config.temp_dir = Some(dir.path().to_path_buf());
    let runner = Runner::new(config);

    let request = ExecutionRequest::new(
        "print('Hello from Python!')\nresult = 2 + 3\nprint(f'2 + 3 = {result}')",
        "python",
    );
    let result = runner.execute(&request).await;

    assert!(result.is_success(), "error: {:?}", result.error);
    assert!(result.output.contains("Hello from Python!"));
    assert!(result.output.contains("2 + 3 = 5"));
    assert!(result.error.is_none());
}

#[tokio::test]
#[ignore = "requires python3"]
async fn test_python_reads_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = runcell::Config::default();
    config.temp_dir = Some(dir.path().to_path_buf());
    let runner = Runner::new(config);

    let request = ExecutionRequest::new(
        "name = input()\nprint(f'hello {name}')",
        "python",
    )
    .with_inputs(vec!["world".to_owned()]);
    let result = runner.execute(&request).await;

    assert!(result.is_success(), "error: {:?}", result.error);
    assert!(result.output.contains("hello world"));
}
