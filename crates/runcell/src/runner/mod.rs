//! Execution runner for Runcell
//!
//! Supervises one child process per request: dispatch, artifact
//! materialization, bounded wait, output capture.

pub use crate::runner::execute::execute;

mod execute;

use tracing::warn;

use crate::config::Config;
use crate::types::{ExecutionRequest, ExecutionResult};

/// High-level entry point for code execution
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one request to completion
    ///
    /// Never fails at the call level: unsupported languages, spawn
    /// failures, runtime errors, and timeouts are all reported through the
    /// returned [`ExecutionResult`], so a crashed or hung child never
    /// becomes a service-level failure. Requests are never retried.
    ///
    /// The pipeline runs in a detached task: even if the caller abandons
    /// this future, the child still runs to completion or forced kill and
    /// the source artifact is reclaimed.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionResult {
        let config = self.config.clone();
        let request = request.clone();
        let pipeline = tokio::spawn(async move { execute::execute(&config, &request).await });

        match pipeline.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "execution pipeline task failed");
                ExecutionResult::spawn_failed(e.to_string(), std::time::Duration::ZERO)
            }
        }
    }
}
