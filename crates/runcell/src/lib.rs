//! A library for ephemeral multi-language code execution.
//!
//! Runcell runs submitted source text as a short-lived, isolated child
//! process and captures what it wrote. Each execution materializes the
//! source as a uniquely named temporary artifact, launches the configured
//! interpreter, enforces a hard wall-clock deadline, and reclaims the
//! artifact on every exit path.
//!
//! # Features
//!
//! - **Language registry** — TOML-configurable mapping from language ID to
//!   interpreter command and file extension; adding a language is one entry.
//! - **Bounded lifetime** — a fixed deadline after which the child is
//!   force-killed; no execution can hang the caller.
//! - **Scoped artifacts** — source files are unique per execution and
//!   removed once the process has fully terminated, success or not.
//! - **Uniform results** — success, runtime failure, spawn failure,
//!   timeout, and unsupported-language rejection share one result shape.

pub use artifact::{ArtifactError, SourceArtifact};
pub use config::{Config, ConfigError, EXAMPLE_CONFIG, Language};
pub use runner::Runner;
pub use types::{ExecutionRequest, ExecutionResult, ExecutionStatus};

pub mod artifact;
pub mod config;
pub mod runner;
pub mod types;
