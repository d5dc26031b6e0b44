//! Scoped source artifacts
//!
//! Materializes submitted source text as a uniquely named temporary file
//! and guarantees its removal once the execution is over.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::FileExtension;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to create artifact directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create artifact in {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A source file scoped to a single execution
///
/// The name is randomly generated, so concurrent executions never share a
/// path; each artifact is exclusively owned by its execution from creation
/// to deletion. Call [`remove()`](Self::remove) once the child process has
/// fully terminated. Dropping the artifact without calling it still
/// deletes the file best-effort.
#[derive(Debug)]
pub struct SourceArtifact {
    file: NamedTempFile,
}

impl SourceArtifact {
    /// Materialize source text under `dir` with the given extension
    ///
    /// The directory is created if it does not exist yet.
    #[instrument(skip(content))]
    pub async fn create(
        dir: &Path,
        extension: &FileExtension,
        content: &[u8],
    ) -> Result<Self, ArtifactError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ArtifactError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let suffix = format!(".{extension}");
        let mut builder = tempfile::Builder::new();
        builder.prefix("cell-");
        if !extension.is_empty() {
            builder.suffix(&suffix);
        }
        let file = builder
            .tempfile_in(dir)
            .map_err(|source| ArtifactError::Create {
                path: dir.to_path_buf(),
                source,
            })?;

        tokio::fs::write(file.path(), content)
            .await
            .map_err(|source| ArtifactError::Write {
                path: file.path().to_path_buf(),
                source,
            })?;

        debug!(
            path = %file.path().display(),
            len = content.len(),
            "materialized source artifact"
        );

        Ok(Self { file })
    }

    /// Host path of the artifact, handed to the interpreter
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the artifact
    ///
    /// Best-effort: a failed deletion is logged and never surfaces to the
    /// caller as an execution failure.
    pub fn remove(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!(path = %path.display(), "removed source artifact"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove source artifact");
            }
        }
    }
}
