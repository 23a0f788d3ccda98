use std::path::PathBuf;

use thiserror::Error;

/// Host-level failures. Language errors are diagnostics, never `CoreError`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("failed to write artifact to {path}: {source}")]
    PersistArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact path {0} has no file name")]
    InvalidArtifactPath(PathBuf),
}
