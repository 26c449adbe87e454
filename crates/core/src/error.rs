use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("directory '{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    ScanIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid naming convention: {0}")]
    Config(String),

    #[error("failed to access naming convention file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("naming convention JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuditError {
    /// Converts a walk failure into `ScanIo`, keeping the offending path when walkdir knows it.
    pub(crate) fn from_walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|path| path.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        AuditError::ScanIo { path, source }
    }
}
