use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the file-system shim.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no file or dual-syntax variant found for {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid project configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl VfsError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        VfsError::Io {
            path: path.into(),
            source,
        }
    }
}
