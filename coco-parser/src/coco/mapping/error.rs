use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing position map files
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access map file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("map file has no grammar identifier line")]
    MissingHeader,

    #[error("malformed map entry on line {line}: {reason}")]
    Format { line: usize, reason: String },
}

impl MapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            MapError::NotFound(path)
        } else {
            MapError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
