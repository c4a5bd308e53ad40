use std::path::PathBuf;
use thiserror::Error;

/// Fatal dataset load failures. Data-quality problems inside a readable
/// file never surface here; they are absorbed during normalization.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed ticket data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl LoadError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
