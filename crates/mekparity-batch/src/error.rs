//! Error types for batch runs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch run.
///
/// Unit parse failures are not errors; they become `ParseError` results.
#[derive(Error, Debug)]
pub enum BatchError {
    /// I/O error on a corpus or artifact path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The corpus root is not a directory.
    #[error("corpus root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// The worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BatchError::Io { path, source }
    }
}
