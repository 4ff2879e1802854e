// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building or navigating a file's history
#[derive(Error, Debug)]
pub enum Error {
    /// The file does not live inside a git working tree
    #[error("no git repository found for {}: {message}", path.display())]
    RepositoryNotFound { path: PathBuf, message: String },

    /// A path that was expected to be inside the repository root is not
    #[error("{} is not inside repository root {}", path.display(), root.display())]
    InvalidPath { path: PathBuf, root: PathBuf },

    /// The annotate command could not be run or exited with a failure
    #[error("annotation failed: {0}")]
    AnnotationFailed(String),

    /// A heat level outside 0..=255 was handed to the color interpolator
    #[error("invalid heat level: {0}")]
    InvalidLevel(i64),

    /// A commit identifier that the successor history does not know about
    #[error("unknown commit: {0}")]
    UnknownCommit(String),

    #[error("commit index {index} out of range for {len} changes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
