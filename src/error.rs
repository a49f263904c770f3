//! Error types for loading declarations and exporting interfaces.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a run.
///
/// Unsupported type shapes are not errors; they are logged and degraded
/// in place by the projector.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// A glob entry could not be read.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// A glob pattern matched nothing.
    #[error("glob pattern matched no files: {pattern}")]
    NoSourceFiles {
        /// The pattern as given.
        pattern: String,
    },

    /// A declaration file could not be parsed.
    #[error("failed to parse declaration file {path}:\n{message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Rendered parser error.
        message: String,
    },

    /// The build instruction file is malformed.
    #[error("invalid build instructions in {path}: {message}")]
    Instructions {
        /// Instruction file.
        path: PathBuf,
        /// Deserialization error with its JSON path.
        message: String,
    },

    /// A referenced source file is not part of the project.
    #[error("source file not found: {path}")]
    SourceFileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// A referenced class is not declared in its source file.
    #[error("class '{class}' not found in {file}")]
    ClassNotFound {
        /// Requested class name.
        class: String,
        /// File searched.
        file: PathBuf,
    },
}

impl Error {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn class_not_found(class: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::ClassNotFound {
            class: class.into(),
            file: file.into(),
        }
    }
}
