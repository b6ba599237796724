//! Error types for the ara CLI
//!
//! Error messages are meant to be read by whoever runs the command, so they
//! carry a hint on how to resolve the issue where one exists.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ara CLI
#[derive(Error, Debug)]
pub enum Error {
    // === Workspace Errors ===
    #[error("Workspace already initialized at '{}'. Use 'ara reset' to start over", .0.display())]
    WorkspaceAlreadyInitialized(PathBuf),

    #[error("No workspace found at '{}'. Run 'ara init' first", .0.display())]
    WorkspaceNotInitialized(PathBuf),

    // === Configuration Errors ===
    #[error("Configuration file '{}' is corrupt: {reason}", .path.display())]
    CorruptConfig { path: PathBuf, reason: String },

    #[error("Cannot set a value below '{key}': it already holds {found}, not an object")]
    TypeConflict { key: String, found: &'static str },

    #[error("Invalid key path '{0}': segments must be non-empty and separated by '.'")]
    InvalidKeyPath(String),

    #[error("Configuration key '{0}' is not set")]
    KeyNotFound(String),

    #[error("Configuration has no version timestamp. Set it with 'ara config set version.millis <millis>'")]
    VersionNotSet,

    // === Artifact Errors ===
    #[error("Report '{}' does not exist", .0.display())]
    ReportMissing(PathBuf),

    #[error("Source '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Cannot write '{}': {source}", .path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Copy aborted at '{}': {source}", .path.display())]
    CopyAborted {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Cannot copy '{}' into '{}': destination lies inside the source", .src.display(), .dst.display())]
    DestinationInsideSource { src: PathBuf, dst: PathBuf },

    #[error("Invalid {field} '{value}': must be a single path segment")]
    InvalidSegment { field: &'static str, value: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a corrupt configuration error
    pub fn corrupt_config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptConfig {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a destination unwritable error
    pub fn unwritable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DestinationUnwritable {
            path: path.into(),
            source,
        }
    }

    /// Wrap the first failure of a directory walk
    pub fn copy_aborted(path: impl Into<PathBuf>, source: impl Into<Error>) -> Self {
        Self::CopyAborted {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }

    /// Process exit status for this error
    ///
    /// `2` for workspace-state preconditions, `3` for a missing report,
    /// `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::WorkspaceAlreadyInitialized(_) | Error::WorkspaceNotInitialized(_) => 2,
            Error::ReportMissing(_) => 3,
            _ => 1,
        }
    }
}
