//! Error types.
//!
//! `LedgerError` is the closed set of failures raised where a project name meets the filesystem
//! (the locator and the CSV store). The command layer uses `anyhow` on top of it; a
//! `LedgerError` travels through `anyhow` intact and can be recovered with `downcast_ref`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The result type of the locator and the CSV store.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Failures that can occur while resolving, reading, creating or writing a project file.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No backing file exists for the project.
    #[error("Project '{project}' is not found")]
    NotFound { project: String, path: Option<PathBuf> },

    /// More than one backing file matches the project, or the project already exists.
    #[error("Project '{project}' already exists or is ambiguous ({} matching files)", .paths.len())]
    Duplicate { project: String, paths: Vec<PathBuf> },

    /// The backing file exists but cannot be read.
    #[error("Project file {} is unreadable", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file was read but does not follow the ledger layout.
    #[error("Project file {} is corrupted: {reason}", .path.display())]
    Corrupted { path: PathBuf, reason: String },

    /// The goal segment of a goal-encoded file name is not a non-negative number.
    #[error("Goal '{segment}' in project file {} is not a valid amount", .path.display())]
    MalformedGoal { path: PathBuf, segment: String },

    /// The backing file could not be created or overwritten.
    #[error("Project file {} could not be written", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LedgerError {
    pub(crate) fn corrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LedgerError::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unwritable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LedgerError::Unwritable {
            path: path.into(),
            source,
        }
    }
}

/// Failures that can occur while coercing a single value into a ledger cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("'{0}' is not a valid amount")]
    Amount(String),

    #[error("'{0}' is not a valid date, expected YYYY-MM-DD")]
    Date(String),

    #[error("'{0}' is a reserved column and cannot be used as a contributor")]
    ReservedColumn(String),

    #[error("A contributor name cannot be empty")]
    EmptyName,
}
