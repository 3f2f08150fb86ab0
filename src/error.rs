//! Error types for the palimpsest library
//!
//! This module defines all error values that palimpsest operations can
//! return. Every failure is a value; no operation aborts the process, and
//! the caller decides whether and how to surface an error to the user.
//!
//! Failed operations never leave partial state behind: an operation either
//! fully applies its effect or applies none.

use crate::types::VersionId;
use thiserror::Error;

/// Type alias for Results in the palimpsest library
pub type Result<T> = std::result::Result<T, PalimpsestError>;

/// Main error type for all palimpsest operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PalimpsestError {
    /// No file with this name exists in the registry
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A file with this name already exists in the registry
    #[error("file already exists: {0}")]
    FileAlreadyExists(String),

    /// Edit content was empty
    #[error("content cannot be empty")]
    EmptyContent,

    /// The revision is already snapshotted and cannot be snapshotted again
    #[error("version {0} is already a snapshot")]
    AlreadySnapshotted(VersionId),

    /// The version id does not name a snapshotted revision of this file
    #[error("invalid version id: {0}")]
    InvalidVersionId(VersionId),

    /// Rollback without a target id was requested on the root revision
    #[error("current version has no parent to roll back to")]
    NoParent,

    /// A top-K query asked for more files than the registry holds
    #[error("only {available} files exist, {requested} requested")]
    InsufficientFiles {
        /// Number of files in the registry
        available: usize,
        /// Number of files the query asked for
        requested: usize,
    },
}

impl PalimpsestError {
    /// Check if this error means a lookup target did not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PalimpsestError::FileNotFound(_) | PalimpsestError::InvalidVersionId(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            PalimpsestError::FileNotFound(name) => {
                format!("File '{}' not found. Create it first with CREATE.", name)
            }
            PalimpsestError::InvalidVersionId(id) => {
                format!(
                    "Version {} is not a snapshotted version of this file. \
                     Use HISTORY to list the versions that can be rolled back to.",
                    id
                )
            }
            PalimpsestError::AlreadySnapshotted(id) => {
                format!(
                    "Version {} is already a snapshot. Edit the file to fork a new version first.",
                    id
                )
            }
            PalimpsestError::InsufficientFiles { available, .. } => {
                format!("Only {} files exist.", available)
            }
            _ => self.to_string(),
        }
    }
}
