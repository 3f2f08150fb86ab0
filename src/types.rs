//! Core data types used throughout the palimpsest library
//!
//! This module contains the small value types that are shared across
//! different components of the library:
//!
//! - **Identifiers**: [`VersionId`] - per-file revision identifiers
//! - **Operations**: [`EditMode`] - how an edit combines with current content
//! - **Query rows**: [`HistoryEntry`], [`FileRecency`], [`FileVersionCount`] -
//!   results of history and registry-wide queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a revision within a single file
///
/// Ids are assigned sequentially starting at 0 for the root revision and are
/// strictly increasing within a file. They are never reused; an id remains
/// valid for the lifetime of the process.
pub type VersionId = u64;

/// How edit content combines with the current revision's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditMode {
    /// Overwrite the current content entirely
    Replace,
    /// Concatenate onto the end of the current content
    Append,
}

/// One row of a file's snapshot history
///
/// Produced by history queries: only snapshotted revisions appear, ordered
/// oldest first along the parent chain from the root to the queried revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Revision id within the file
    pub version_id: VersionId,
    /// Message supplied when the revision was snapshotted
    pub message: String,
    /// When the revision was snapshotted
    pub snapshot_at: DateTime<Utc>,
}

/// One row of a most-recently-edited query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecency {
    /// File name
    pub name: String,
    /// When the file was last edited
    pub last_edited_at: DateTime<Utc>,
}

/// One row of a most-versions query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVersionCount {
    /// File name
    pub name: String,
    /// Total number of revisions the file has accumulated
    pub versions: u64,
}
