//! Per-file record: revision tree plus edit bookkeeping
//!
//! This module provides [`FileRecord`], which aggregates one file's
//! [`RevisionTree`], its version counter, and its last-edited time, and
//! implements the file-scoped operations (edit, snapshot, rollback, read,
//! history) on top of the tree.
//!
//! ## Edit semantics
//!
//! An edit lands differently depending on the state of the checked-out
//! revision:
//!
//! - **Mutable current**: the content is changed in place. No version id is
//!   consumed.
//! - **Snapshotted current**: the edit forks a new mutable child carrying
//!   the combined content, consumes the next version id, and moves the
//!   cursor to the child.
//!
//! Either way a successful edit updates the record's last-edited time; a
//! failed edit touches nothing.

use crate::error::{PalimpsestError, Result};
use crate::tree::RevisionTree;
use crate::types::{EditMode, HistoryEntry, VersionId};
use chrono::{DateTime, Utc};
use tracing::debug;

/// One named file: its revision tree and bookkeeping
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// File name, the registry key
    name: String,
    /// Owning revision tree, including the version-id index
    tree: RevisionTree,
    /// Count of revisions ever created; the next fork takes this as its id
    total_versions: u64,
    /// When the file was last successfully edited
    last_edited_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record holding a fresh tree (root revision only)
    ///
    /// `version_buckets` fixes the capacity of the file's version-id index.
    pub fn new(name: impl Into<String>, version_buckets: usize) -> Self {
        Self {
            name: name.into(),
            tree: RevisionTree::with_buckets(version_buckets),
            total_versions: 1,
            last_edited_at: Utc::now(),
        }
    }

    /// Apply an edit to the checked-out revision
    ///
    /// Returns the id of the revision now current: a fresh id when the edit
    /// forked, the unchanged current id when it applied in place.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::EmptyContent`] if `content` is empty; no
    /// state changes in that case.
    pub fn input(&mut self, content: &str, mode: EditMode) -> Result<VersionId> {
        if content.is_empty() {
            return Err(PalimpsestError::EmptyContent);
        }

        if self.tree.current().is_snapshotted() {
            let parent = self.tree.current_id();
            let combined = match mode {
                EditMode::Replace => content.to_string(),
                EditMode::Append => format!("{}{}", self.tree.current().content(), content),
            };

            let id = self.total_versions;
            self.tree.fork(parent, id, combined)?;
            self.tree.set_current(id);
            self.total_versions += 1;
            debug!(file = %self.name, id, "edit forked a new revision");
        } else {
            match mode {
                EditMode::Replace => self.tree.current_mut().set_content(content.to_string()),
                EditMode::Append => self.tree.current_mut().append_content(content),
            }
            debug!(file = %self.name, id = self.tree.current_id(), "edit applied in place");
        }

        self.last_edited_at = Utc::now();
        Ok(self.tree.current_id())
    }

    /// Snapshot the checked-out revision with `message`
    ///
    /// Snapshotting freezes the revision; it does not count as an edit, so
    /// the last-edited time is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::AlreadySnapshotted`] if the current
    /// revision is already a snapshot.
    pub fn snapshot(&mut self, message: impl Into<String>) -> Result<VersionId> {
        self.tree.snapshot_current(message)
    }

    /// Move the cursor to a prior snapshot
    ///
    /// With `Some(id)`, checks out that snapshotted revision. With `None`,
    /// checks out the current revision's parent, which is always a snapshot
    /// for non-root revisions.
    ///
    /// # Errors
    ///
    /// - [`PalimpsestError::InvalidVersionId`] if `id` is unknown or still
    ///   mutable
    /// - [`PalimpsestError::NoParent`] if no id was given and the cursor is
    ///   on the root
    pub fn rollback(&mut self, target: Option<VersionId>) -> Result<VersionId> {
        match target {
            Some(id) => self.tree.checkout(id),
            None => self.tree.checkout_parent(),
        }
    }

    /// Content of the checked-out revision
    pub fn read(&self) -> &str {
        self.tree.current().content()
    }

    /// Snapshot history of the checked-out revision, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.tree.history()
    }

    /// File name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's revision tree
    pub fn tree(&self) -> &RevisionTree {
        &self.tree
    }

    /// Total number of revisions ever created for this file
    pub fn version_count(&self) -> u64 {
        self.total_versions
    }

    /// When the file was last successfully edited
    pub fn last_edited_at(&self) -> DateTime<Utc> {
        self.last_edited_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ROOT_VERSION_ID;

    fn record() -> FileRecord {
        FileRecord::new("notes.txt", 64)
    }

    #[test]
    fn test_empty_content_changes_nothing() {
        let mut file = record();
        let versions_before = file.version_count();
        let edited_before = file.last_edited_at();

        assert_eq!(
            file.input("", EditMode::Append),
            Err(PalimpsestError::EmptyContent)
        );

        assert_eq!(file.version_count(), versions_before);
        assert_eq!(file.last_edited_at(), edited_before);
        assert_eq!(file.read(), "");

        // Same on a mutable current revision.
        file.input("x", EditMode::Append).unwrap();
        assert_eq!(
            file.input("", EditMode::Replace),
            Err(PalimpsestError::EmptyContent)
        );
        assert_eq!(file.read(), "x");
    }

    #[test]
    fn test_edit_on_snapshot_forks() {
        let mut file = record();

        // Root is pre-snapshotted, so the first edit forks id 1.
        let id = file.input("hello", EditMode::Append).unwrap();
        assert_eq!(id, 1);
        assert_eq!(file.read(), "hello");
        assert_eq!(file.version_count(), 2);
        assert_eq!(file.tree().current_id(), 1);
    }

    #[test]
    fn test_edit_in_place_consumes_no_id() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();

        let id = file.input(" world", EditMode::Append).unwrap();
        assert_eq!(id, 1);
        assert_eq!(file.read(), "hello world");
        assert_eq!(file.version_count(), 2);

        let id = file.input("rewritten", EditMode::Replace).unwrap();
        assert_eq!(id, 1);
        assert_eq!(file.read(), "rewritten");
        assert_eq!(file.version_count(), 2);
    }

    #[test]
    fn test_append_fork_concatenates_parent_content() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();
        file.snapshot("v1").unwrap();

        let id = file.input(" world", EditMode::Append).unwrap();
        assert_eq!(id, 2);
        assert_eq!(file.read(), "hello world");
        // The snapshotted parent is untouched.
        assert_eq!(file.tree().get(1).unwrap().content(), "hello");
    }

    #[test]
    fn test_replace_fork_discards_parent_content() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();
        file.snapshot("v1").unwrap();

        file.input("fresh", EditMode::Replace).unwrap();
        assert_eq!(file.read(), "fresh");
        assert_eq!(file.tree().get(1).unwrap().content(), "hello");
    }

    #[test]
    fn test_fork_ids_track_version_counter() {
        let mut file = record();
        for expected in 1..=5 {
            let id = file.input("content", EditMode::Replace).unwrap();
            assert_eq!(id, expected);
            assert_eq!(file.version_count(), expected + 1);
            file.snapshot(format!("v{}", expected)).unwrap();
        }
    }

    #[test]
    fn test_double_snapshot_fails() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();

        assert_eq!(file.snapshot("v1"), Ok(1));
        assert_eq!(
            file.snapshot("v1 again"),
            Err(PalimpsestError::AlreadySnapshotted(1))
        );
    }

    #[test]
    fn test_rollback_to_id() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();
        file.snapshot("v1").unwrap();
        file.input(" world", EditMode::Append).unwrap();

        assert_eq!(file.rollback(Some(ROOT_VERSION_ID)), Ok(ROOT_VERSION_ID));
        assert_eq!(file.read(), "");

        assert_eq!(file.rollback(Some(1)), Ok(1));
        assert_eq!(file.read(), "hello");
    }

    #[test]
    fn test_rollback_to_mutable_version_fails() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();
        file.snapshot("v1").unwrap();
        file.input("wip", EditMode::Replace).unwrap(); // id 2, mutable
        file.rollback(Some(1)).unwrap();

        let current_before = file.tree().current_id();
        assert_eq!(
            file.rollback(Some(2)),
            Err(PalimpsestError::InvalidVersionId(2))
        );
        assert_eq!(file.tree().current_id(), current_before);
    }

    #[test]
    fn test_rollback_without_id_moves_to_parent() {
        let mut file = record();
        file.input("hello", EditMode::Append).unwrap();
        file.snapshot("v1").unwrap();
        file.input(" world", EditMode::Append).unwrap(); // forks id 2 off id 1

        assert_eq!(file.rollback(None), Ok(1));
        assert_eq!(file.read(), "hello");

        assert_eq!(file.rollback(None), Ok(ROOT_VERSION_ID));
        assert_eq!(file.rollback(None), Err(PalimpsestError::NoParent));
    }

    #[test]
    fn test_last_edited_moves_only_on_successful_edit() {
        let mut file = record();
        let created = file.last_edited_at();

        file.input("hello", EditMode::Append).unwrap();
        let after_edit = file.last_edited_at();
        assert!(after_edit >= created);

        // Snapshot and rollback are not edits.
        file.snapshot("v1").unwrap();
        file.rollback(Some(ROOT_VERSION_ID)).unwrap();
        assert_eq!(file.last_edited_at(), after_edit);
    }
}
