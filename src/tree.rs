//! Revision tree with a movable checkout cursor
//!
//! This module provides [`RevisionTree`], the per-file branching history of
//! [`Revision`] nodes.
//!
//! ## Structure
//!
//! The tree is an arena: revisions are owned by a fixed-capacity
//! [`ChainedIndex`] keyed by version id, and nodes reference each other by
//! id only. The index doubles as the file's version-id lookup table -
//! populated when the root is created and on every fork, never on an
//! in-place edit - so any revision is reachable both through the parent
//! chain and by direct id lookup.
//!
//! ```text
//! 0 (root, snapshotted)
//! ├── 1 (snapshotted)
//! │   ├── 2
//! │   └── 3 (fork)
//! └── 4 (another branch)
//! ```
//!
//! A `current` cursor marks the checked-out revision. It may sit on any
//! node, not necessarily a leaf; moving it never discards other branches.
//! Revisions are never deleted.

use crate::error::{PalimpsestError, Result};
use crate::index::ChainedIndex;
use crate::revision::Revision;
use crate::types::{HistoryEntry, VersionId};
use tracing::{debug, trace};

/// Version id of every file's root revision
pub const ROOT_VERSION_ID: VersionId = 0;

/// Per-file owning tree of revisions with a `current` cursor
///
/// The tree starts with a pre-snapshotted root (id 0) and grows only by
/// forking. The cursor starts on the root.
#[derive(Debug, Clone)]
pub struct RevisionTree {
    /// Arena and version-id index in one: id -> owned revision
    revisions: ChainedIndex<VersionId, Revision>,
    /// Id of the checked-out revision
    current: VersionId,
}

impl RevisionTree {
    /// Create a tree holding only the root revision
    ///
    /// `bucket_count` fixes the capacity of the version-id index for the
    /// tree's lifetime.
    pub fn with_buckets(bucket_count: usize) -> Self {
        let mut revisions = ChainedIndex::with_buckets(bucket_count);
        revisions.insert(ROOT_VERSION_ID, Revision::root());
        Self {
            revisions,
            current: ROOT_VERSION_ID,
        }
    }

    /// Id of the checked-out revision
    pub fn current_id(&self) -> VersionId {
        self.current
    }

    /// The checked-out revision
    pub fn current(&self) -> &Revision {
        self.node(self.current)
    }

    /// The checked-out revision, mutably
    pub(crate) fn current_mut(&mut self) -> &mut Revision {
        self.revisions
            .find_mut(&self.current)
            .expect("current revision is always present in the index")
    }

    /// Look up a revision by id
    pub fn get(&self, id: VersionId) -> Option<&Revision> {
        self.revisions.find(&id)
    }

    /// Number of revisions in the tree
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether the tree is empty; always false, a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Fork a new mutable revision as a child of `parent`
    ///
    /// The child is appended to the parent's child list (creation order is
    /// preserved) and registered in the version-id index. The cursor does
    /// not move; the caller decides whether to check the child out.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::InvalidVersionId`] if `parent` is not in
    /// the tree.
    pub fn fork(&mut self, parent: VersionId, new_id: VersionId, content: String) -> Result<VersionId> {
        if self.revisions.find(&parent).is_none() {
            return Err(PalimpsestError::InvalidVersionId(parent));
        }
        debug_assert!(
            self.revisions.find(&new_id).is_none(),
            "fork ids must never be reused"
        );

        self.revisions.insert(new_id, Revision::fork(new_id, content, parent));
        self.revisions
            .find_mut(&parent)
            .expect("parent existence checked above")
            .push_child(new_id);

        debug!(parent, new_id, "forked revision");
        Ok(new_id)
    }

    /// Snapshot the checked-out revision
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::AlreadySnapshotted`] if the current
    /// revision is already a snapshot.
    pub fn snapshot_current(&mut self, message: impl Into<String>) -> Result<VersionId> {
        let id = self.current;
        self.current_mut().snapshot(message)?;
        debug!(id, "snapshotted revision");
        Ok(id)
    }

    /// Move the cursor to a snapshotted revision anywhere in the tree
    ///
    /// This is a pointer move, not a destructive revert: every branch stays
    /// intact and reachable.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::InvalidVersionId`] if `id` is not in the
    /// tree, or names a revision that is still mutable.
    pub fn checkout(&mut self, id: VersionId) -> Result<VersionId> {
        match self.revisions.find(&id) {
            Some(revision) if revision.is_snapshotted() => {
                self.current = id;
                debug!(id, "checked out revision");
                Ok(id)
            }
            _ => Err(PalimpsestError::InvalidVersionId(id)),
        }
    }

    /// Move the cursor to the current revision's parent
    ///
    /// Every non-root revision's parent was a snapshot at the moment the
    /// child was forked, and snapshots are permanent, so the parent is
    /// always a valid checkout target.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::NoParent`] if the cursor is on the root.
    pub fn checkout_parent(&mut self) -> Result<VersionId> {
        let parent = self.current().parent().ok_or(PalimpsestError::NoParent)?;
        self.current = parent;
        debug!(parent, "checked out parent revision");
        Ok(parent)
    }

    /// Snapshot history along the parent chain of the checked-out revision
    ///
    /// Walks from the current revision up to the root, collecting every
    /// snapshotted node, and returns them oldest first. Cost is proportional
    /// to the depth of the current revision.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();
        let mut cursor = Some(self.current);

        while let Some(id) = cursor {
            let revision = self.node(id);
            if let (Some(message), Some(snapshot_at)) = (revision.message(), revision.snapshot_at())
            {
                entries.push(HistoryEntry {
                    version_id: revision.id(),
                    message: message.to_string(),
                    snapshot_at,
                });
            }
            cursor = revision.parent();
        }

        entries.reverse();
        trace!(count = entries.len(), "collected snapshot history");
        entries
    }

    fn node(&self, id: VersionId) -> &Revision {
        self.revisions
            .find(&id)
            .expect("revision ids handed out by the tree are always present")
    }

    /// Move the cursor without the snapshot check. Used after a fork, where
    /// the target is a brand-new mutable child.
    pub(crate) fn set_current(&mut self, id: VersionId) {
        debug_assert!(self.revisions.find(&id).is_some());
        self.current = id;
    }
}
