//! Revision definitions and the snapshot state machine
//!
//! This module defines the [`Revision`] node: one content state of a file,
//! placed in its branching history.
//!
//! ## State machine
//!
//! Every revision is in exactly one of two states:
//!
//! - **Mutable**: no snapshot yet (`snapshot_at` is `None`). The content may
//!   be edited in place.
//! - **Snapshotted**: an explicit snapshot stamped a timestamp and message.
//!   The state is terminal; the revision's content never changes again, and
//!   any further edit forks a new mutable child instead.
//!
//! The only transition is Mutable to Snapshotted, via [`Revision::snapshot`].
//! There is no reverse transition.
//!
//! ## Examples
//!
//! ```rust
//! use palimpsest::revision::Revision;
//!
//! let root = Revision::root();
//! assert!(root.is_snapshotted());
//! assert_eq!(root.message(), Some("INITIAL SNAPSHOT"));
//!
//! let mut child = Revision::fork(1, "draft".to_string(), root.id());
//! assert!(child.is_mutable());
//! child.snapshot("first real version").unwrap();
//! assert!(child.snapshot("again").is_err());
//! ```

use crate::error::{PalimpsestError, Result};
use crate::types::VersionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message carried by every file's root revision
pub const INITIAL_SNAPSHOT_MESSAGE: &str = "INITIAL SNAPSHOT";

/// One content state of a file in its branching revision history
///
/// A revision stores full content, not a diff. It references its parent and
/// children by [`VersionId`]; the owning [`RevisionTree`](crate::tree::RevisionTree)
/// arena resolves ids to nodes, so no revision holds a pointer into the tree.
///
/// Revisions are created only at tree construction (the root) or by forking,
/// and are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// Id, unique and strictly increasing within the owning file
    id: VersionId,
    /// Full content at this revision
    content: String,
    /// Snapshot message; `None` until the revision is snapshotted
    message: Option<String>,
    /// When the revision was created
    created_at: DateTime<Utc>,
    /// When the revision was snapshotted; `None` while still mutable,
    /// and never cleared once set
    snapshot_at: Option<DateTime<Utc>>,
    /// Parent revision id; `None` only for the root
    parent: Option<VersionId>,
    /// Child revision ids, in creation order
    children: Vec<VersionId>,
}

impl Revision {
    /// Create a file's root revision
    ///
    /// The root has id 0, empty content, and is born snapshotted with the
    /// message [`INITIAL_SNAPSHOT_MESSAGE`], so it is a valid rollback
    /// target from the moment the file exists.
    pub fn root() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            content: String::new(),
            message: Some(INITIAL_SNAPSHOT_MESSAGE.to_string()),
            created_at: now,
            snapshot_at: Some(now),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a new mutable revision forked from `parent`
    pub fn fork(id: VersionId, content: String, parent: VersionId) -> Self {
        Self {
            id,
            content,
            message: None,
            created_at: Utc::now(),
            snapshot_at: None,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    /// Snapshot this revision, making it permanently immutable
    ///
    /// Stamps the current time and stores `message`.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::AlreadySnapshotted`] if the revision has
    /// already been snapshotted.
    pub fn snapshot(&mut self, message: impl Into<String>) -> Result<DateTime<Utc>> {
        if self.snapshot_at.is_some() {
            return Err(PalimpsestError::AlreadySnapshotted(self.id));
        }

        let now = Utc::now();
        self.snapshot_at = Some(now);
        self.message = Some(message.into());
        Ok(now)
    }

    /// Whether this revision has been snapshotted (is immutable)
    pub fn is_snapshotted(&self) -> bool {
        self.snapshot_at.is_some()
    }

    /// Whether this revision may still be edited in place
    pub fn is_mutable(&self) -> bool {
        self.snapshot_at.is_none()
    }

    /// Revision id within the owning file
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// Full content at this revision
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Snapshot message, if the revision has been snapshotted
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// When the revision was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the revision was snapshotted, if it has been
    pub fn snapshot_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot_at
    }

    /// Parent revision id; `None` only for the root
    pub fn parent(&self) -> Option<VersionId> {
        self.parent
    }

    /// Child revision ids, in creation order
    pub fn children(&self) -> &[VersionId] {
        &self.children
    }

    /// Overwrite content in place. Caller must hold the mutability invariant.
    pub(crate) fn set_content(&mut self, content: String) {
        debug_assert!(self.is_mutable());
        self.content = content;
    }

    /// Concatenate onto content in place. Caller must hold the mutability invariant.
    pub(crate) fn append_content(&mut self, content: &str) {
        debug_assert!(self.is_mutable());
        self.content.push_str(content);
    }

    /// Record a newly forked child id
    pub(crate) fn push_child(&mut self, child: VersionId) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_pre_snapshotted() {
        let root = Revision::root();
        assert_eq!(root.id(), 0);
        assert_eq!(root.content(), "");
        assert_eq!(root.message(), Some(INITIAL_SNAPSHOT_MESSAGE));
        assert!(root.is_snapshotted());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_fork_starts_mutable() {
        let child = Revision::fork(3, "hello".to_string(), 0);
        assert_eq!(child.id(), 3);
        assert_eq!(child.content(), "hello");
        assert!(child.is_mutable());
        assert!(child.message().is_none());
        assert_eq!(child.parent(), Some(0));
    }

    #[test]
    fn test_snapshot_transition_is_terminal() {
        let mut rev = Revision::fork(1, "v1".to_string(), 0);

        let at = rev.snapshot("first").unwrap();
        assert!(rev.is_snapshotted());
        assert_eq!(rev.message(), Some("first"));
        assert_eq!(rev.snapshot_at(), Some(at));

        assert_eq!(
            rev.snapshot("second"),
            Err(PalimpsestError::AlreadySnapshotted(1))
        );
        // First snapshot untouched by the failed attempt.
        assert_eq!(rev.message(), Some("first"));
        assert_eq!(rev.snapshot_at(), Some(at));
    }

    #[test]
    fn test_snapshot_root_fails() {
        let mut root = Revision::root();
        assert_eq!(
            root.snapshot("again"),
            Err(PalimpsestError::AlreadySnapshotted(0))
        );
    }
}
