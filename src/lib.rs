//! # Palimpsest - Branching revision histories for named files
//!
//! A versioning engine that tracks, per named file, a branching tree of
//! content revisions: append or replace content, snapshot a revision with a
//! message to freeze it, and roll the active view back to any prior snapshot
//! without discarding other branches.
//!
//! ## Overview
//!
//! Palimpsest keeps every revision a file has ever had:
//!
//! - Edit a file's current revision in place while it is still mutable
//! - Snapshot a revision to make it permanently immutable
//! - Editing a snapshotted revision forks a new child branch automatically
//! - Roll back to any snapshot by version id; all branches stay reachable
//! - Query a file's snapshot history along its current branch
//! - Rank files registry-wide by recency of edits or number of versions
//!
//! ## Quick Start
//!
//! ```rust
//! use palimpsest::{EditMode, Palimpsest};
//!
//! # fn main() -> palimpsest::Result<()> {
//! let mut store = Palimpsest::new();
//!
//! store.create_file("notes.txt")?;
//!
//! // The root is born snapshotted, so the first edit forks version 1.
//! store.input("notes.txt", "hello", EditMode::Append)?;
//! store.snapshot("notes.txt", "first draft")?;
//!
//! // Editing the snapshot forks version 2.
//! store.input("notes.txt", " world", EditMode::Append)?;
//! assert_eq!(store.read("notes.txt")?, "hello world");
//!
//! // Roll back to the snapshot; version 2 stays reachable.
//! store.rollback("notes.txt", Some(1))?;
//! assert_eq!(store.read("notes.txt")?, "hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Revisions
//!
//! A revision is one content state of a file, holding full content rather
//! than a diff. Each revision has a per-file id (sequential from 0), a
//! parent, and an ordered list of children; together they form the file's
//! revision tree. Revisions are never deleted.
//!
//! ### Snapshots
//!
//! A snapshot is an explicit, user-named, timestamped checkpoint that makes
//! a revision permanently immutable. Immutability is what creates branches:
//! editing a snapshotted revision forks a new mutable child instead of
//! changing the snapshot.
//!
//! ### Rollback
//!
//! Rolling back moves the file's `current` cursor to an existing snapshot
//! anywhere in the tree. It is a pointer move, not a revert; no branch is
//! discarded, and any revision can be returned to later by id.
//!
//! ### Registry queries
//!
//! The store scans all files once into a transient bounded max-heap to
//! answer "most recently edited" and "most versions" queries; ties order by
//! file name for deterministic output.
//!
//! ## Design Notes
//!
//! - All lookups return `Option`/`Result`; there is no null-means-absent
//!   anywhere in the API.
//! - The name registry and each per-file version index are fixed-capacity
//!   hash indexes with separate chaining; they never resize. See
//!   [`index`] for the documented scalability ceiling.
//! - The store is single-threaded and fully synchronous; wrap it in a lock
//!   to share it across threads.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, PalimpsestError>`. Failures are plain
//! values (file not found, empty content, already snapshotted, ...) and
//! never leave partial state behind.
//!
//! ## Module Organization
//!
//! - [`palimpsest`]: the [`Palimpsest`] store and its builder
//! - [`file`]: per-file record and edit/snapshot/rollback logic
//! - [`tree`]: the branching revision tree with its checkout cursor
//! - [`revision`]: revision nodes and the snapshot state machine
//! - [`index`]: fixed-capacity associative index (separate chaining)
//! - [`heap`]: transient top-K selection heap
//! - [`types`]: shared value types
//! - [`error`]: error types and handling

pub mod error;
pub mod file;
pub mod heap;
pub mod index;
pub mod palimpsest;
pub mod revision;
pub mod tree;
pub mod types;

// Re-export main types for convenience
pub use error::{PalimpsestError, Result};
pub use file::FileRecord;
pub use heap::{HeapEntry, SelectionHeap};
pub use index::{BucketKey, ChainedIndex, DEFAULT_BUCKETS};
pub use palimpsest::{Palimpsest, PalimpsestBuilder};
pub use revision::{Revision, INITIAL_SNAPSHOT_MESSAGE};
pub use tree::{RevisionTree, ROOT_VERSION_ID};
pub use types::*;
