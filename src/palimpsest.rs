//! Main palimpsest store implementation
//!
//! This module provides the [`Palimpsest`] struct, the process-wide file
//! registry and the main entry point for every operation: creating files,
//! editing, snapshotting, rolling back, and the registry-wide top-K queries.
//!
//! ## Structure
//!
//! The registry owns every [`FileRecord`] through a fixed-capacity
//! name index, and keeps a creation-ordered list of names beside it for
//! registry-wide scans. Files are only ever created; there is no deletion
//! operation, and every record lives for the registry's whole lifetime.
//!
//! ## Concurrency
//!
//! `Palimpsest` is single-threaded and fully synchronous: every operation
//! runs to completion before the next one is accepted, so there are no data
//! races by construction. Wrap it in external synchronization if it must be
//! shared across threads.
//!
//! ## Examples
//!
//! ```rust
//! use palimpsest::{EditMode, Palimpsest};
//!
//! # fn main() -> palimpsest::Result<()> {
//! let mut store = Palimpsest::new();
//!
//! store.create_file("notes.txt")?;
//! store.input("notes.txt", "hello", EditMode::Append)?;
//! store.snapshot("notes.txt", "first draft")?;
//! store.input("notes.txt", " world", EditMode::Append)?;
//!
//! store.rollback("notes.txt", Some(1))?;
//! assert_eq!(store.read("notes.txt")?, "hello");
//! # Ok(())
//! # }
//! ```

use crate::error::{PalimpsestError, Result};
use crate::file::FileRecord;
use crate::heap::SelectionHeap;
use crate::index::{ChainedIndex, DEFAULT_BUCKETS};
use crate::types::{EditMode, FileRecency, FileVersionCount, HistoryEntry, VersionId};
use tracing::{debug, info, trace};

/// Process-wide registry of files and entry point for all operations
///
/// Construct with [`Palimpsest::new`] for default index capacities, or
/// through [`PalimpsestBuilder`] to size the indexes explicitly. The store
/// is an ordinary owned value - tests and embedders can hold as many
/// isolated instances as they like.
#[derive(Debug)]
pub struct Palimpsest {
    /// File records indexed by name
    files: ChainedIndex<String, FileRecord>,
    /// File names in creation order, for registry-wide scans
    order: Vec<String>,
    /// Bucket count handed to each new file's version-id index
    version_buckets: usize,
}

impl Palimpsest {
    /// Create a store with default index capacities
    pub fn new() -> Self {
        PalimpsestBuilder::new().build()
    }

    /// Create a file with the given name
    ///
    /// The file starts with a pre-snapshotted root revision (id 0) checked
    /// out, so it can be read and rolled back immediately.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::FileAlreadyExists`] if the name is taken.
    pub fn create_file(&mut self, name: &str) -> Result<()> {
        if self.files.find(&name.to_string()).is_some() {
            return Err(PalimpsestError::FileAlreadyExists(name.to_string()));
        }

        self.files
            .insert(name.to_string(), FileRecord::new(name, self.version_buckets));
        self.order.push(name.to_string());
        info!(file = name, "created file");
        Ok(())
    }

    /// Content of the file's checked-out revision
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::FileNotFound`] if no such file exists.
    pub fn read(&self, name: &str) -> Result<&str> {
        Ok(self.record(name)?.read())
    }

    /// Apply an edit to the file's checked-out revision
    ///
    /// Forks a new revision if the current one is snapshotted, edits in
    /// place otherwise; see [`FileRecord::input`]. Returns the id of the
    /// revision now current.
    ///
    /// # Errors
    ///
    /// - [`PalimpsestError::FileNotFound`] if no such file exists
    /// - [`PalimpsestError::EmptyContent`] if `content` is empty
    pub fn input(&mut self, name: &str, content: &str, mode: EditMode) -> Result<VersionId> {
        self.record_mut(name)?.input(content, mode)
    }

    /// Snapshot the file's checked-out revision with `message`
    ///
    /// # Errors
    ///
    /// - [`PalimpsestError::FileNotFound`] if no such file exists
    /// - [`PalimpsestError::AlreadySnapshotted`] if the current revision is
    ///   already a snapshot
    pub fn snapshot(&mut self, name: &str, message: &str) -> Result<VersionId> {
        self.record_mut(name)?.snapshot(message)
    }

    /// Move the file's cursor to a prior snapshot
    ///
    /// With `Some(id)`, checks out that snapshotted revision; with `None`,
    /// checks out the current revision's parent. Returns the id now current.
    ///
    /// # Errors
    ///
    /// - [`PalimpsestError::FileNotFound`] if no such file exists
    /// - [`PalimpsestError::InvalidVersionId`] if the id is unknown or
    ///   still mutable
    /// - [`PalimpsestError::NoParent`] if no id was given and the cursor is
    ///   on the root
    pub fn rollback(&mut self, name: &str, target: Option<VersionId>) -> Result<VersionId> {
        self.record_mut(name)?.rollback(target)
    }

    /// Snapshot history of the file's checked-out revision, oldest first
    ///
    /// An empty vector signals that no snapshots lie on the current
    /// revision's parent chain.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::FileNotFound`] if no such file exists.
    pub fn history(&self, name: &str) -> Result<Vec<HistoryEntry>> {
        Ok(self.record(name)?.history())
    }

    /// The `n` most recently edited files, most recent first
    ///
    /// Scans every record once into a fresh [`SelectionHeap`] keyed by
    /// last-edited time, then pops `n` results. Ties order by name.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::InsufficientFiles`] if the registry holds
    /// fewer than `n` files.
    pub fn top_recently_edited(&self, n: usize) -> Result<Vec<FileRecency>> {
        self.ensure_file_count(n)?;

        let mut heap = SelectionHeap::new();
        for record in self.records() {
            heap.push(record.name(), record.last_edited_at().timestamp_millis());
        }

        trace!(candidates = heap.len(), n, "ranking files by recency");
        Ok(heap
            .drain_top(n)
            .into_iter()
            .map(|entry| {
                let record = self.record(&entry.label).expect("ranked name is registered");
                FileRecency {
                    name: entry.label,
                    last_edited_at: record.last_edited_at(),
                }
            })
            .collect())
    }

    /// The `n` files with the most versions, largest first
    ///
    /// Same scan-into-heap pattern as [`Self::top_recently_edited`], keyed
    /// by each file's version counter. Ties order by name.
    ///
    /// # Errors
    ///
    /// Returns [`PalimpsestError::InsufficientFiles`] if the registry holds
    /// fewer than `n` files.
    pub fn top_by_version_count(&self, n: usize) -> Result<Vec<FileVersionCount>> {
        self.ensure_file_count(n)?;

        let mut heap = SelectionHeap::new();
        for record in self.records() {
            heap.push(record.name(), record.version_count() as i64);
        }

        trace!(candidates = heap.len(), n, "ranking files by version count");
        Ok(heap
            .drain_top(n)
            .into_iter()
            .map(|entry| FileVersionCount {
                name: entry.label,
                versions: entry.weight as u64,
            })
            .collect())
    }

    /// Number of files in the registry
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// File names in creation order
    pub fn file_names(&self) -> &[String] {
        &self.order
    }

    /// Look up a file's record by name
    pub fn record(&self, name: &str) -> Result<&FileRecord> {
        self.files
            .find(&name.to_string())
            .ok_or_else(|| PalimpsestError::FileNotFound(name.to_string()))
    }

    fn record_mut(&mut self, name: &str) -> Result<&mut FileRecord> {
        self.files
            .find_mut(&name.to_string())
            .ok_or_else(|| PalimpsestError::FileNotFound(name.to_string()))
    }

    fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.order.iter().map(|name| {
            self.files
                .find(name)
                .expect("registry order only holds registered names")
        })
    }

    fn ensure_file_count(&self, n: usize) -> Result<()> {
        if self.order.len() < n {
            return Err(PalimpsestError::InsufficientFiles {
                available: self.order.len(),
                requested: n,
            });
        }
        Ok(())
    }
}

impl Default for Palimpsest {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Palimpsest`] stores with explicit index capacities
///
/// Both capacities default to [`DEFAULT_BUCKETS`]. Small capacities are
/// valid and force dense collision chains, which the tests use to exercise
/// chain behavior.
///
/// # Examples
///
/// ```rust
/// use palimpsest::PalimpsestBuilder;
///
/// let store = PalimpsestBuilder::new()
///     .file_buckets(101)
///     .version_buckets(31)
///     .build();
/// assert_eq!(store.file_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct PalimpsestBuilder {
    file_buckets: usize,
    version_buckets: usize,
}

impl PalimpsestBuilder {
    /// Create a builder with default capacities
    pub fn new() -> Self {
        Self {
            file_buckets: DEFAULT_BUCKETS,
            version_buckets: DEFAULT_BUCKETS,
        }
    }

    /// Fixed bucket count of the registry's name index
    pub fn file_buckets(mut self, buckets: usize) -> Self {
        self.file_buckets = buckets;
        self
    }

    /// Fixed bucket count of each file's version-id index
    pub fn version_buckets(mut self, buckets: usize) -> Self {
        self.version_buckets = buckets;
        self
    }

    /// Build the store
    pub fn build(self) -> Palimpsest {
        debug!(
            file_buckets = self.file_buckets,
            version_buckets = self.version_buckets,
            "building palimpsest store"
        );
        Palimpsest {
            files: ChainedIndex::with_buckets(self.file_buckets),
            order: Vec::new(),
            version_buckets: self.version_buckets,
        }
    }
}

impl Default for PalimpsestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
