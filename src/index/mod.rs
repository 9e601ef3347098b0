//! index
//!
//! Path tree indexer: a one-level directory view over a flat document list.
//!
//! # Overview
//!
//! The revision store hands back every document as a flat
//! [`DocumentRecord`]. [`index`] turns the records under an
//! [`IndexPrefix`](crate::core::types::IndexPrefix) into the entries of one
//! directory level:
//!
//! - documents directly under the prefix become [`IndexEntry::Leaf`]
//! - deeper documents fold into one [`IndexEntry::Directory`] per
//!   immediate subdirectory, carrying summed size, earliest creation and
//!   latest modification
//!
//! Aggregates are recomputed on every call and never persisted.
//!
//! # Example
//!
//! ```
//! use revbrowse::core::types::IndexPrefix;
//! use revbrowse::index::{index, DocumentRecord, IndexEntry, IndexMode};
//!
//! let records = vec![
//!     DocumentRecord::new("docs/a.md", 10, 100, 200),
//!     DocumentRecord::new("docs/b.md", 20, 50, 300),
//!     DocumentRecord::new("root.md", 5, 10, 20),
//! ];
//!
//! let entries = index(&records, &IndexPrefix::root(), IndexMode::Tree).unwrap();
//! assert_eq!(entries.len(), 2);
//!
//! let IndexEntry::Directory(docs) = &entries[0] else { panic!() };
//! assert_eq!((docs.path.as_str(), docs.size), ("docs/", 30));
//! assert_eq!((docs.created_at, docs.modified_at), (50, 300));
//! ```

mod tree;

pub use tree::index;

use serde::{Deserialize, Serialize};

/// One document as listed by the revision store.
///
/// `path` must be canonical; timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub path: String,
    /// Size in bytes
    pub size: u64,
    pub created_at: i64,
    pub modified_at: i64,
}

impl DocumentRecord {
    pub fn new(path: impl Into<String>, size: u64, created_at: i64, modified_at: i64) -> Self {
        Self {
            path: path.into(),
            size,
            created_at,
            modified_at,
        }
    }
}

/// A document listed directly under the queried prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub path: String,
    pub size: u64,
    pub created_at: i64,
    pub modified_at: i64,
}

impl From<&DocumentRecord> for Leaf {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            path: record.path.clone(),
            size: record.size,
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

/// Synthetic summary of every document below one subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryAggregate {
    /// Prefix plus subdirectory name, always ending in `/`
    pub path: String,
    /// Sum of descendant sizes
    pub size: u64,
    /// Earliest descendant creation time
    pub created_at: i64,
    /// Latest descendant modification time
    pub modified_at: i64,
    /// Number of documents folded into this entry
    pub documents: usize,
}

impl DirectoryAggregate {
    fn start(path: String, record: &DocumentRecord) -> Self {
        Self {
            path,
            size: record.size,
            created_at: record.created_at,
            modified_at: record.modified_at,
            documents: 1,
        }
    }

    fn absorb(&mut self, record: &DocumentRecord) {
        self.size = self.size.saturating_add(record.size);
        self.created_at = self.created_at.min(record.created_at);
        self.modified_at = self.modified_at.max(record.modified_at);
        self.documents += 1;
    }
}

/// One entry of a directory view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexEntry {
    Leaf(Leaf),
    Directory(DirectoryAggregate),
}

impl IndexEntry {
    pub fn path(&self) -> &str {
        match self {
            IndexEntry::Leaf(leaf) => &leaf.path,
            IndexEntry::Directory(dir) => &dir.path,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            IndexEntry::Leaf(leaf) => leaf.size,
            IndexEntry::Directory(dir) => dir.size,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            IndexEntry::Leaf(leaf) => leaf.created_at,
            IndexEntry::Directory(dir) => dir.created_at,
        }
    }

    pub fn modified_at(&self) -> i64 {
        match self {
            IndexEntry::Leaf(leaf) => leaf.modified_at,
            IndexEntry::Directory(dir) => dir.modified_at,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, IndexEntry::Directory(_))
    }

    /// Number of input records this entry accounts for.
    pub fn document_count(&self) -> usize {
        match self {
            IndexEntry::Leaf(_) => 1,
            IndexEntry::Directory(dir) => dir.documents,
        }
    }
}

/// How matching records are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexMode {
    /// Leaves plus directory aggregates for one level
    #[default]
    Tree,
    /// Every matching record as a leaf, in the order supplied
    Flat,
}
