//! store
//!
//! Read interface to the revision store, plus two implementations.
//!
//! # Architecture
//!
//! Everything revbrowse knows about documents comes through
//! [`RevisionStore`]: the flat document listing and, per document, a lazy
//! [`HistoryStream`]. The indexer and the history feed never touch storage
//! directly, so they work the same over git ([`GitStore`]) and over
//! in-process data ([`MemoryStore`]).
//!
//! # History streams
//!
//! A history stream is forward-only. Producing revisions may replay the
//! underlying log, so callers ask for exactly what they need in one
//! [`HistoryStream::take`] and never restart a stream to reach a later
//! page. The stream also reports how many revisions the store has counted
//! so far and whether that count is final.
//!
//! # Concurrency
//!
//! Stores are `Send + Sync`. Whether concurrent `take` calls over the same
//! document are safe is up to the implementation; both stores here
//! serialize access internally. revbrowse adds no synchronization of its
//! own.

mod git;
pub mod memory;

pub use git::{GitStore, RepoInfo, DEFAULT_CACHE_CAPACITY};
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{DocPath, RevisionId, TypeError};
use crate::index::DocumentRecord;

/// Errors from revision store reads.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Not inside a repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory or index).
    #[error("bare repository not supported")]
    BareRepo,

    /// Object not found in the store.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The id that was not found
        oid: String,
    },

    /// Stored revision data failed validation.
    #[error("invalid revision data: {0}")]
    InvalidRevision(#[from] TypeError),

    /// Store cannot serve the request right now.
    #[error("revision store unavailable: {message}")]
    Unavailable {
        /// Description of the problem
        message: String,
    },

    /// Internal store error.
    #[error("store error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

/// One revision of a document, as produced by a history stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub revision_id: RevisionId,
    pub author_name: String,
    pub author_email: String,
    /// Unix seconds
    pub timestamp: i64,
    /// First line of the revision message
    pub summary: String,
    /// Free-form store-specific metadata
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Result of one [`HistoryStream::take`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTake {
    /// The next revisions, newest first
    pub revisions: Vec<RevisionRecord>,
    /// Revisions the store has counted for this document so far
    pub scanned: usize,
    /// Whether `scanned` is the final count
    pub complete: bool,
}

/// Forward-only cursor over a document's history, newest first.
pub trait HistoryStream {
    /// Produce up to `n` further revisions.
    ///
    /// Must not materialize revisions beyond the `n` returned. Reports the
    /// store's running count and completeness flag as of this call.
    fn take(&mut self, n: usize) -> Result<HistoryTake, StoreError>;
}

/// Read interface of a revision store.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait RevisionStore: Send + Sync {
    /// Every document currently in the store.
    fn document_list(&self) -> Result<Vec<DocumentRecord>, StoreError>;

    /// A fresh history stream for one document.
    ///
    /// A document with no revisions yields an empty, complete stream.
    fn document_history<'a>(
        &'a self,
        path: &DocPath,
    ) -> Result<Box<dyn HistoryStream + 'a>, StoreError>;
}
