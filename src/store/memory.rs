//! store::memory
//!
//! In-memory revision store for deterministic testing and embedding.
//!
//! # Design
//!
//! Documents and histories live behind an `Arc<Mutex<...>>`, so clones
//! share state and a test can keep a handle to inspect what a history
//! stream actually produced. Streams behave like a lazy log reader: a
//! history is only reported complete once a `take` runs past its end.
//!
//! # Example
//!
//! ```
//! use revbrowse::core::types::DocPath;
//! use revbrowse::store::{MemoryStore, RevisionRecord, RevisionStore};
//!
//! let path = DocPath::new("home").unwrap();
//! let revisions: Vec<RevisionRecord> = (0..3)
//!     .map(|i| MemoryStore::revision(i, "ann@example.com", 1_700_000_000 - i as i64))
//!     .collect();
//!
//! let store = MemoryStore::new().with_history(&path, revisions);
//!
//! let mut stream = store.document_history(&path).unwrap();
//! let first = stream.take(2).unwrap();
//! assert_eq!(first.revisions.len(), 2);
//! assert!(!first.complete);
//!
//! let rest = stream.take(2).unwrap();
//! assert_eq!(rest.revisions.len(), 1);
//! assert!(rest.complete);
//! assert_eq!(store.materialized(&path), 3);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{HistoryStream, HistoryTake, RevisionRecord, RevisionStore, StoreError};
use crate::core::types::{DocPath, RevisionId};
use crate::index::DocumentRecord;

/// In-memory revision store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    documents: Vec<DocumentRecord>,
    histories: HashMap<DocPath, StoredHistory>,
    /// Fail `document_list` with this message.
    fail_listing: Option<String>,
}

#[derive(Debug, Default)]
struct StoredHistory {
    revisions: Vec<RevisionRecord>,
    /// The log may still grow past `revisions`, so the end is never reported.
    open: bool,
    /// Any take reaching this position fails.
    fail_at: Option<usize>,
    /// Highest position handed out by any stream.
    materialized: usize,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to the listing.
    pub fn with_document(self, record: DocumentRecord) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.documents.push(record);
        }
        self
    }

    /// Set a document's history (newest first).
    pub fn with_history(self, path: &DocPath, revisions: Vec<RevisionRecord>) -> Self {
        self.set_history(path, revisions, false)
    }

    /// Set a history whose end has not been observed yet.
    ///
    /// Streams over it never report completeness, the way a log reader
    /// that stopped early cannot know whether older entries exist.
    pub fn with_open_history(self, path: &DocPath, revisions: Vec<RevisionRecord>) -> Self {
        self.set_history(path, revisions, true)
    }

    fn set_history(self, path: &DocPath, revisions: Vec<RevisionRecord>, open: bool) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.histories.insert(
                path.clone(),
                StoredHistory {
                    revisions,
                    open,
                    ..Default::default()
                },
            );
        }
        self
    }

    /// Make any take that would produce position `position` of this
    /// document's history fail.
    pub fn fail_history_at(self, path: &DocPath, position: usize) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.histories.entry(path.clone()).or_default().fail_at = Some(position);
        }
        self
    }

    /// Make `document_list` fail.
    pub fn fail_listing(self, message: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_listing = Some(message.into());
        }
        self
    }

    /// Prepend revisions to a history, as new edits would.
    pub fn push_revisions(&self, path: &DocPath, newest_first: Vec<RevisionRecord>) {
        if let Ok(mut inner) = self.inner.lock() {
            let history = inner.histories.entry(path.clone()).or_default();
            let older = std::mem::take(&mut history.revisions);
            history.revisions = newest_first;
            history.revisions.extend(older);
        }
    }

    /// Number of revisions of `path` handed out by any stream so far.
    pub fn materialized(&self, path: &DocPath) -> usize {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.histories.get(path).map(|h| h.materialized))
            .unwrap_or(0)
    }

    /// Build a synthetic revision with a deterministic id.
    pub fn revision(seq: u64, email: &str, timestamp: i64) -> RevisionRecord {
        RevisionRecord {
            revision_id: RevisionId::from_sequence(seq),
            author_name: email.split('@').next().unwrap_or_default().to_string(),
            author_email: email.to_string(),
            timestamp,
            summary: format!("Revision {seq}"),
            extra: BTreeMap::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Unavailable {
            message: "memory store lock poisoned".into(),
        })
    }
}

impl RevisionStore for MemoryStore {
    fn document_list(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        let inner = self.lock()?;
        if let Some(message) = &inner.fail_listing {
            return Err(StoreError::Unavailable {
                message: message.clone(),
            });
        }
        Ok(inner.documents.clone())
    }

    fn document_history<'a>(
        &'a self,
        path: &DocPath,
    ) -> Result<Box<dyn HistoryStream + 'a>, StoreError> {
        Ok(Box::new(MemoryHistory {
            store: self,
            path: path.clone(),
            position: 0,
        }))
    }
}

/// Cursor over one document's in-memory history.
struct MemoryHistory<'a> {
    store: &'a MemoryStore,
    path: DocPath,
    position: usize,
}

impl HistoryStream for MemoryHistory<'_> {
    fn take(&mut self, n: usize) -> Result<HistoryTake, StoreError> {
        let mut inner = self.store.lock()?;
        let Some(history) = inner.histories.get_mut(&self.path) else {
            return Ok(HistoryTake {
                revisions: Vec::new(),
                scanned: 0,
                complete: true,
            });
        };

        let available = history.revisions.len();
        let end = self.position.saturating_add(n).min(available);

        if let Some(fail_at) = history.fail_at {
            if end > fail_at {
                return Err(StoreError::Unavailable {
                    message: format!("history of '{}' unreadable at {}", self.path, fail_at),
                });
            }
        }

        // A shared clone may have replaced the history with a shorter one
        let start = self.position.min(end);
        let revisions = history.revisions[start..end].to_vec();
        let ran_past_end = self.position.saturating_add(n) > available;
        self.position = end;
        history.materialized = history.materialized.max(end);

        Ok(HistoryTake {
            revisions,
            scanned: self.position,
            complete: ran_past_end && !history.open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> DocPath {
        DocPath::new(p).unwrap()
    }

    fn revisions(count: u64) -> Vec<RevisionRecord> {
        (0..count)
            .map(|i| MemoryStore::revision(i, "dev@example.com", 1_000 - i as i64))
            .collect()
    }

    #[test]
    fn lists_documents() {
        let store = MemoryStore::new()
            .with_document(DocumentRecord::new("a.md", 1, 1, 1))
            .with_document(DocumentRecord::new("b/c.md", 2, 1, 1));

        let docs = store.document_list().unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].path, "b/c.md");
    }

    #[test]
    fn listing_failure() {
        let store = MemoryStore::new().fail_listing("offline");
        let err = store.document_list().unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn unknown_document_has_empty_complete_history() {
        let store = MemoryStore::new();
        let mut stream = store.document_history(&path("nope")).unwrap();

        let take = stream.take(10).unwrap();

        assert!(take.revisions.is_empty());
        assert_eq!(take.scanned, 0);
        assert!(take.complete);
    }

    #[test]
    fn exact_take_does_not_report_completion() {
        let p = path("home");
        let store = MemoryStore::new().with_history(&p, revisions(5));
        let mut stream = store.document_history(&p).unwrap();

        let take = stream.take(5).unwrap();

        assert_eq!(take.revisions.len(), 5);
        assert_eq!(take.scanned, 5);
        assert!(!take.complete);
    }

    #[test]
    fn open_history_never_completes() {
        let p = path("home");
        let store = MemoryStore::new().with_open_history(&p, revisions(2));
        let mut stream = store.document_history(&p).unwrap();

        let take = stream.take(10).unwrap();

        assert_eq!(take.revisions.len(), 2);
        assert!(!take.complete);
    }

    #[test]
    fn tracks_materialization() {
        let p = path("home");
        let store = MemoryStore::new().with_history(&p, revisions(10));

        store.document_history(&p).unwrap().take(4).unwrap();
        assert_eq!(store.materialized(&p), 4);

        // A fresh stream starts over, but the high-water mark only grows
        store.document_history(&p).unwrap().take(2).unwrap();
        assert_eq!(store.materialized(&p), 4);
    }

    #[test]
    fn failure_injection() {
        let p = path("home");
        let store = MemoryStore::new()
            .with_history(&p, revisions(10))
            .fail_history_at(&p, 3);
        let mut stream = store.document_history(&p).unwrap();

        assert_eq!(stream.take(3).unwrap().revisions.len(), 3);
        assert!(matches!(stream.take(1), Err(StoreError::Unavailable { .. })));
    }

    #[test]
    fn push_revisions_prepends() {
        let p = path("home");
        let store = MemoryStore::new().with_history(&p, revisions(2));
        let newer = MemoryStore::revision(99, "new@example.com", 5_000);

        store.push_revisions(&p, vec![newer.clone()]);

        let take = store.document_history(&p).unwrap().take(1).unwrap();
        assert_eq!(take.revisions, vec![newer]);
    }

    #[test]
    fn history_replaced_by_shorter_one_mid_stream() {
        let p = path("home");
        let store = MemoryStore::new().with_history(&p, revisions(5));
        let mut stream = store.document_history(&p).unwrap();
        assert_eq!(stream.take(4).unwrap().revisions.len(), 4);

        let _ = store.clone().with_history(&p, revisions(2));
        let take = stream.take(2).unwrap();

        assert!(take.revisions.is_empty());
        assert!(take.complete);
    }

    #[test]
    fn synthetic_revision_ids_are_distinct() {
        let a = MemoryStore::revision(1, "a@example.com", 0);
        let b = MemoryStore::revision(2, "a@example.com", 0);
        assert_ne!(a.revision_id, b.revision_id);
        assert_eq!(a.author_name, "a");
    }
}
