//! browse
//!
//! Request-level facade over a revision store.
//!
//! [`Browser`] owns a store, an identity resolver and feed settings, and
//! accepts raw user-supplied paths the way a wiki front end receives them:
//! un-canonicalized, possibly with spaces or stray slashes.
//!
//! # Example
//!
//! ```
//! use revbrowse::browse::Browser;
//! use revbrowse::format::identity::{GravatarResolver, GravatarSettings};
//! use revbrowse::format::FeedSettings;
//! use revbrowse::history::Window;
//! use revbrowse::index::{DocumentRecord, IndexMode};
//! use revbrowse::store::MemoryStore;
//!
//! let store = MemoryStore::new()
//!     .with_document(DocumentRecord::new("docs/a", 10, 1, 1))
//!     .with_document(DocumentRecord::new("root", 5, 1, 1));
//! let browser = Browser::new(
//!     Box::new(store),
//!     Box::new(GravatarResolver::new(GravatarSettings::default())),
//!     FeedSettings::default(),
//! );
//!
//! let entries = browser.index("", IndexMode::Tree).unwrap();
//! assert_eq!(entries.len(), 2);
//!
//! let page = browser.history("root", Window::new(0, 10).unwrap()).unwrap();
//! assert!(page.is_complete);
//! ```

use thiserror::Error;

use crate::core::canonical::doc_path;
use crate::core::types::{IndexPrefix, TypeError};
use crate::format::identity::IdentityResolver;
use crate::format::FeedSettings;
use crate::history::{self, Decorator, FeedError, HistoryPage, Window};
use crate::index::{self, IndexEntry, IndexMode};
use crate::store::{RevisionStore, StoreError};

/// Errors from browser requests.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Requested or stored path is malformed.
    #[error(transparent)]
    Path(#[from] TypeError),

    /// The store could not list or open documents.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The history feed failed.
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Entry point for index and history requests.
pub struct Browser {
    store: Box<dyn RevisionStore>,
    resolver: Box<dyn IdentityResolver>,
    settings: FeedSettings,
}

impl Browser {
    pub fn new(
        store: Box<dyn RevisionStore>,
        resolver: Box<dyn IdentityResolver>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            store,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Directory view under a raw directory path (`""` for the root).
    pub fn index(&self, raw_prefix: &str, mode: IndexMode) -> Result<Vec<IndexEntry>, BrowseError> {
        let prefix = IndexPrefix::from_request(raw_prefix)?;
        let records = self.store.document_list()?;
        Ok(index::index(&records, &prefix, mode)?)
    }

    /// One page of a document's history, by raw document name.
    pub fn history(&self, raw_path: &str, window: Window) -> Result<HistoryPage, BrowseError> {
        let doc = doc_path(raw_path)?;
        let mut stream = self.store.document_history(&doc)?;
        let decorator = Decorator::new(self.resolver.as_ref(), &self.settings);
        Ok(history::page(&doc, stream.as_mut(), window, &decorator)?)
    }
}
