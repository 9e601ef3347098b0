//! history
//!
//! Paginated, decorated view of a document's revision history.
//!
//! # Architecture
//!
//! - [`Window`] - a validated `(offset, length)` slice request
//! - [`page`] - consumes one [`HistoryStream`](crate::store::HistoryStream)
//!   take and decorates the slice
//! - [`Decorator`] - identity, date and link decoration for one revision
//! - [`TableResponse`] - the JSON envelope grid widgets poll
//!
//! # Completeness
//!
//! A store walking its log lazily cannot know the final revision count
//! until it runs past the end. While it has not, [`HistoryPage::total_known`]
//! is one more than the count seen so far, which tells a paging client that
//! another page may exist.

mod feed;
mod table;

pub use feed::{page, Decorator};
pub use table::{TableResponse, TableRow};

use serde::Serialize;
use thiserror::Error;

use crate::format::identity::Identity;
use crate::format::RevisionLink;
use crate::store::{RevisionRecord, StoreError};

/// Errors from building a history page.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Requested window is empty or unaddressable.
    #[error("invalid history window (start {offset}, length {length}): {reason}")]
    InvalidWindow {
        offset: usize,
        length: usize,
        reason: &'static str,
    },

    /// The history stream failed while being consumed.
    #[error("history stream failed: {0}")]
    Stream(#[from] StoreError),
}

/// A slice of history: skip `offset` revisions, return up to `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    offset: usize,
    length: usize,
}

impl Window {
    /// Create a window.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidWindow` if `length` is zero or
    /// `offset + length` overflows.
    pub fn new(offset: usize, length: usize) -> Result<Self, FeedError> {
        if length == 0 {
            return Err(FeedError::InvalidWindow {
                offset,
                length,
                reason: "length must be positive",
            });
        }
        if offset.checked_add(length).is_none() {
            return Err(FeedError::InvalidWindow {
                offset,
                length,
                reason: "window end overflows",
            });
        }
        Ok(Self { offset, length })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// One past the last position the window covers.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// One decorated revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    #[serde(flatten)]
    pub revision: RevisionRecord,
    /// Author avatar (placeholder if resolution failed)
    pub identity: Identity,
    /// Row identifier for table widgets; the revision id
    pub row_id: String,
    /// Formatted revision date
    pub date: String,
    /// Link to this revision of the document
    pub link: RevisionLink,
}

/// One page of decorated history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    pub items: Vec<HistoryItem>,
    /// Revision count as far as known, plus one while incomplete
    pub total_known: usize,
    /// Whether the store has seen the end of the history
    pub is_complete: bool,
}
