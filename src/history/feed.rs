//! history::feed
//!
//! Page construction over a single history stream.

use tracing::{debug, warn};

use super::{FeedError, HistoryItem, HistoryPage, Window};
use crate::core::types::DocPath;
use crate::format::identity::IdentityResolver;
use crate::format::{format_timestamp, FeedSettings, RevisionLink};
use crate::store::{HistoryStream, RevisionRecord};

/// Decorates revisions for display.
pub struct Decorator<'a> {
    resolver: &'a dyn IdentityResolver,
    settings: &'a FeedSettings,
}

impl<'a> Decorator<'a> {
    pub fn new(resolver: &'a dyn IdentityResolver, settings: &'a FeedSettings) -> Self {
        Self { resolver, settings }
    }

    /// Attach identity, date and link to one revision of `doc`.
    ///
    /// Identity resolution failures are logged and replaced by the
    /// resolver's placeholder.
    pub fn decorate(&self, doc: &DocPath, revision: RevisionRecord) -> HistoryItem {
        let identity = match self.resolver.resolve(&revision.author_email) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(
                    revision = %revision.revision_id,
                    email = %revision.author_email,
                    "identity resolution failed, using placeholder: {}",
                    e
                );
                self.resolver.placeholder()
            }
        };

        HistoryItem {
            identity,
            row_id: revision.revision_id.to_string(),
            date: format_timestamp(revision.timestamp, self.settings),
            link: RevisionLink::new(&self.settings.link_base, doc, &revision.revision_id),
            revision,
        }
    }
}

/// Build one page of `doc`'s history from a fresh stream.
///
/// Takes exactly `window.end()` revisions from `history` in a single call,
/// so nothing past the window is materialized and the count and
/// completeness flag describe the same traversal as the items. The first
/// `window.offset()` revisions are discarded.
///
/// # Errors
///
/// Returns `FeedError::Stream` if the stream fails. No partial page is
/// returned.
pub fn page(
    doc: &DocPath,
    history: &mut dyn HistoryStream,
    window: Window,
    decorator: &Decorator<'_>,
) -> Result<HistoryPage, FeedError> {
    let take = history.take(window.end())?;

    let total_known = if take.complete {
        take.scanned
    } else {
        take.scanned.saturating_add(1)
    };

    let items: Vec<HistoryItem> = take
        .revisions
        .into_iter()
        .skip(window.offset())
        .take(window.length())
        .map(|revision| decorator.decorate(doc, revision))
        .collect();

    debug!(
        document = %doc,
        offset = window.offset(),
        length = window.length(),
        items = items.len(),
        total_known,
        complete = take.complete,
        "built history page"
    );

    Ok(HistoryPage {
        items,
        total_known,
        is_complete: take.complete,
    })
}
