//! revbrowse - Directory listings and paged revision history for a wiki
//! kept in a git repository
//!
//! revbrowse reads a revision store and produces two views:
//!
//! - a one-level directory tree of the documents under a path prefix, with
//!   subdirectories collapsed into size and timestamp aggregates
//! - a page of a document's revision history, newest first, decorated with
//!   author avatars, formatted dates and revision links
//!
//! # Architecture
//!
//! - [`store`] - Revision store trait, git and in-memory implementations
//! - [`index`] - Path tree indexer
//! - [`history`] - Paginated history feed and table envelope
//! - [`format`] - Dates, links and author identities
//! - [`core`] - Domain types, canonicalization and configuration
//! - [`browse`] - Request-level facade tying the above together
//! - [`cli`] - Command-line interface (`rvb`)
//! - [`ui`] - User-facing output
//!
//! # Invariants
//!
//! 1. An index either covers every matching record exactly once or fails
//! 2. A history page never reads past the end of its window
//! 3. While a history is not fully walked, its reported total is one more
//!    than the revisions counted so far

pub mod browse;
pub mod cli;
pub mod core;
pub mod format;
pub mod history;
pub mod index;
pub mod store;
pub mod ui;
