//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, commands print JSON instead and skip these
//! helpers.

use std::fmt::Display;

use crate::format::{format_timestamp, FeedSettings};
use crate::history::{HistoryItem, HistoryPage};
use crate::index::IndexEntry;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// One line of an index listing: size, last modification, path.
pub fn format_entry(entry: &IndexEntry, settings: &FeedSettings) -> String {
    let modified = format_timestamp(entry.modified_at(), settings);
    let mut line = format!(
        "{:>10}  {}  {}",
        format_size(entry.size()),
        modified,
        entry.path()
    );
    if entry.is_directory() {
        let count = entry.document_count();
        line.push_str(&format!(
            "  ({} document{})",
            count,
            if count == 1 { "" } else { "s" }
        ));
    }
    line
}

/// One line of a history page: short id, date, author, summary.
pub fn format_history_item(item: &HistoryItem) -> String {
    let revision = &item.revision;
    format!(
        "{}  {}  {} <{}>  {}",
        revision.revision_id.short(7),
        item.date,
        revision.author_name,
        revision.author_email,
        revision.summary
    )
}

/// Footer describing how much of a history has been seen.
pub fn format_page_footer(page: &HistoryPage, offset: usize) -> String {
    if page.items.is_empty() {
        return if page.is_complete {
            format!("No revisions at {} ({} total)", offset, page.total_known)
        } else {
            format!("No revisions at {}", offset)
        };
    }
    let first = offset + 1;
    let last = offset + page.items.len();
    if page.is_complete {
        format!("Showing {}-{} of {}", first, last, page.total_known)
    } else {
        format!("Showing {}-{}, more available", first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TimeZone;
    use crate::index::{DocumentRecord, Leaf};

    #[test]
    fn verbosity_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn entry_line() {
        let settings = FeedSettings {
            datetime_format: "%Y-%m-%d".into(),
            timezone: TimeZone::Utc,
            link_base: String::new(),
        };
        let entry = IndexEntry::Leaf(Leaf::from(&DocumentRecord::new("home", 12, 0, 0)));

        assert_eq!(format_entry(&entry, &settings), "      12 B  1970-01-01  home");
    }

    #[test]
    fn footer_signals_more() {
        let page = HistoryPage {
            items: Vec::new(),
            total_known: 11,
            is_complete: false,
        };
        assert_eq!(format_page_footer(&page, 10), "No revisions at 10");
    }
}
