//! format
//!
//! Pure formatting helpers for history pages.
//!
//! # Responsibilities
//!
//! - Render revision timestamps with a configurable strftime pattern
//! - Build revision links from a document path and revision id
//! - Resolve author emails into display identities ([`identity`])
//!
//! Nothing here reads ambient state. Everything configurable arrives
//! through a [`FeedSettings`] value.

pub mod identity;

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use serde::{Serialize, Serializer};

use crate::core::types::{DocPath, RevisionId};

/// Default strftime pattern, e.g. `Nov 14, 2023 10:13 PM`.
pub const DEFAULT_DATETIME_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Zone in which revision timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZone {
    Utc,
    /// The zone of the process rendering the page
    Local,
}

impl FromStr for TimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(TimeZone::Utc),
            "local" => Ok(TimeZone::Local),
            other => Err(format!(
                "invalid timezone '{other}', must be one of: utc, local"
            )),
        }
    }
}

impl std::fmt::Display for TimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeZone::Utc => write!(f, "utc"),
            TimeZone::Local => write!(f, "local"),
        }
    }
}

/// Formatting settings for one history page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// strftime pattern for the `date` column
    pub datetime_format: String,
    pub timezone: TimeZone,
    /// Prefix for revision links, without a trailing `/`
    pub link_base: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            timezone: TimeZone::Local,
            link_base: String::new(),
        }
    }
}

/// Check that a strftime pattern is understood by the formatter.
///
/// # Errors
///
/// Returns a description of the problem when the pattern contains an
/// unknown or truncated specifier.
pub fn check_datetime_format(pattern: &str) -> Result<(), String> {
    if StrftimeItems::new(pattern).any(|item| item == Item::Error) {
        return Err(format!("invalid datetime_format '{pattern}'"));
    }
    Ok(())
}

/// Render a unix timestamp (seconds) for display.
///
/// Out-of-range timestamps render as the epoch. A pattern the formatter
/// rejects falls back to RFC 3339 instead of failing the page.
///
/// # Example
///
/// ```
/// use revbrowse::format::{format_timestamp, FeedSettings, TimeZone};
///
/// let settings = FeedSettings {
///     timezone: TimeZone::Utc,
///     ..FeedSettings::default()
/// };
/// assert_eq!(format_timestamp(1_700_000_000, &settings), "Nov 14, 2023 10:13 PM");
/// ```
pub fn format_timestamp(unix: i64, settings: &FeedSettings) -> String {
    let utc = chrono::DateTime::from_timestamp(unix, 0).unwrap_or(chrono::DateTime::UNIX_EPOCH);

    let mut out = String::new();
    let rendered = match settings.timezone {
        TimeZone::Utc => write!(out, "{}", utc.format(&settings.datetime_format)),
        TimeZone::Local => write!(
            out,
            "{}",
            utc.with_timezone(&chrono::Local)
                .format(&settings.datetime_format)
        ),
    };

    if rendered.is_err() {
        return utc.to_rfc3339();
    }
    out
}

/// Link to one revision of a document.
///
/// Rendered as `{base}/_commit/{revision}/{path}`. Built on demand from the
/// document identity and revision id; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionLink {
    base: String,
    revision: RevisionId,
    path: DocPath,
}

impl RevisionLink {
    /// Build a link under `base` (empty for site-relative links).
    pub fn new(base: &str, path: &DocPath, revision: &RevisionId) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            revision: revision.clone(),
            path: path.clone(),
        }
    }

    pub fn revision(&self) -> &RevisionId {
        &self.revision
    }

    pub fn path(&self) -> &DocPath {
        &self.path
    }
}

impl std::fmt::Display for RevisionLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/_commit/{}/{}", self.base, self.revision, self.path)
    }
}

impl Serialize for RevisionLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
