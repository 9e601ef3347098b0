//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`DocPath`] - Canonical document path (a document's stable identity)
//! - [`IndexPrefix`] - Directory prefix that scopes an index query
//! - [`RevisionId`] - Content hash identifying one revision
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the indexer and feed never see a path that
//! would break segment arithmetic.
//!
//! # Examples
//!
//! ```
//! use revbrowse::core::types::{DocPath, IndexPrefix, RevisionId};
//!
//! let doc = DocPath::new("guides/setup.md").unwrap();
//! let prefix = IndexPrefix::new("guides/").unwrap();
//! let rev = RevisionId::new("abc123def4567890abc123def4567890abc12345").unwrap();
//!
//! assert!(doc.as_str().starts_with(prefix.as_str()));
//! assert_eq!(rev.short(7), "abc123d");
//!
//! assert!(DocPath::new("a//b").is_err());
//! assert!(IndexPrefix::new("guides").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid revision id: {0}")]
    InvalidRevisionId(String),
}

impl TypeError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        TypeError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Check that `path` is in canonical form.
///
/// Canonical paths are `/`-separated, with no leading or trailing slash,
/// no empty segments, no `.` or `..` segments and no control characters.
/// The empty string is accepted here; callers that need a document
/// identity reject it separately.
pub(crate) fn check_canonical(path: &str) -> Result<(), TypeError> {
    if path.is_empty() {
        return Ok(());
    }
    if path.starts_with('/') {
        return Err(TypeError::invalid_path(path, "leading separator"));
    }
    if path.ends_with('/') {
        return Err(TypeError::invalid_path(path, "trailing separator"));
    }
    if path.chars().any(|c| c.is_control()) {
        return Err(TypeError::invalid_path(path, "control character"));
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err(TypeError::invalid_path(path, "empty segment")),
            "." | ".." => {
                return Err(TypeError::invalid_path(path, "relative segment"));
            }
            _ => {}
        }
    }
    Ok(())
}

/// A canonical, non-empty document path.
///
/// # Example
///
/// ```
/// use revbrowse::core::types::DocPath;
///
/// let path = DocPath::new("notes/2024/review.md").unwrap();
/// assert_eq!(path.file_name(), "review.md");
///
/// assert!(DocPath::new("").is_err());
/// assert!(DocPath::new("/notes").is_err());
/// assert!(DocPath::new("notes/").is_err());
/// assert!(DocPath::new("notes/../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocPath(String);

impl DocPath {
    /// Create a new validated document path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` if the path is empty or not canonical.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.is_empty() {
            return Err(TypeError::invalid_path(&path, "path cannot be empty"));
        }
        check_canonical(&path)?;
        Ok(Self(path))
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of the path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for DocPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DocPath> for String {
    fn from(path: DocPath) -> Self {
        path.0
    }
}

impl AsRef<str> for DocPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directory prefix scoping an index query.
///
/// Either empty (the root) or a canonical path followed by a single `/`.
///
/// # Example
///
/// ```
/// use revbrowse::core::types::IndexPrefix;
///
/// assert_eq!(IndexPrefix::root().depth(), 1);
/// assert_eq!(IndexPrefix::new("a/b/").unwrap().depth(), 3);
///
/// assert!(IndexPrefix::new("a/b").is_err());
/// assert!(IndexPrefix::new("a//").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexPrefix(String);

impl IndexPrefix {
    /// The root prefix (matches every document).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Create a new validated prefix.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` if a non-empty prefix does not end
    /// with `/` or its directory part is not canonical.
    pub fn new(prefix: impl Into<String>) -> Result<Self, TypeError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Ok(Self(prefix));
        }
        let Some(dir) = prefix.strip_suffix('/') else {
            return Err(TypeError::invalid_path(
                &prefix,
                "prefix must end with a separator",
            ));
        };
        if dir.is_empty() {
            return Err(TypeError::invalid_path(&prefix, "empty segment"));
        }
        check_canonical(dir)?;
        Ok(Self(prefix))
    }

    /// Build a prefix from a canonical directory path (no trailing `/`).
    pub fn for_dir(dir: &DocPath) -> Self {
        Self(format!("{}/", dir.as_str()))
    }

    /// Number of `/`-delimited segments in the prefix, plus one.
    ///
    /// Segment `depth - 1` of a matching path decides whether the path is
    /// an immediate child or belongs to a nested directory.
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }

    /// Check whether this is the root prefix.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether a path falls under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.0)
    }

    /// Get the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IndexPrefix {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<IndexPrefix> for String {
    fn from(prefix: IndexPrefix) -> Self {
        prefix.0
    }
}

impl std::fmt::Display for IndexPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash identifying one revision (SHA-1 or SHA-256).
///
/// Revision ids are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use revbrowse::core::types::RevisionId;
///
/// let id = RevisionId::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(id.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(id.short(7), "abc123d");
///
/// assert!(RevisionId::new("not-a-sha").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionId(String);

impl RevisionId {
    /// Create a new validated revision id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRevisionId` if the string is not a 40 or
    /// 64 character hex hash.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Synthetic id for a sequence number: `seq` as 40 zero-padded hex digits.
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("{seq:040x}"))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if id.len() != 40 && id.len() != 64 {
            return Err(TypeError::InvalidRevisionId(format!(
                "expected 40 or 64 hex characters, got {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidRevisionId(
                "revision id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the full id if shorter.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Get the revision id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RevisionId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RevisionId> for String {
    fn from(id: RevisionId) -> Self {
        id.0
    }
}

impl AsRef<str> for RevisionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
