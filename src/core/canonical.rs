//! core::canonical
//!
//! Canonicalization of user-supplied document names.
//!
//! Request paths arrive with stray slashes and whitespace. These helpers
//! turn them into the canonical form used as a document's identity, and
//! refuse anything that would escape the document namespace.

use super::types::{check_canonical, DocPath, IndexPrefix, TypeError};

/// Canonicalize a raw document name.
///
/// - Surrounding whitespace and slashes are trimmed
/// - Repeated slashes collapse into one
/// - Runs of whitespace inside a segment become a single `-`
///
/// The result may be empty (the root).
///
/// # Errors
///
/// Returns `TypeError::InvalidPath` for `.`/`..` segments and control
/// characters. These are never silently dropped.
///
/// # Example
///
/// ```
/// use revbrowse::core::canonical::canonicalize;
///
/// assert_eq!(canonicalize("  /docs//Getting Started/ ").unwrap(), "docs/Getting-Started");
/// assert_eq!(canonicalize("///").unwrap(), "");
/// assert!(canonicalize("docs/../secrets").is_err());
/// ```
pub fn canonicalize(raw: &str) -> Result<String, TypeError> {
    if raw.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return Err(TypeError::invalid_path(raw, "control character"));
    }

    let segments: Vec<String> = raw
        .trim()
        .split('/')
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join("-"))
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.iter().any(|s| s == "." || s == "..") {
        return Err(TypeError::invalid_path(raw, "path traversal segment"));
    }

    let canonical = segments.join("/");
    check_canonical(&canonical)?;
    Ok(canonical)
}

/// Canonicalize a raw name into a document identity.
///
/// # Errors
///
/// Returns `TypeError::InvalidPath` if the name canonicalizes to nothing
/// or cannot be canonicalized.
pub fn doc_path(raw: &str) -> Result<DocPath, TypeError> {
    DocPath::new(canonicalize(raw)?)
}

impl IndexPrefix {
    /// Build an index prefix from a raw, user-supplied directory.
    ///
    /// An empty (or all-slash) input is the root; anything else is
    /// canonicalized and given a trailing `/`.
    ///
    /// # Example
    ///
    /// ```
    /// use revbrowse::core::types::IndexPrefix;
    ///
    /// assert_eq!(IndexPrefix::from_request("").unwrap(), IndexPrefix::root());
    /// assert_eq!(IndexPrefix::from_request("/docs/api/").unwrap().as_str(), "docs/api/");
    /// ```
    pub fn from_request(raw: &str) -> Result<Self, TypeError> {
        let canonical = canonicalize(raw)?;
        if canonical.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self::for_dir(&DocPath::new(canonical)?))
    }
}
