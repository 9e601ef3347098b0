//! format::identity
//!
//! Author identity resolution.
//!
//! # Design
//!
//! The [`IdentityResolver`] trait maps an author email to something a page
//! can display. Resolution failures are never fatal to a history page: the
//! caller substitutes [`Identity::placeholder`] and moves on.
//!
//! [`GravatarResolver`] derives avatar URLs locally from a SHA-256 of the
//! normalized email, so resolution needs no network access.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Image styles the avatar service can serve for unknown hashes.
pub const FALLBACK_STYLES: [&str; 7] = [
    "mp",
    "identicon",
    "monsterid",
    "wavatar",
    "retro",
    "robohash",
    "blank",
];

/// Errors from identity resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("author email is empty")]
    EmptyEmail,

    #[error("malformed author email: {0}")]
    MalformedEmail(String),

    #[error("identity resolver unavailable: {0}")]
    Unavailable(String),
}

/// A displayable author identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Avatar image URL
    pub avatar_url: String,
    /// True when resolution failed and this is the stand-in
    pub placeholder: bool,
}

impl Identity {
    /// Stand-in identity used when resolution fails.
    pub fn placeholder(settings: &GravatarSettings) -> Self {
        Self {
            avatar_url: format!(
                "{}/{}?d={}&s={}&f=y",
                settings.base_url,
                "0".repeat(64),
                settings.fallback,
                settings.size
            ),
            placeholder: true,
        }
    }
}

/// Trait for resolving author emails into display identities.
///
/// Implementations must be thread-safe (Send + Sync). A page calls
/// [`resolve`](IdentityResolver::resolve) once per revision.
pub trait IdentityResolver: Send + Sync {
    /// Resolve an email into a display identity.
    fn resolve(&self, email: &str) -> Result<Identity, IdentityError>;

    /// Identity to show when [`resolve`](IdentityResolver::resolve) fails.
    fn placeholder(&self) -> Identity;
}

/// Avatar URL settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravatarSettings {
    /// Service base URL, without a trailing `/`
    pub base_url: String,
    /// Edge length in pixels
    pub size: u32,
    /// One of [`FALLBACK_STYLES`]
    pub fallback: String,
}

impl Default for GravatarSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.gravatar.com/avatar".to_string(),
            size: 80,
            fallback: "identicon".to_string(),
        }
    }
}

/// Resolver producing Gravatar-style avatar URLs.
///
/// # Example
///
/// ```
/// use revbrowse::format::identity::{GravatarResolver, IdentityResolver};
///
/// let resolver = GravatarResolver::default();
/// let a = resolver.resolve("Alice@Example.com ").unwrap();
/// let b = resolver.resolve("alice@example.com").unwrap();
/// assert_eq!(a, b);
/// assert!(a.avatar_url.starts_with("https://www.gravatar.com/avatar/"));
///
/// assert!(resolver.resolve("").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GravatarResolver {
    settings: GravatarSettings,
}

impl GravatarResolver {
    pub fn new(settings: GravatarSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GravatarSettings {
        &self.settings
    }

    /// Hex SHA-256 of the trimmed, lower-cased email.
    fn email_hash(email: &str) -> String {
        let normalized = email.trim().to_lowercase();
        hex::encode(Sha256::digest(normalized.as_bytes()))
    }
}

impl IdentityResolver for GravatarResolver {
    fn resolve(&self, email: &str) -> Result<Identity, IdentityError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(IdentityError::MalformedEmail(trimmed.to_string())),
        }

        Ok(Identity {
            avatar_url: format!(
                "{}/{}?d={}&s={}",
                self.settings.base_url,
                Self::email_hash(trimmed),
                self.settings.fallback,
                self.settings.size
            ),
            placeholder: false,
        })
    }

    fn placeholder(&self) -> Identity {
        Identity::placeholder(&self.settings)
    }
}
