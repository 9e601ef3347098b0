//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$REVBROWSE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/revbrowse/config.toml`
//! 3. `~/.revbrowse/config.toml`
//!
//! # Repo Config
//!
//! Located at `.git/revbrowse/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing so a bad date pattern or
//! avatar size is reported at load time rather than on the first page.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::format::identity::FALLBACK_STYLES;
use crate::format::{check_datetime_format, TimeZone};

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// [display]
/// datetime_format = "%Y-%m-%d %H:%M"
/// timezone = "utc"
///
/// [identity]
/// avatar_size = 48
/// fallback = "retro"
///
/// [history]
/// page_length = 25
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Date display settings
    pub display: Option<DisplayConfig>,

    /// Author avatar settings
    pub identity: Option<IdentityConfig>,

    /// History paging defaults
    pub history: Option<HistoryConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(display) = &self.display {
            display.validate()?;
        }
        if let Some(identity) = &self.identity {
            identity.validate()?;
        }
        if let Some(history) = &self.history {
            history.validate()?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// link_base = "/wiki"
/// document_extension = "md"
///
/// [display]
/// timezone = "local"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Prefix prepended to revision links (e.g. a mount point)
    pub link_base: Option<String>,

    /// Only files with this extension are documents; it is hidden from names
    pub document_extension: Option<String>,

    /// Date display overrides
    pub display: Option<DisplayConfig>,

    /// History paging overrides
    pub history: Option<HistoryConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ext) = &self.document_extension {
            if ext.is_empty() || ext.contains('/') || ext.starts_with('.') {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid document_extension '{ext}', expected a bare extension like \"md\""
                )));
            }
        }
        if let Some(display) = &self.display {
            display.validate()?;
        }
        if let Some(history) = &self.history {
            history.validate()?;
        }
        Ok(())
    }
}

/// Date display settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// strftime pattern for revision dates
    pub datetime_format: Option<String>,

    /// "utc" or "local"
    pub timezone: Option<String>,
}

impl DisplayConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.datetime_format {
            check_datetime_format(format).map_err(ConfigError::InvalidValue)?;
        }
        if let Some(tz) = &self.timezone {
            tz.parse::<TimeZone>().map_err(ConfigError::InvalidValue)?;
        }
        Ok(())
    }
}

/// Author avatar settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Base URL of the avatar service
    pub avatar_base_url: Option<String>,

    /// Avatar edge length in pixels
    pub avatar_size: Option<u32>,

    /// Image style served for unknown authors
    pub fallback: Option<String>,
}

impl IdentityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.avatar_base_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::InvalidValue(format!(
                    "avatar_base_url must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if let Some(size) = self.avatar_size {
            if !(1..=2048).contains(&size) {
                return Err(ConfigError::InvalidValue(format!(
                    "avatar_size must be between 1 and 2048, got {size}"
                )));
            }
        }
        if let Some(fallback) = &self.fallback {
            if !FALLBACK_STYLES.contains(&fallback.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid fallback '{}', must be one of: {}",
                    fallback,
                    FALLBACK_STYLES.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// History paging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Revisions per page when the caller does not ask for a length
    pub page_length: Option<usize>,
}

impl HistoryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_length == Some(0) {
            return Err(ConfigError::InvalidValue(
                "page_length must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
