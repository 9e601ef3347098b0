//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! revbrowse has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REVBROWSE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/revbrowse/config.toml`
//! 3. `~/.revbrowse/config.toml`
//!
//! # Repo Config Location
//!
//! `.git/revbrowse/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use revbrowse::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/wiki"))).unwrap();
//!
//! let settings = config.feed_settings();
//! println!("Dates look like: {}", settings.datetime_format);
//! println!("Page length: {}", config.page_length());
//! ```

pub mod schema;

pub use schema::{DisplayConfig, GlobalConfig, HistoryConfig, IdentityConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format::identity::GravatarSettings;
use crate::format::{FeedSettings, TimeZone, DEFAULT_DATETIME_FORMAT};

/// Default number of revisions per history page.
pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// Keys accepted by [`Config::value`], in listing order.
pub const KEYS: [&str; 8] = [
    "display.datetime_format",
    "display.timezone",
    "identity.avatar_base_url",
    "identity.avatar_size",
    "identity.fallback",
    "history.page_length",
    "link_base",
    "document_extension",
];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// This struct provides accessor methods that apply precedence rules
/// automatically. Repo config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_root` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// hold invalid values. Missing config files are not an error.
    pub fn load(repo_root: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Self::find_global().as_deref(), repo_root)
    }

    /// Load configuration from an explicit global file and repo root.
    ///
    /// `global` is read only if it exists.
    pub fn load_from(
        global: Option<&Path>,
        repo_root: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let (global_config, global_path) = match global {
            Some(path) if path.exists() => (
                read_config::<GlobalConfig>(path)?,
                Some(path.to_path_buf()),
            ),
            _ => (GlobalConfig::default(), None),
        };

        let (repo, repo_path) = match repo_root.map(Self::repo_config_path) {
            Some(path) if path.exists() => (Some(read_config::<RepoConfig>(&path)?), Some(path)),
            _ => (None, None),
        };

        global_config.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        tracing::debug!(
            global = ?global_path,
            repo = ?repo_path,
            "configuration loaded"
        );

        Ok(Config {
            global: global_config,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $REVBROWSE_CONFIG
        if let Ok(path) = std::env::var("REVBROWSE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/revbrowse/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("revbrowse/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.revbrowse/config.toml
        dirs::home_dir()
            .map(|home| home.join(".revbrowse/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for repo config.
    ///
    /// Returns `.git/revbrowse/config.toml` relative to the given repo root.
    pub fn repo_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".git/revbrowse/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn display_value<'a>(
        &'a self,
        pick: impl Fn(&'a DisplayConfig) -> Option<&'a String>,
    ) -> Option<&'a str> {
        self.repo
            .as_ref()
            .and_then(|r| r.display.as_ref())
            .and_then(&pick)
            .or_else(|| self.global.display.as_ref().and_then(&pick))
            .map(String::as_str)
    }

    /// strftime pattern for revision dates.
    ///
    /// Defaults to `%b %d, %Y %I:%M %p`.
    pub fn datetime_format(&self) -> &str {
        self.display_value(|d| d.datetime_format.as_ref())
            .unwrap_or(DEFAULT_DATETIME_FORMAT)
    }

    /// Zone revision dates are rendered in.
    ///
    /// Defaults to the local zone.
    pub fn timezone(&self) -> TimeZone {
        self.display_value(|d| d.timezone.as_ref())
            .and_then(|tz| tz.parse().ok())
            .unwrap_or(TimeZone::Local)
    }

    /// Revisions per history page.
    ///
    /// Defaults to 10.
    pub fn page_length(&self) -> usize {
        self.repo
            .as_ref()
            .and_then(|r| r.history.as_ref())
            .and_then(|h| h.page_length)
            .or_else(|| self.global.history.as_ref().and_then(|h| h.page_length))
            .unwrap_or(DEFAULT_PAGE_LENGTH)
    }

    /// Prefix for revision links, without a trailing `/`.
    ///
    /// Defaults to empty.
    pub fn link_base(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.link_base.as_deref())
            .map(|base| base.trim_end_matches('/'))
            .unwrap_or("")
    }

    /// Extension that marks a file as a document, if configured.
    pub fn document_extension(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.document_extension.as_deref())
    }

    /// Avatar settings with defaults applied.
    pub fn gravatar_settings(&self) -> GravatarSettings {
        let mut settings = GravatarSettings::default();
        if let Some(identity) = &self.global.identity {
            if let Some(url) = &identity.avatar_base_url {
                settings.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(size) = identity.avatar_size {
                settings.size = size;
            }
            if let Some(fallback) = &identity.fallback {
                settings.fallback = fallback.clone();
            }
        }
        settings
    }

    /// Formatting settings for history pages.
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            datetime_format: self.datetime_format().to_string(),
            timezone: self.timezone(),
            link_base: self.link_base().to_string(),
        }
    }

    /// Effective value of a dotted key, or `None` if the key is unknown.
    ///
    /// Unset optional values are reported as an empty string.
    pub fn value(&self, key: &str) -> Option<String> {
        let avatar = self.gravatar_settings();
        let value = match key {
            "display.datetime_format" => self.datetime_format().to_string(),
            "display.timezone" => self.timezone().to_string(),
            "identity.avatar_base_url" => avatar.base_url,
            "identity.avatar_size" => avatar.size.to_string(),
            "identity.fallback" => avatar.fallback,
            "history.page_length" => self.page_length().to_string(),
            "link_base" => self.link_base().to_string(),
            "document_extension" => self.document_extension().unwrap_or("").to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

/// Read and parse a config file.
fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_repo_config(root: &Path, contents: &str) {
        let path = Config::repo_config_path(root);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn every_key_has_a_value() {
        let config = Config::load_from(None, None).unwrap();
        for key in KEYS {
            assert!(config.value(key).is_some(), "{key} has no value");
        }
        assert_eq!(config.value("history.page_length").as_deref(), Some("10"));
        assert_eq!(config.value("document_extension").as_deref(), Some(""));
        assert_eq!(config.value("trunk"), None);
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let config = Config::load_from(Some(&missing), Some(temp.path())).unwrap();

        assert_eq!(config.datetime_format(), "%b %d, %Y %I:%M %p");
        assert_eq!(config.timezone(), TimeZone::Local);
        assert_eq!(config.page_length(), 10);
        assert_eq!(config.link_base(), "");
        assert!(config.document_extension().is_none());
        assert!(config.global_config_loaded_from().is_none());
        assert!(config.repo_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
            [display]
            timezone = "utc"

            [identity]
            avatar_size = 40
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(&global), None).unwrap();

        assert_eq!(config.timezone(), TimeZone::Utc);
        assert_eq!(config.gravatar_settings().size, 40);
        assert_eq!(config.global_config_loaded_from(), Some(global.as_path()));
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        write_repo_config(
            temp.path(),
            r#"
            link_base = "/wiki/"
            document_extension = "md"
            "#,
        );

        let config = Config::load_from(None, Some(temp.path())).unwrap();

        assert_eq!(config.link_base(), "/wiki");
        assert_eq!(config.document_extension(), Some("md"));
        assert!(config.repo_config_loaded_from().is_some());
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
            [display]
            datetime_format = "%Y"
            timezone = "utc"

            [history]
            page_length = 20
            "#,
        )
        .unwrap();
        write_repo_config(
            temp.path(),
            r#"
            [display]
            datetime_format = "%d/%m/%Y"

            [history]
            page_length = 5
            "#,
        );

        let config = Config::load_from(Some(&global), Some(temp.path())).unwrap();

        assert_eq!(config.datetime_format(), "%d/%m/%Y");
        // Not overridden by the repo, so the global value holds
        assert_eq!(config.timezone(), TimeZone::Utc);
        assert_eq!(config.page_length(), 5);
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        write_repo_config(temp.path(), "[history]\npage_length = 0\n");

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        write_repo_config(
            temp.path(),
            r#"
            link_base = "/w"
            unknown_field = true
            "#,
        );

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn feed_settings_reflect_config() {
        let config = Config {
            repo: Some(RepoConfig {
                link_base: Some("/w".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let settings = config.feed_settings();
        assert_eq!(settings.link_base, "/w");
        assert_eq!(settings.datetime_format, DEFAULT_DATETIME_FORMAT);
    }
}
