//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ListingSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing page and HTTP behavior
    #[serde(default)]
    pub listing: ListingConfig,

    /// How items are pulled out of the page
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Notification message settings
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Output detail level, threaded into each component
    #[serde(default)]
    pub verbosity: Verbosity,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, falling back to defaults only when the file is absent.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Config file {:?} not found. Using defaults.", path);
                Ok(Self::default())
            }
            Err(e) => Err(AppError::config(format!(
                "Cannot read config file {path:?}: {e}"
            ))),
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.listing.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "listing.url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.listing.user_agent.trim().is_empty() {
            return Err(AppError::validation("listing.user_agent is empty"));
        }
        if self.listing.timeout_secs == 0 {
            return Err(AppError::validation("listing.timeout_secs must be > 0"));
        }
        self.extraction.selectors.validate()?;
        if self.notification.subject.trim().is_empty() {
            return Err(AppError::validation("notification.subject is empty"));
        }
        Ok(())
    }
}

/// Listing page and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Listing page to watch
    #[serde(default = "defaults::listing_url")]
    pub url: String,

    /// User-Agent header for the request
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url: defaults::listing_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// What to do with a product entry whose payload cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPolicy {
    /// Abort the whole extraction on the first malformed entry
    #[default]
    Strict,
    /// Log and skip malformed entries
    Tolerant,
}

/// Item extraction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(flatten)]
    pub selectors: ListingSelectors,

    #[serde(default)]
    pub policy: ExtractionPolicy,

    /// Accept a page without any product entries instead of failing
    #[serde(default)]
    pub allow_empty: bool,
}

/// Notification message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Mail subject line
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Anchor text for the link back to the listing
    #[serde(default = "defaults::link_text")]
    pub link_text: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            subject: defaults::subject(),
            link_text: defaults::link_text(),
        }
    }
}

/// Output detail level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Default `env_logger` filter for this level.
    pub fn log_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }
}

/// Mail submission settings. Only implicit-TLS (SMTPS) endpoints are supported.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub smtp_server: String,
    pub port: u16,
    pub sender_email: String,
    pub password: String,
    pub receiver_email: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_server", &self.smtp_server)
            .field("port", &self.port)
            .field("sender_email", &self.sender_email)
            .field("password", &"<redacted>")
            .field("receiver_email", &self.receiver_email)
            .finish()
    }
}

mod defaults {
    pub fn listing_url() -> String {
        "https://www.canyon.com/fr-fr/outlet-bikes/?cgid=outlet&prefn1=pc_familie&prefn2=pc_rahmengroesse&prefv1=Commuter&prefv2=M&searchType=outlet".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; outlet-watch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn subject() -> String {
        "New bikes on the Canyon outlet!".into()
    }
    pub fn link_text() -> String {
        "Go to the outlet".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            verbosity = "verbose"

            [listing]
            timeout_secs = 5

            [extraction]
            policy = "tolerant"
            tile_selector = "div.tile"
            "#,
        )
        .unwrap();

        assert_eq!(config.listing.timeout_secs, 5);
        assert_eq!(config.listing.url, defaults::listing_url());
        assert_eq!(config.extraction.policy, ExtractionPolicy::Tolerant);
        assert_eq!(config.extraction.selectors.tile_selector, "div.tile");
        assert_eq!(
            config.extraction.selectors.list_item_selector,
            "li.productGrid__listItem"
        );
        assert!(!config.extraction.allow_empty);
        assert!(config.verbosity.is_verbose());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.listing.url = "ftp://example.com/list".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.listing.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extraction.selectors.list_item_selector = "[[".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.listing.timeout_secs, 30);
    }

    #[test]
    fn test_load_or_default_rejects_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[listing\nurl = ").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_mail_config_debug_redacts_password() {
        let mail = MailConfig {
            smtp_server: "smtp.example.com".into(),
            port: 465,
            sender_email: "me@example.com".into(),
            password: "hunter2".into(),
            receiver_email: "you@example.com".into(),
        };
        let debug = format!("{mail:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(Verbosity::Quiet.log_filter(), "warn");
        assert_eq!(Verbosity::default().log_filter(), "info");
        assert!(Verbosity::Verbose > Verbosity::Normal);
    }
}
