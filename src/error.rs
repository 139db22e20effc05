// src/error.rs

//! Unified error handling for the watcher.

use std::fmt;
use std::path::Path;

use thiserror::Error;

pub use crate::services::MailError;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Extraction,
    Storage,
    Config,
    Mail,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (connect, timeout or non-2xx status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Listing page could not be turned into items
    #[error("Extraction error for {context}: {message}")]
    Extraction { context: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is unreadable or corrupt
    #[error("Snapshot error at {path}: {message}")]
    Storage { path: String, message: String },

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mail submission failed
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction error with context.
    pub fn extraction(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a snapshot storage error for the given file.
    pub fn storage(path: &Path, message: impl fmt::Display) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) => ErrorKind::Network,
            Self::Selector { .. } | Self::Extraction { .. } => ErrorKind::Extraction,
            Self::Io(_) | Self::Storage { .. } => ErrorKind::Storage,
            Self::Toml(_) | Self::Url(_) | Self::Config(_) | Self::Validation(_) => {
                ErrorKind::Config
            }
            Self::Mail(_) => ErrorKind::Mail,
        }
    }
}
