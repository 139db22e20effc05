// src/models/mod.rs

//! Domain models for the watcher.

mod config;
mod item;
mod selectors;

// Re-export all public types
pub use config::{
    Config, ExtractionConfig, ExtractionPolicy, ListingConfig, MailConfig, NotificationConfig,
    Verbosity,
};
pub use item::{DisplayValue, Item};
pub use selectors::{ListingSelectors, parse_selector};
