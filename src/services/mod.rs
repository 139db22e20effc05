//! Service layer for the watcher.
//!
//! - Item extraction from listing markup (`ItemExtractor`)
//! - New-item notification (`SmtpNotifier`, `LogNotifier`)

mod extractor;
mod notifier;

pub use extractor::{
    EntryPayload, ItemExtractor, PayloadBackend, PayloadIssue, ScraperBackend, decode_payload,
};
pub use notifier::{
    LogNotifier, MailError, Notifier, SmtpNotifier, compose_body, compose_html,
};
