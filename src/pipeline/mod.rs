//! Pipeline entry points.
//!
//! - `calculate_diff` / `compute_new_items`: compare against the stored snapshot
//! - `Watcher`: one fetch → extract → diff → notify pass
//! - `run_watcher`: build a `Watcher` from configuration and run it

pub mod diff;
pub mod run;

use std::path::Path;

pub use diff::{DiffResult, calculate_diff, compute_new_items};
pub use run::{RunSummary, Watcher};

use crate::error::Result;
use crate::models::{Config, MailConfig};
use crate::services::{ItemExtractor, LogNotifier, SmtpNotifier};
use crate::storage::LocalStorage;
use crate::utils::HttpFetcher;

/// How new items are reported.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Submit by mail
    Smtp(MailConfig),
    /// Only log the composed message
    DryRun,
}

/// Run one watch pass against the live listing page.
pub fn run_watcher(config: &Config, snapshot: &Path, delivery: Delivery) -> Result<RunSummary> {
    let fetcher = HttpFetcher::new(&config.listing)?;
    let extractor = ItemExtractor::new(config.extraction.clone(), config.verbosity);
    let storage = LocalStorage::new(snapshot);

    match delivery {
        Delivery::Smtp(mail) => {
            let notifier =
                SmtpNotifier::new(mail, config.notification.clone(), config.verbosity);
            Watcher::new(fetcher, extractor, storage, notifier).run()
        }
        Delivery::DryRun => {
            let notifier = LogNotifier::new(&config.notification);
            Watcher::new(fetcher, extractor, storage, notifier).run()
        }
    }
}
