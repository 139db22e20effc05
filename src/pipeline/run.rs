// src/pipeline/run.rs

//! Single watch pass over the listing page.

use crate::error::Result;
use crate::models::Item;
use crate::services::{ItemExtractor, MailError, Notifier, PayloadBackend, ScraperBackend};
use crate::storage::SnapshotStore;
use crate::utils::PageSource;

use super::diff::compute_new_items;

/// What a single run observed and did.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Items extracted from the page
    pub seen: usize,
    /// Items not present in the previous snapshot
    pub new_items: Vec<Item>,
    /// Whether a notification was delivered
    pub notified: bool,
    /// Notification failure, logged and otherwise ignored
    pub mail_error: Option<MailError>,
}

/// Fetch → extract → diff and persist → notify.
pub struct Watcher<S, St, N, B = ScraperBackend> {
    source: S,
    extractor: ItemExtractor<B>,
    store: St,
    notifier: N,
}

impl<S, St, N, B> Watcher<S, St, N, B>
where
    S: PageSource,
    St: SnapshotStore,
    N: Notifier,
    B: PayloadBackend,
{
    pub fn new(source: S, extractor: ItemExtractor<B>, store: St, notifier: N) -> Self {
        Self {
            source,
            extractor,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run once.
    ///
    /// Fetch, extraction and snapshot failures abort the run before anything
    /// is sent. A notification failure is logged and recorded in the summary;
    /// the snapshot has already been saved by then.
    pub fn run(&self) -> Result<RunSummary> {
        let markup = self.source.fetch()?;
        let items = self.extractor.extract(&markup)?;
        let new_items = compute_new_items(&items, &self.store)?;

        let mut summary = RunSummary {
            seen: items.len(),
            ..RunSummary::default()
        };

        if new_items.is_empty() {
            log::info!("No new items among {} listed", items.len());
            return Ok(summary);
        }

        log::info!("Found {} new item(s)", new_items.len());
        match self.notifier.notify(&new_items, self.source.url()) {
            Ok(()) => summary.notified = true,
            Err(e) => {
                log::error!("Notification failed, run continues: {}", e);
                summary.mail_error = Some(e);
            }
        }
        summary.new_items = new_items;
        Ok(summary)
    }
}
