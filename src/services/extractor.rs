// src/services/extractor.rs

//! Item extraction from the listing markup.
//!
//! Each product-list entry carries a product tile whose analytics attribute
//! holds a JSON document shaped like:
//!
//! ```text
//! {"ecommerce": {"impressions": [{"id": "...", "name": "...",
//!   "dimension50": <year>, "dimension53": <size>,
//!   "metric4": <outlet price>, "metric5": <list price>}]}}
//! ```
//!
//! Locating the payloads is delegated to a [`PayloadBackend`] so the JSON
//! decoding does not depend on a particular HTML parser.

use std::fmt;

use scraper::Html;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{
    DisplayValue, ExtractionConfig, ExtractionPolicy, Item, ListingSelectors, Verbosity,
    parse_selector,
};

/// Why a product-list entry did not yield a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadIssue {
    MissingTile,
    MissingAttribute,
}

impl fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadIssue::MissingTile => f.write_str("product tile not found"),
            PayloadIssue::MissingAttribute => f.write_str("payload attribute missing"),
        }
    }
}

/// Raw payload of one product-list entry, in document order.
pub type EntryPayload = std::result::Result<String, PayloadIssue>;

/// Pulls embedded JSON payloads out of marked-up listing entries.
pub trait PayloadBackend {
    fn payloads(&self, markup: &str, selectors: &ListingSelectors) -> Result<Vec<EntryPayload>>;
}

/// [`PayloadBackend`] built on the `scraper` HTML parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperBackend;

impl PayloadBackend for ScraperBackend {
    fn payloads(&self, markup: &str, selectors: &ListingSelectors) -> Result<Vec<EntryPayload>> {
        let item_sel = parse_selector(&selectors.list_item_selector)?;
        let tile_sel = parse_selector(&selectors.tile_selector)?;
        let document = Html::parse_document(markup);

        let payloads = document
            .select(&item_sel)
            .map(|entry| -> EntryPayload {
                let tile = entry
                    .select(&tile_sel)
                    .next()
                    .ok_or(PayloadIssue::MissingTile)?;
                tile.value()
                    .attr(&selectors.payload_attribute)
                    .map(str::to_string)
                    .ok_or(PayloadIssue::MissingAttribute)
            })
            .collect();
        Ok(payloads)
    }
}

#[derive(Deserialize)]
struct AnalyticsPayload {
    ecommerce: Ecommerce,
}

#[derive(Deserialize)]
struct Ecommerce {
    impressions: Vec<Impression>,
}

#[derive(Deserialize)]
struct Impression {
    id: DisplayValue,
    name: String,
    #[serde(rename = "dimension50")]
    year: DisplayValue,
    #[serde(rename = "dimension53")]
    size: DisplayValue,
    #[serde(rename = "metric4")]
    outlet_price: DisplayValue,
    #[serde(rename = "metric5")]
    normal_price: DisplayValue,
}

/// Decode one analytics payload into an [`Item`].
pub fn decode_payload(raw: &str) -> std::result::Result<Item, String> {
    let payload: AnalyticsPayload =
        serde_json::from_str(raw).map_err(|e| format!("invalid payload JSON: {e}"))?;
    let impression = payload
        .ecommerce
        .impressions
        .into_iter()
        .next()
        .ok_or_else(|| "payload has no impressions".to_string())?;

    if impression.id.is_empty() {
        return Err("impression has an empty id".to_string());
    }

    Ok(Item {
        id: impression.id.to_string(),
        name: impression.name,
        year: impression.year,
        size: match impression.size {
            DisplayValue::Empty => String::new(),
            other => other.to_string(),
        },
        outlet_price: impression.outlet_price,
        normal_price: impression.normal_price,
    })
}

/// Turns listing markup into an ordered sequence of [`Item`]s.
pub struct ItemExtractor<B = ScraperBackend> {
    backend: B,
    config: ExtractionConfig,
    verbosity: Verbosity,
}

impl ItemExtractor<ScraperBackend> {
    pub fn new(config: ExtractionConfig, verbosity: Verbosity) -> Self {
        Self::with_backend(ScraperBackend, config, verbosity)
    }
}

impl<B: PayloadBackend> ItemExtractor<B> {
    pub fn with_backend(backend: B, config: ExtractionConfig, verbosity: Verbosity) -> Self {
        Self {
            backend,
            config,
            verbosity,
        }
    }

    /// Extract every item on the page, in document order.
    ///
    /// Under [`ExtractionPolicy::Strict`] the first malformed entry aborts the
    /// whole extraction; under [`ExtractionPolicy::Tolerant`] it is skipped.
    pub fn extract(&self, markup: &str) -> Result<Vec<Item>> {
        let payloads = self.backend.payloads(markup, &self.config.selectors)?;

        if payloads.is_empty() {
            if self.config.allow_empty {
                log::warn!("No product entries found on the listing page");
                return Ok(Vec::new());
            }
            return Err(AppError::extraction(
                "listing page",
                format!(
                    "no entries match '{}'; the page layout may have changed",
                    self.config.selectors.list_item_selector
                ),
            ));
        }

        let mut items = Vec::with_capacity(payloads.len());
        let mut skipped = 0;
        for (index, payload) in payloads.into_iter().enumerate() {
            let decoded = payload
                .map_err(|issue| issue.to_string())
                .and_then(|raw| decode_payload(&raw));

            match decoded {
                Ok(item) => {
                    if self.verbosity.is_verbose() {
                        log::info!("Item found:\n{}", item.summary());
                    }
                    items.push(item);
                }
                Err(message) => match self.config.policy {
                    ExtractionPolicy::Strict => {
                        return Err(AppError::extraction(format!("entry #{index}"), message));
                    }
                    ExtractionPolicy::Tolerant => {
                        skipped += 1;
                        log::warn!("Skipping entry #{}: {}", index, message);
                    }
                },
            }
        }

        if items.is_empty() && !self.config.allow_empty {
            return Err(AppError::extraction(
                "listing page",
                format!("all {skipped} entries were malformed"),
            ));
        }

        log::info!("Extracted {} items ({} skipped)", items.len(), skipped);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tile(payload: &str) -> String {
        format!(
            r#"<li class="productGrid__listItem"><div class="productTile" data-gtm-impression='{payload}'></div></li>"#
        )
    }

    fn payload(id: &str, name: &str) -> String {
        format!(
            r#"{{"ecommerce":{{"impressions":[{{"id":"{id}","name":"{name}","dimension50":"2022","dimension53":"M","metric4":1899,"metric5":"2299"}}]}}}}"#
        )
    }

    fn page(entries: &[String]) -> String {
        format!(
            "<html><body><ul class=\"productGrid\">{}</ul></body></html>",
            entries.concat()
        )
    }

    fn extractor(policy: ExtractionPolicy) -> ItemExtractor {
        let config = ExtractionConfig {
            policy,
            ..ExtractionConfig::default()
        };
        ItemExtractor::new(config, Verbosity::Normal)
    }

    #[test]
    fn test_decode_payload_fields() {
        let item = decode_payload(&payload("3284", "Commuter 7")).unwrap();
        assert_eq!(item.id, "3284");
        assert_eq!(item.name, "Commuter 7");
        assert_eq!(item.year.to_string(), "2022");
        assert_eq!(item.size, "M");
        assert_eq!(item.outlet_price.to_string(), "1899");
        assert_eq!(item.normal_price.to_string(), "2299");
    }

    #[test]
    fn test_decode_numeric_id() {
        let raw = r#"{"ecommerce":{"impressions":[{"id":42,"name":"Roadlite","dimension50":2021,"dimension53":"L","metric4":999,"metric5":1299}]}}"#;
        assert_eq!(decode_payload(raw).unwrap().id, "42");
    }

    #[test]
    fn test_decode_rejects_bad_payloads() {
        assert!(decode_payload("not json").is_err());
        assert!(decode_payload(r#"{"ecommerce":{"impressions":[]}}"#).is_err());
        assert!(decode_payload(r#"{"ecommerce":{}}"#).is_err());
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let html = page(&[
            tile(&payload("2", "B")),
            tile(&payload("1", "A")),
            tile(&payload("3", "C")),
        ]);
        let items = extractor(ExtractionPolicy::Strict).extract(&html).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }

    #[test]
    fn test_extract_keeps_duplicate_ids() {
        let html = page(&[tile(&payload("7", "A")), tile(&payload("7", "A"))]);
        let items = extractor(ExtractionPolicy::Strict).extract(&html).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_strict_aborts_on_missing_payload() {
        let html = page(&[
            tile(&payload("1", "A")),
            r#"<li class="productGrid__listItem"><div class="productTile"></div></li>"#.to_string(),
        ]);
        let err = extractor(ExtractionPolicy::Strict).extract(&html).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(err.to_string().contains("entry #1"));
    }

    #[test]
    fn test_tolerant_skips_malformed_entries() {
        let html = page(&[
            r#"<li class="productGrid__listItem"><span>no tile</span></li>"#.to_string(),
            tile("{broken"),
            tile(&payload("5", "E")),
        ]);
        let items = extractor(ExtractionPolicy::Tolerant).extract(&html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "5");
    }

    #[test]
    fn test_tolerant_fails_when_every_entry_is_malformed() {
        let html = page(&[
            r#"<li class="productGrid__listItem"><span>no tile</span></li>"#.to_string(),
            tile("{broken"),
        ]);
        let err = extractor(ExtractionPolicy::Tolerant)
            .extract(&html)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(err.to_string().contains("all 2 entries were malformed"));
    }

    #[test]
    fn test_tolerant_all_malformed_allowed_when_configured() {
        let config = ExtractionConfig {
            policy: ExtractionPolicy::Tolerant,
            allow_empty: true,
            ..ExtractionConfig::default()
        };
        let items = ItemExtractor::new(config, Verbosity::Normal)
            .extract(&page(&[tile("{broken")]))
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_empty_page_is_layout_change() {
        let html = "<html><body><p>Maintenance</p></body></html>";
        let err = extractor(ExtractionPolicy::Strict).extract(html).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn test_empty_page_allowed_when_configured() {
        let config = ExtractionConfig {
            allow_empty: true,
            ..ExtractionConfig::default()
        };
        let items = ItemExtractor::new(config, Verbosity::Quiet)
            .extract("<html></html>")
            .unwrap();
        assert!(items.is_empty());
    }

    struct FixedBackend(Vec<EntryPayload>);

    impl PayloadBackend for FixedBackend {
        fn payloads(&self, _: &str, _: &ListingSelectors) -> Result<Vec<EntryPayload>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_custom_backend() {
        let backend = FixedBackend(vec![
            Ok(payload("9", "Grail")),
            Err(PayloadIssue::MissingAttribute),
        ]);
        let extractor = ItemExtractor::with_backend(
            backend,
            ExtractionConfig {
                policy: ExtractionPolicy::Tolerant,
                ..ExtractionConfig::default()
            },
            Verbosity::Verbose,
        );
        let items = extractor.extract("").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Grail");
    }
}
