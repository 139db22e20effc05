// src/models/selectors.rs

//! CSS selectors for locating product entries on the listing page.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Where the embedded analytics payload lives in the listing markup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Selector for each product-list entry
    #[serde(default = "default_list_item")]
    pub list_item_selector: String,

    /// Selector for the product tile nested in an entry
    #[serde(default = "default_tile")]
    pub tile_selector: String,

    /// Attribute on the tile holding the JSON payload
    #[serde(default = "default_payload_attribute")]
    pub payload_attribute: String,
}

fn default_list_item() -> String {
    "li.productGrid__listItem".to_string()
}

fn default_tile() -> String {
    "div.productTile".to_string()
}

fn default_payload_attribute() -> String {
    "data-gtm-impression".to_string()
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            list_item_selector: default_list_item(),
            tile_selector: default_tile(),
            payload_attribute: default_payload_attribute(),
        }
    }
}

impl ListingSelectors {
    /// Check that both selectors parse and the attribute name is set.
    pub fn validate(&self) -> Result<()> {
        parse_selector(&self.list_item_selector)?;
        parse_selector(&self.tile_selector)?;
        if self.payload_attribute.trim().is_empty() {
            return Err(AppError::validation(
                "extraction.payload_attribute is empty",
            ));
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    if s.trim().is_empty() {
        return Err(AppError::selector(s, "selector is empty"));
    }
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
