//! Listing item data structure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar that is only ever displayed, never computed with.
///
/// The listing payload is inconsistent about quoting: prices and model years
/// show up as JSON numbers on some pages and as strings on others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(untagged)]
pub enum DisplayValue {
    Text(String),
    Number(serde_json::Number),
    #[default]
    Empty,
}

impl DisplayValue {
    pub fn is_empty(&self) -> bool {
        match self {
            DisplayValue::Text(s) => s.trim().is_empty(),
            DisplayValue::Number(_) => false,
            DisplayValue::Empty => true,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Text(s) => f.write_str(s),
            DisplayValue::Number(n) => write!(f, "{n}"),
            DisplayValue::Empty => f.write_str("n/a"),
        }
    }
}

impl From<&str> for DisplayValue {
    fn from(s: &str) -> Self {
        DisplayValue::Text(s.to_string())
    }
}

impl From<u64> for DisplayValue {
    fn from(n: u64) -> Self {
        DisplayValue::Number(n.into())
    }
}

/// One catalog entry observed on the listing page.
///
/// `id` is the only field used for identity across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Identifier assigned by the source site
    pub id: String,

    /// Display name
    pub name: String,

    /// Model year
    pub year: DisplayValue,

    /// Frame size code
    pub size: String,

    /// Discounted outlet price
    pub outlet_price: DisplayValue,

    /// Regular list price
    pub normal_price: DisplayValue,
}

impl Item {
    /// Multi-line summary used in logs and notification bodies.
    pub fn summary(&self) -> String {
        format!(
            "\t-id : {}\n\t-Name (year) : {} ({})\n\t-size : {}\n\t-price : {} instead of {}",
            self.id, self.name, self.year, self.size, self.outlet_price, self.normal_price
        )
    }
}
