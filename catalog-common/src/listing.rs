//! Listing records
//!
//! One `Listing` is one data row of a Category Listing Report. Records arrive
//! fully parsed from the export loader and are never mutated afterwards.
//!
//! Blank text (empty or whitespace only) means "not provided". Accessors
//! return `None` for blanks so checks never have to distinguish an absent
//! column from an empty cell.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fulfillment channel a listing is sold through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FulfillmentChannel {
    /// Fulfilled by Amazon (AFN)
    Fba,
    /// Fulfilled by merchant (FBM / MFN)
    Fbm,
    /// Channel not reported
    #[default]
    Unknown,
}

impl FulfillmentChannel {
    /// Parse a channel label as it appears in exports
    ///
    /// Accepts `FBA`, `AFN`, `AMAZON_NA`-style prefixes, `FBM`, `MFN`,
    /// `DEFAULT` (merchant) in any case. Anything else is `Unknown`.
    pub fn parse(value: &str) -> Self {
        let upper = value.trim().to_ascii_uppercase();
        match upper.as_str() {
            "FBA" | "AFN" => Self::Fba,
            "FBM" | "MFN" | "DEFAULT" | "MERCHANT" => Self::Fbm,
            s if s.starts_with("AMAZON") => Self::Fba,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fba => "FBA",
            Self::Fbm => "FBM",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for FulfillmentChannel {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FulfillmentChannel> for String {
    fn from(value: FulfillmentChannel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FulfillmentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized listing data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    /// 1-based row position in the source report
    pub row_number: usize,
    /// Seller SKU (not unique across fulfillment channels)
    pub sku: String,
    /// Taxonomy category, e.g. "SHOES"
    pub product_type: String,
    pub fulfillment_channel: FulfillmentChannel,
    pub item_name: String,
    pub title: String,
    pub brand: String,
    /// Ordered bullet points (up to 5)
    pub bullet_points: Vec<String>,
    /// Item Type Keyword column
    pub item_type_keyword: String,
    /// "parent", "child" or blank
    pub parentage: String,
    pub parent_sku: String,
    pub status: String,
    /// Every other column, keyed by header name
    pub attributes: BTreeMap<String, String>,
}

/// Maximum number of bullet point columns in a report
pub const MAX_BULLETS: usize = 5;

impl Listing {
    /// Create a listing with the identifying fields set
    pub fn new(row_number: usize, sku: impl Into<String>, product_type: impl Into<String>) -> Self {
        Self {
            row_number,
            sku: sku.into(),
            product_type: product_type.into(),
            ..Self::default()
        }
    }

    /// Resolve a report column name to its value
    ///
    /// Named columns map to the dedicated fields; everything else is looked
    /// up in `attributes`. Blank values resolve to `None`.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "SKU" => Some(self.sku.as_str()),
            "Product Type" => Some(self.product_type.as_str()),
            "Item Name" => Some(self.item_name.as_str()),
            "Title" => Some(self.title.as_str()),
            "Brand" => Some(self.brand.as_str()),
            "Item Type Keyword" => Some(self.item_type_keyword.as_str()),
            "Parentage" => Some(self.parentage.as_str()),
            "Parent SKU" => Some(self.parent_sku.as_str()),
            "Status" => Some(self.status.as_str()),
            other => match bullet_index(other) {
                Some(idx) => self.bullet_points.get(idx).map(String::as_str),
                None => self.attributes.get(other).map(String::as_str),
            },
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Whether the column has a non-blank value
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Non-blank bullets with their 1-based position
    pub fn bullets(&self) -> impl Iterator<Item = (usize, &str)> {
        self.bullet_points
            .iter()
            .take(MAX_BULLETS)
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(idx, text)| (idx + 1, text.as_str()))
    }

    /// Bullet at a 1-based position, `None` if missing or blank
    pub fn bullet(&self, position: usize) -> Option<&str> {
        if position == 0 || position > MAX_BULLETS {
            return None;
        }
        self.bullet_points
            .get(position - 1)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Names of every column holding a non-blank value
    pub fn populated_fields(&self) -> Vec<String> {
        let named = [
            "SKU",
            "Product Type",
            "Item Name",
            "Title",
            "Brand",
            "Item Type Keyword",
            "Parentage",
            "Parent SKU",
            "Status",
        ];
        let mut fields: Vec<String> = named
            .iter()
            .filter(|name| self.has_field(name))
            .map(|name| name.to_string())
            .collect();
        fields.extend(self.bullets().map(|(pos, _)| bullet_field_name(pos)));
        fields.extend(
            self.attributes
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(key, _)| key.clone()),
        );
        fields
    }

    /// True for child rows of a variation family
    pub fn is_variation_child(&self) -> bool {
        self.parentage.to_lowercase().contains("child") || !self.parent_sku.trim().is_empty()
    }
}

/// Column name of a bullet position, e.g. "Bullet Point 2"
pub fn bullet_field_name(position: usize) -> String {
    format!("Bullet Point {}", position)
}

fn bullet_index(name: &str) -> Option<usize> {
    let position: usize = name.strip_prefix("Bullet Point ")?.trim().parse().ok()?;
    (1..=MAX_BULLETS).contains(&position).then(|| position - 1)
}
