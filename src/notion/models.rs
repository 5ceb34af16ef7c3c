use crate::domain::changes::ListingSnapshot;
use serde::Deserialize;
use serde_json::{Map, Value};

// Database property names.
pub const LINK: &str = "Link";
pub const ADDRESS: &str = "Address";
pub const STREET_ADDRESS: &str = "Street Address";
pub const CITY: &str = "City";
pub const STATE: &str = "State";
pub const ZIP_CODE: &str = "Zip Code";
pub const LIST_PRICE: &str = "Listing Price";
pub const BEDS: &str = "Beds";
pub const BATHS: &str = "Baths";
pub const GARAGE_SPACES: &str = "Garage Spaces";
pub const LIVING_AREA: &str = "Size (sq. ft.)";
pub const LOT_AREA: &str = "Lot Size (sq. ft.)";
pub const YEAR_BUILT: &str = "Year Built";
pub const LIKE: &str = "Like";
pub const PREDICTION: &str = "Prediction";

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    /// Everything else, including the object keyed by `kind`.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Block {
    /// Text of the block's own rich text, without its children.
    pub fn plain_text(&self) -> String {
        self.body
            .get(&self.kind)
            .and_then(|b| b.get("rich_text"))
            .map(rich_text_plain)
            .unwrap_or_default()
    }
}

/// One page of a paginated list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

// Readers accept both the shape the API returns (with `plain_text`) and the
// shape this crate writes (`text.content` only).

pub fn text_value(properties: &Map<String, Value>, name: &str) -> String {
    properties
        .get(name)
        .and_then(|p| p.get("rich_text").or_else(|| p.get("title")))
        .map(rich_text_plain)
        .unwrap_or_default()
}

/// Concatenated text of a rich-text segment array.
pub fn rich_text_plain(parts: &Value) -> String {
    let Some(parts) = parts.as_array() else {
        return String::new();
    };

    parts
        .iter()
        .filter_map(|part| {
            part.get("plain_text")
                .or_else(|| part.get("text").and_then(|t| t.get("content")))
                .and_then(Value::as_str)
        })
        .collect()
}

pub fn number_value(properties: &Map<String, Value>, name: &str) -> Option<f64> {
    properties.get(name)?.get("number")?.as_f64()
}

pub fn url_value(properties: &Map<String, Value>, name: &str) -> Option<String> {
    properties
        .get(name)?
        .get("url")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn checkbox_value(properties: &Map<String, Value>, name: &str) -> Option<bool> {
    properties.get(name)?.get("checkbox")?.as_bool()
}

pub fn snapshot_from_properties(properties: &Map<String, Value>) -> ListingSnapshot {
    ListingSnapshot {
        link: url_value(properties, LINK),
        address: text_value(properties, ADDRESS),
        street_address: text_value(properties, STREET_ADDRESS),
        city: text_value(properties, CITY),
        state: text_value(properties, STATE),
        zip_code: number_value(properties, ZIP_CODE),
        list_price: number_value(properties, LIST_PRICE),
        beds: number_value(properties, BEDS),
        baths: number_value(properties, BATHS),
        garage_spaces: number_value(properties, GARAGE_SPACES),
        living_area: number_value(properties, LIVING_AREA),
        lot_area: number_value(properties, LOT_AREA),
        year_built: number_value(properties, YEAR_BUILT),
    }
}

/// A listing as read back from the store.
#[derive(Debug, Clone)]
pub struct StoredListing {
    pub page_id: String,
    pub snapshot: ListingSnapshot,
    pub like: bool,
    pub prediction: Option<bool>,
}

impl StoredListing {
    pub fn from_page(page: &Page) -> Self {
        Self {
            page_id: page.id.clone(),
            snapshot: snapshot_from_properties(&page.properties),
            like: checkbox_value(&page.properties, LIKE).unwrap_or(false),
            prediction: checkbox_value(&page.properties, PREDICTION),
        }
    }
}
