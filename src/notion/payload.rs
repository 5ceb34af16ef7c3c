// src/notion/payload.rs

use crate::domain::changes::ListingSnapshot;
use crate::domain::FeatureRecord;
use crate::notion::models::*;
use serde_json::{json, Map, Value};

/// Longest text a single rich-text segment may hold.
pub const RICH_TEXT_LIMIT: usize = 2000;

pub fn rich_text(content: &str) -> Value {
    let chars: Vec<char> = content.chars().collect();
    let segments: Vec<Value> = chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| {
            json!({
                "type": "text",
                "text": { "content": chunk.iter().collect::<String>() }
            })
        })
        .collect();
    Value::Array(segments)
}

pub fn rich_text_property(content: &str) -> Value {
    json!({ "rich_text": rich_text(content) })
}

pub fn url_property(content: Option<&str>) -> Value {
    json!({ "url": content })
}

pub fn number_property(content: Option<f64>) -> Value {
    json!({ "number": content })
}

pub fn checkbox_property(checked: bool) -> Value {
    json!({ "checkbox": checked })
}

/// Scalar properties for one listing. `Like` and `Prediction` are never
/// written here; they belong to the user and the classifier.
pub fn listing_properties(snapshot: &ListingSnapshot) -> Map<String, Value> {
    let mut properties = Map::new();
    let mut put = |name: &str, value: Value| {
        properties.insert(name.to_string(), value);
    };

    put(LINK, url_property(snapshot.link.as_deref()));
    put(ADDRESS, rich_text_property(&snapshot.address));
    put(STREET_ADDRESS, rich_text_property(&snapshot.street_address));
    put(CITY, rich_text_property(&snapshot.city));
    put(STATE, rich_text_property(&snapshot.state));
    put(ZIP_CODE, number_property(snapshot.zip_code));
    put(LIST_PRICE, number_property(snapshot.list_price));
    put(BEDS, number_property(snapshot.beds));
    put(BATHS, number_property(snapshot.baths));
    put(GARAGE_SPACES, number_property(snapshot.garage_spaces));
    put(LIVING_AREA, number_property(snapshot.living_area));
    put(LOT_AREA, number_property(snapshot.lot_area));
    put(YEAR_BUILT, number_property(snapshot.year_built));

    properties
}

pub fn paragraph_block(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": rich_text(content) }
    })
}

/// One bulleted item holding a paragraph per note.
pub fn bulleted_list_block(notes: &[String]) -> Value {
    let items: Vec<Value> = notes
        .iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| paragraph_block(n))
        .collect();

    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": {
            "rich_text": [],
            "children": items
        }
    })
}

/// Description paragraph followed by the amenity notes list.
pub fn listing_children(record: &FeatureRecord) -> Vec<Value> {
    vec![
        paragraph_block(&record.property_description),
        bulleted_list_block(&record.raw_feature_notes),
    ]
}

pub fn new_page_body(database_id: &str, record: &FeatureRecord) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": listing_properties(&ListingSnapshot::from_record(record)),
        "children": listing_children(record),
    })
}

pub fn address_filter(address: &str) -> Value {
    json!({
        "property": ADDRESS,
        "rich_text": { "equals": address }
    })
}
