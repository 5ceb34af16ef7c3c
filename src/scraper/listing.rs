// src/scraper/listing.rs

use crate::domain::{AddressGrammar, FeatureRecord};
use crate::scraper::features::{summarize_amenities, AmenityParser, FeatureTable};
use crate::scraper::models::ProductSchema;
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

const PRICE: &str = r#"h3[data-testid="on-market-price-details"]"#;
const PRODUCT_SCHEMA: &str = r#"script[data-testid="hdp-seo-product-schema"]"#;
const AMENITY: &str = r#"span[class*="Feature__FeatureListItem"]"#;

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// `"$1,250,000"` -> `1250000.0`
pub fn parse_price(text: &str) -> Result<f64, ScraperError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ScraperError::InvalidNumber {
            field: "list price",
            value: text.trim().to_string(),
        }),
    }
}

/// Parses a single listing page into a `FeatureRecord`.
pub struct ListingExtractor {
    price: Selector,
    schema: Selector,
    amenity: Selector,
    address: AddressGrammar,
    amenities: Box<dyn AmenityParser>,
}

impl ListingExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        let table = FeatureTable::new().map_err(|e| ScraperError::HtmlParse(e.to_string()))?;
        Self::with_amenity_parser(Box::new(table))
    }

    pub fn with_amenity_parser(amenities: Box<dyn AmenityParser>) -> Result<Self, ScraperError> {
        Ok(Self {
            price: selector(PRICE)?,
            schema: selector(PRODUCT_SCHEMA)?,
            amenity: selector(AMENITY)?,
            address: AddressGrammar::new().map_err(|e| ScraperError::HtmlParse(e.to_string()))?,
            amenities,
        })
    }

    pub fn extract(&self, document: &Html, link: Option<&str>) -> Result<FeatureRecord, ScraperError> {
        info!(link = link.unwrap_or("<local>"), "Parsing listing");

        // Price
        let price_el = document
            .select(&self.price)
            .next()
            .ok_or(ScraperError::MissingElement("price element"))?;
        let list_price = parse_price(&element_text(price_el))?;

        // Address and description
        let schema_el = document
            .select(&self.schema)
            .next()
            .ok_or(ScraperError::MissingElement("product schema script"))?;
        let schema: ProductSchema = serde_json::from_str(&element_text(schema_el))
            .map_err(|e| ScraperError::JsonParse(e.to_string()))?;

        let address = schema
            .name
            .ok_or(ScraperError::MissingElement("listing address"))?;
        let parsed = self
            .address
            .parse(&address)
            .ok_or_else(|| ScraperError::AddressMismatch(address.clone()))?;

        // Amenities
        let summary = summarize_amenities(
            self.amenities.as_ref(),
            document.select(&self.amenity).map(element_text),
        );

        let mut record = FeatureRecord {
            link: link.map(str::to_string),
            ..Default::default()
        };
        record.list_price = list_price;
        record.apply_address(&address, &parsed);
        record.property_description = schema.description.unwrap_or_default();
        for fragment in summary.fragments {
            record.apply(fragment);
        }
        record.raw_feature_notes = summary.notes;

        Ok(record)
    }
}
