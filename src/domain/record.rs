// src/domain/record.rs

use crate::domain::address::ParsedAddress;
use serde::Serialize;

/// Separator used when amenity notes are flattened into one string.
pub const NOTES_SEPARATOR: char = ';';

/// One listing, flattened and normalized. Every field is always present:
/// numbers start at zero and text at the empty string, and extraction only
/// ever overwrites them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeatureRecord {
    pub link: Option<String>,

    // Address (reconciliation key plus its parsed parts)
    pub address: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    pub list_price: f64,
    pub beds: u32,
    pub baths_full: u32,
    pub baths_half: u32,
    pub garage_spaces: u32,
    /// Square feet.
    pub living_area: f64,
    /// Square feet.
    pub lot_area: f64,
    pub year_built: u32,

    pub property_description: String,
    /// Amenity strings no structured pattern claimed, in page order.
    pub raw_feature_notes: Vec<String>,
}

/// A single structured value recognised in an amenity string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureFragment {
    Beds(u32),
    BathsFull(u32),
    BathsHalf(u32),
    GarageSpaces(u32),
    LivingArea(f64),
    LotArea(f64),
    YearBuilt(u32),
}

impl FeatureRecord {
    /// Combined bath count: half baths count as 0.5.
    pub fn baths(&self) -> f64 {
        self.baths_full as f64 + 0.5 * self.baths_half as f64
    }

    pub fn notes_joined(&self) -> String {
        self.raw_feature_notes
            .join(&NOTES_SEPARATOR.to_string())
    }

    /// Later fragments win over earlier ones.
    pub fn apply(&mut self, fragment: FeatureFragment) {
        match fragment {
            FeatureFragment::Beds(v) => self.beds = v,
            FeatureFragment::BathsFull(v) => self.baths_full = v,
            FeatureFragment::BathsHalf(v) => self.baths_half = v,
            FeatureFragment::GarageSpaces(v) => self.garage_spaces = v,
            FeatureFragment::LivingArea(v) => self.living_area = v,
            FeatureFragment::LotArea(v) => self.lot_area = v,
            FeatureFragment::YearBuilt(v) => self.year_built = v,
        }
    }

    pub fn apply_address(&mut self, full: &str, parsed: &ParsedAddress) {
        self.address = full.to_string();
        self.street_address = parsed.street_address();
        self.city = parsed.city.clone();
        self.state = parsed.state.clone();
        self.zip_code = parsed.zip_code.clone();
    }
}
