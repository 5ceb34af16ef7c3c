// src/domain/changes.rs

use crate::domain::record::{FeatureRecord, NOTES_SEPARATOR};

/// The scalar values a listing carries in the remote store. Built either from
/// a freshly extracted record or from a stored page, so the two can be compared.
/// Numbers are optional because the store allows empty number properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingSnapshot {
    pub link: Option<String>,
    pub address: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<f64>,
    pub list_price: Option<f64>,
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub garage_spaces: Option<f64>,
    pub living_area: Option<f64>,
    pub lot_area: Option<f64>,
    pub year_built: Option<f64>,
}

/// A single difference between the stored and the new value of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub field_name: String,
    pub previous_value: Option<String>,
    pub current_value: String,
}

impl ListingSnapshot {
    pub fn from_record(record: &FeatureRecord) -> Self {
        Self {
            link: record.link.clone().filter(|l| !l.is_empty()),
            address: record.address.clone(),
            street_address: record.street_address.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            zip_code: record.zip_code.parse::<u32>().ok().map(f64::from),
            list_price: Some(record.list_price),
            beds: Some(record.beds as f64),
            baths: Some(record.baths()),
            garage_spaces: Some(record.garage_spaces as f64),
            living_area: Some(record.living_area),
            lot_area: Some(record.lot_area),
            year_built: Some(record.year_built as f64),
        }
    }

    /// Compares the stored state with a newly extracted one and lists every
    /// field that differs.
    pub fn diff(&self, new: &ListingSnapshot) -> Vec<PropertyChange> {
        let mut changes = Vec::new();

        // Plain fields always have a value; optional ones render None as "".
        macro_rules! compare_plain {
            ($field:ident) => {
                if self.$field != new.$field {
                    changes.push(PropertyChange {
                        field_name: stringify!($field).to_string(),
                        previous_value: Some(self.$field.to_string()),
                        current_value: new.$field.to_string(),
                    });
                }
            };
        }

        macro_rules! compare_optional {
            ($field:ident) => {
                if self.$field != new.$field {
                    changes.push(PropertyChange {
                        field_name: stringify!($field).to_string(),
                        previous_value: self.$field.as_ref().map(|v| v.to_string()),
                        current_value: new
                            .$field
                            .as_ref()
                            .map(|v| v.to_string())
                            .unwrap_or_default(),
                    });
                }
            };
        }

        compare_optional!(link);
        compare_plain!(address);
        compare_plain!(street_address);
        compare_plain!(city);
        compare_plain!(state);
        compare_optional!(zip_code);
        compare_optional!(list_price);
        compare_optional!(beds);
        compare_optional!(baths);
        compare_optional!(garage_spaces);
        compare_optional!(living_area);
        compare_optional!(lot_area);
        compare_optional!(year_built);

        changes
    }
}

/// The free-text body of a listing page: the description paragraph and the
/// amenity notes list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingContent {
    pub description: String,
    pub notes: Vec<String>,
}

impl ListingContent {
    /// Blank notes are never written to the page, so they are left out here too.
    pub fn from_record(record: &FeatureRecord) -> Self {
        Self {
            description: record.property_description.clone(),
            notes: record
                .raw_feature_notes
                .iter()
                .filter(|n| !n.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn diff(&self, new: &ListingContent) -> Vec<PropertyChange> {
        let mut changes = Vec::new();
        if self.description != new.description {
            changes.push(PropertyChange {
                field_name: "property_description".to_string(),
                previous_value: Some(self.description.clone()),
                current_value: new.description.clone(),
            });
        }
        if self.notes != new.notes {
            let sep = NOTES_SEPARATOR.to_string();
            changes.push(PropertyChange {
                field_name: "raw_feature_notes".to_string(),
                previous_value: Some(self.notes.join(&sep)),
                current_value: new.notes.join(&sep),
            });
        }
        changes
    }
}
