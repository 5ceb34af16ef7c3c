// src/classifier/dataset.rs

use crate::domain::changes::ListingSnapshot;
use crate::notion::models::{
    BATHS, BEDS, GARAGE_SPACES, LIST_PRICE, LIVING_AREA, LOT_AREA, ZIP_CODE,
};
use crate::notion::StoredListing;
use tracing::warn;

/// Column order of every feature vector.
pub const FEATURE_NAMES: [&str; 7] = [
    LIST_PRICE,
    BEDS,
    BATHS,
    GARAGE_SPACES,
    LIVING_AREA,
    LOT_AREA,
    ZIP_CODE,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub address: String,
    pub features: Vec<f64>,
    pub label: bool,
}

/// `None` if any feature is empty in the store.
pub fn feature_vector(snapshot: &ListingSnapshot) -> Option<Vec<f64>> {
    [
        snapshot.list_price,
        snapshot.beds,
        snapshot.baths,
        snapshot.garage_spaces,
        snapshot.living_area,
        snapshot.lot_area,
        snapshot.zip_code,
    ]
    .into_iter()
    .collect()
}

/// Listings with a missing feature are left out, never filled in.
pub fn build_samples(listings: &[StoredListing]) -> Vec<Sample> {
    listings
        .iter()
        .filter_map(|listing| match feature_vector(&listing.snapshot) {
            Some(features) => Some(Sample {
                address: listing.snapshot.address.clone(),
                features,
                label: listing.like,
            }),
            None => {
                warn!(
                    page_id = %listing.page_id,
                    address = %listing.snapshot.address,
                    "Skipping listing with missing features"
                );
                None
            }
        })
        .collect()
}
