// src/classifier/classify.rs

use crate::classifier::dataset::build_samples;
use crate::classifier::model::ModelArtifact;
use crate::classifier::ClassifierError;
use crate::notion::{RemoteStore, StoreApi, StoreError, StoredListing};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Predicts every stored listing, keyed by address.
pub fn classify(
    artifact: &ModelArtifact,
    listings: &[StoredListing],
) -> Result<BTreeMap<String, bool>, ClassifierError> {
    let samples = build_samples(listings);
    info!(count = samples.len(), "Predicting listings");

    let rows: Vec<Vec<f64>> = samples.iter().map(|s| s.features.clone()).collect();
    let predictions = artifact.predict(&rows)?;

    Ok(samples
        .into_iter()
        .map(|s| s.address)
        .zip(predictions)
        .collect())
}

/// How many listings get a prediction different from the one stored, counting
/// listings that had none.
pub fn changed_predictions(listings: &[StoredListing], predictions: &BTreeMap<String, bool>) -> usize {
    listings
        .iter()
        .filter(|l| {
            predictions
                .get(&l.snapshot.address)
                .is_some_and(|p| l.prediction != Some(*p))
        })
        .count()
}

#[derive(Debug, Default)]
pub struct PushSummary {
    pub updated: usize,
    pub missing: Vec<String>,
    pub failed: Vec<(String, StoreError)>,
}

/// Writes each prediction to the page with the matching address. A failure
/// on one address is recorded and the rest still get written.
pub fn push_classifications<A: StoreApi>(
    store: &RemoteStore<A>,
    predictions: &BTreeMap<String, bool>,
) -> PushSummary {
    info!(count = predictions.len(), "Pushing predictions to the store");
    let mut summary = PushSummary::default();

    for (address, prediction) in predictions {
        match store.set_prediction(address, *prediction) {
            Ok(true) => summary.updated += 1,
            Ok(false) => {
                warn!(address = %address, "No page for predicted listing");
                summary.missing.push(address.clone());
            }
            Err(e) => {
                warn!(address = %address, error = %e, "Failed to write prediction");
                summary.failed.push((address.clone(), e));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::changes::ListingSnapshot;

    fn stored(address: &str, prediction: Option<bool>) -> StoredListing {
        StoredListing {
            page_id: format!("page-{address}"),
            snapshot: ListingSnapshot {
                address: address.to_string(),
                ..Default::default()
            },
            like: false,
            prediction,
        }
    }

    #[test]
    fn counts_new_and_flipped_predictions() {
        let listings = vec![
            stored("a", Some(true)),
            stored("b", Some(true)),
            stored("c", None),
            stored("d", Some(false)),
        ];
        let predictions: BTreeMap<String, bool> =
            [("a", true), ("b", false), ("c", false)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();

        assert_eq!(changed_predictions(&listings, &predictions), 2);
    }
}
