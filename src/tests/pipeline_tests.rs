// src/tests/pipeline_tests.rs

use super::utils::*;
use crate::scraper::{DocumentSource, ListingCollector, ScraperError};
use url::Url;

fn collector(pages: FakePages) -> ListingCollector<FakePages> {
    ListingCollector::new(pages, Url::parse(BASE_URL).unwrap()).unwrap()
}

fn search() -> DocumentSource {
    DocumentSource::Remote(SEARCH_URL.to_string())
}

#[test]
fn failing_listing_is_skipped_and_order_kept() {
    let report = collector(FakePages::site()).collect(&search(), 10).unwrap();

    assert_eq!(report.outcomes.len(), 3);
    let links: Vec<&str> = report.outcomes.iter().map(|o| o.link.as_str()).collect();
    assert_eq!(links, vec![WILLOW_URL, RIDGE_URL, ALMADEN_URL]);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, RIDGE_URL);
    assert!(matches!(failures[0].1, ScraperError::AddressMismatch(_)));

    let records = report.into_records();
    let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec![
            "1234 Willow St, San Jose, CA 95125",
            "88 Almaden Way, San Jose, CA 95118"
        ]
    );
}

#[test]
fn extracted_record_carries_every_feature() {
    let report = collector(FakePages::site()).collect(&search(), 1).unwrap();
    let records = report.into_records();
    assert_eq!(records.len(), 1);

    let willow = &records[0];
    assert_eq!(willow.link.as_deref(), Some(WILLOW_URL));
    assert_eq!(willow.street_address, "1234 Willow St");
    assert_eq!(willow.city, "San Jose");
    assert_eq!(willow.state, "CA");
    assert_eq!(willow.zip_code, "95125");
    assert_eq!(willow.list_price, 1_249_000.0);
    assert_eq!(willow.beds, 3);
    assert_eq!(willow.baths_full, 2);
    assert_eq!(willow.baths_half, 1);
    assert_eq!(willow.baths(), 2.5);
    assert_eq!(willow.living_area, 1850.0);
    assert_eq!(willow.lot_area, 6098.0);
    assert_eq!(willow.garage_spaces, 2);
    assert_eq!(willow.year_built, 1952);
    assert_eq!(willow.raw_feature_notes, vec!["Fireplace", "Central Air"]);
    assert!(willow.property_description.starts_with("Updated single story"));
}

#[test]
fn unrecognised_amenity_lands_in_notes() {
    let report = collector(FakePages::site()).collect(&search(), 10).unwrap();
    let almaden = report
        .records()
        .find(|r| r.city == "San Jose" && r.zip_code == "95118")
        .unwrap();

    assert_eq!(almaden.garage_spaces, 0);
    assert_eq!(almaden.baths_half, 0);
    assert_eq!(almaden.notes_joined(), "Attached Garage");
}

#[test]
fn max_count_limits_listing_requests() {
    let pages = FakePages::site();
    let collector = collector(pages);
    let report = collector.collect(&search(), 2).unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.records().count(), 1);
}

#[test]
fn unreachable_listing_is_a_network_failure() {
    let pages = FakePages::default()
        .with(SEARCH_URL, SEARCH_HTML)
        .with(ALMADEN_URL, ALMADEN_HTML);
    let report = collector(pages).collect(&search(), 10).unwrap();

    assert_eq!(report.records().count(), 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 2);
    assert!(failures
        .iter()
        .all(|(_, e)| matches!(e, ScraperError::Network(_))));
}

#[test]
fn unreachable_search_page_aborts_the_batch() {
    let err = collector(FakePages::default())
        .collect(&search(), 10)
        .unwrap_err();
    assert!(matches!(err, ScraperError::Network(_)));
}

#[test]
fn local_search_document_skips_the_query_request() {
    let path = std::env::temp_dir().join(format!(
        "listing_sync_search_{}.html",
        std::process::id()
    ));
    std::fs::write(&path, SEARCH_HTML).unwrap();

    let collector = collector(FakePages::site());
    let report = collector
        .collect(&DocumentSource::Local(path.clone()), 10)
        .unwrap();
    let _ = std::fs::remove_file(path);

    assert_eq!(report.records().count(), 2);
}
