// scraper.rs
use crate::domain::FeatureRecord;
use crate::scraper::fetcher::{DocumentFetcher, DocumentSource, PageSource};
use crate::scraper::links::LinkExtractor;
use crate::scraper::listing::ListingExtractor;
use crate::scraper::ScraperError;
use tracing::{info, warn};
use url::Url;

/// What happened to one listing link.
#[derive(Debug)]
pub struct ListingOutcome {
    pub link: String,
    pub result: Result<FeatureRecord, ScraperError>,
}

/// Every link attempted in a batch, in link order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ListingOutcome>,
}

impl BatchReport {
    pub fn records(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ScraperError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.link.as_str(), e)))
    }

    pub fn into_records(self) -> Vec<FeatureRecord> {
        self.outcomes.into_iter().filter_map(|o| o.result.ok()).collect()
    }
}

/// Search page -> listing links -> one feature record per listing.
pub struct ListingCollector<S: PageSource> {
    fetcher: DocumentFetcher<S>,
    links: LinkExtractor,
    extractor: ListingExtractor,
    base_url: Url,
}

impl<S: PageSource> ListingCollector<S> {
    pub fn new(source: S, base_url: Url) -> Result<Self, ScraperError> {
        Ok(Self {
            fetcher: DocumentFetcher::new(source),
            links: LinkExtractor::new()?,
            extractor: ListingExtractor::new()?,
            base_url,
        })
    }

    /// Fails only if the search page itself cannot be loaded. A listing that
    /// fails to fetch or parse is recorded in the report and skipped.
    pub fn collect(
        &self,
        query: &DocumentSource,
        max_count: usize,
    ) -> Result<BatchReport, ScraperError> {
        let search = self.fetcher.fetch(query)?;

        let links: Vec<String> = self
            .links
            .extract_links(&search, &self.base_url)
            .take(max_count)
            .collect();
        info!(count = links.len(), max_count, "Got listing links");

        let mut report = BatchReport::default();
        for link in links {
            let result = self
                .fetcher
                .fetch_url(&link)
                .and_then(|doc| self.extractor.extract(&doc, Some(&link)));

            if let Err(e) = &result {
                warn!(link = %link, error = %e, "Skipping listing");
            }
            report.outcomes.push(ListingOutcome { link, result });
        }

        info!(
            extracted = report.records().count(),
            skipped = report.failures().count(),
            "Listing batch finished"
        );
        Ok(report)
    }
}
