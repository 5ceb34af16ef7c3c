// src/scraper/links.rs

use crate::scraper::ScraperError;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Listing cards are found by their test id; class names on the site change
/// between deploys.
const LISTING_CARD_LINK: &str = r#"[data-testid="property-card-link"][href]"#;

pub struct LinkExtractor {
    card: Selector,
}

impl LinkExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        let card = Selector::parse(LISTING_CARD_LINK)
            .map_err(|e| ScraperError::HtmlParse(e.to_string()))?;
        Ok(Self { card })
    }

    /// Absolute listing URLs in document order. Duplicates are kept.
    pub fn extract_links<'a>(
        &'a self,
        document: &'a Html,
        base_url: &'a Url,
    ) -> impl Iterator<Item = String> + 'a {
        document
            .select(&self.card)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(move |href| match base_url.join(href) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    debug!(href, error = %e, "Skipping unresolvable listing link");
                    None
                }
            })
    }
}
