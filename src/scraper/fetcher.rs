// src/scraper/fetcher.rs

use crate::request::{Pacing, RequestClient};
use crate::scraper::ScraperError;
use scraper::Html;
use std::path::PathBuf;
use tracing::info;

/// Where a document comes from: the network, or a file saved earlier for
/// offline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Remote(String),
    Local(PathBuf),
}

/// Raw page retrieval. The production implementation goes through the
/// randomized request client; tests substitute canned pages.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String, ScraperError>;
}

impl PageSource for RequestClient {
    fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self.get(url, Pacing::Delayed)?;
        resp.text()
            .map_err(|e| ScraperError::HtmlParse(format!("Failed to read body of {url}: {e}")))
    }
}

pub struct DocumentFetcher<S: PageSource> {
    source: S,
}

impl<S: PageSource> DocumentFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn fetch(&self, target: &DocumentSource) -> Result<Html, ScraperError> {
        let text = match target {
            DocumentSource::Local(path) => {
                info!(path = %path.display(), "Reading local document");
                std::fs::read_to_string(path).map_err(|e| {
                    ScraperError::Io(format!("Failed to read {}: {e}", path.display()))
                })?
            }
            DocumentSource::Remote(url) => {
                info!(url = %url, "Retrieving document");
                self.source.fetch_page(url)?
            }
        };
        parse_html(&text)
    }

    pub fn fetch_url(&self, url: &str) -> Result<Html, ScraperError> {
        self.fetch(&DocumentSource::Remote(url.to_string()))
    }
}

/// html5ever recovers from almost anything, so the only body rejected here
/// is one with no markup at all.
pub fn parse_html(text: &str) -> Result<Html, ScraperError> {
    if !text.contains('<') {
        return Err(ScraperError::HtmlParse("document contains no markup".into()));
    }
    Ok(Html::parse_document(text))
}
