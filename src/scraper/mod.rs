pub mod features;
pub mod fetcher;
pub mod links;
pub mod listing;
mod models;
mod scraper;
mod scraper_error;

pub use fetcher::DocumentSource;
pub use self::scraper::ListingCollector;
pub use scraper_error::ScraperError;
