use crate::errors::AppError;
use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;

const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
const DEFAULT_NOTION_VERSION: &str = "2022-02-22";
const DEFAULT_NOTION_DATABASE_ID: &str = "92ec2168f53d481d81baa34962bb3ea6";

const DEFAULT_LISTING_BASE_URL: &str = "https://www.trulia.com";
const DEFAULT_LISTING_QUERY_ENDPOINT: &str = "for_sale/37.31454,37.52585,-122.12055,-121.7992_xy/3p_beds/2p_baths/800000-1500000_price/1000p_sqft/SINGLE-FAMILY_HOME_type/date;d_sort/0.0459p_ls/0-200_hoa/12_zm/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DELAY_MIN_SECS: u64 = 1;
const DEFAULT_DELAY_MAX_SECS: u64 = 10;

/// Everything the pipeline needs to talk to the listing site and the remote store.
/// Built once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub notion_api_token: String,
    pub notion_base_url: String,
    pub notion_version: String,
    pub notion_database_id: String,

    pub listing_base_url: String,
    pub listing_query_endpoint: String,

    pub request_timeout: Duration,
    pub delay_secs: RangeInclusive<u64>,
}

impl Config {
    /// Defaults for every field, with the given store token.
    pub fn new(notion_api_token: impl Into<String>) -> Self {
        Self {
            notion_api_token: notion_api_token.into(),
            notion_base_url: DEFAULT_NOTION_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            notion_database_id: DEFAULT_NOTION_DATABASE_ID.to_string(),
            listing_base_url: DEFAULT_LISTING_BASE_URL.to_string(),
            listing_query_endpoint: DEFAULT_LISTING_QUERY_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay_secs: DEFAULT_DELAY_MIN_SECS..=DEFAULT_DELAY_MAX_SECS,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let token = env::var("NOTION_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("NOTION_API_TOKEN environment variable not set".into())
            })?;

        let mut cfg = Self::new(token);

        if let Some(v) = read_var("NOTION_BASE_URL") {
            cfg.notion_base_url = v;
        }
        if let Some(v) = read_var("NOTION_VERSION") {
            cfg.notion_version = v;
        }
        if let Some(v) = read_var("NOTION_DATABASE_ID") {
            cfg.notion_database_id = v;
        }
        if let Some(v) = read_var("LISTING_BASE_URL") {
            cfg.listing_base_url = v;
        }
        if let Some(v) = read_var("LISTING_QUERY_ENDPOINT") {
            cfg.listing_query_endpoint = v;
        }

        let timeout = parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        cfg.request_timeout = Duration::from_secs(timeout);

        let min = parse_var("REQUEST_DELAY_MIN_SECS", DEFAULT_DELAY_MIN_SECS)?;
        let max = parse_var("REQUEST_DELAY_MAX_SECS", DEFAULT_DELAY_MAX_SECS)?;
        if min > max {
            return Err(AppError::Config(format!(
                "REQUEST_DELAY_MIN_SECS ({min}) is greater than REQUEST_DELAY_MAX_SECS ({max})"
            )));
        }
        cfg.delay_secs = min..=max;

        Ok(cfg)
    }

    /// Full search-results URL for the fixed listing query.
    pub fn query_url(&self) -> String {
        format!(
            "{}/{}",
            self.listing_base_url.trim_end_matches('/'),
            self.listing_query_endpoint.trim_start_matches('/')
        )
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(name: &str, default: u64) -> Result<u64, AppError> {
    match read_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{name} must be a whole number: {e}"))),
        None => Ok(default),
    }
}
