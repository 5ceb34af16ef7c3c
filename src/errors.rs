// errors.rs
use crate::classifier::ClassifierError;
use crate::notion::StoreError;
use crate::scraper::ScraperError;
use std::fmt;

/// Errors that end a command. Per-listing failures never get this far;
/// they are collected in the batch report instead.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Scraper(ScraperError),
    Store(StoreError),
    Classifier(ClassifierError),
    XlsxError(String),
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::Scraper(e) => write!(f, "Scraper error: {e}"),
            AppError::Store(e) => write!(f, "Store error: {e}"),
            AppError::Classifier(e) => write!(f, "Classifier error: {e}"),
            AppError::XlsxError(msg) => write!(f, "Spreadsheet error: {msg}"),
            AppError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ScraperError> for AppError {
    fn from(e: ScraperError) -> Self {
        AppError::Scraper(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<ClassifierError> for AppError {
    fn from(e: ClassifierError) -> Self {
        AppError::Classifier(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}
