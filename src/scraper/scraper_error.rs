use crate::request::RequestError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScraperError {
    Network(RequestError),
    HtmlParse(String),
    MissingElement(&'static str),
    JsonParse(String),
    AddressMismatch(String),
    InvalidNumber { field: &'static str, value: String },
    Io(String),
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScraperError::Network(e) => write!(f, "Network error: {e}"),
            ScraperError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            ScraperError::MissingElement(what) => write!(f, "{what} not found"),
            ScraperError::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            ScraperError::AddressMismatch(addr) => {
                write!(f, "Address does not match expected format: {addr:?}")
            }
            ScraperError::InvalidNumber { field, value } => {
                write!(f, "Could not parse {field} from {value:?}")
            }
            ScraperError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl Error for ScraperError {}

impl From<RequestError> for ScraperError {
    fn from(e: RequestError) -> Self {
        ScraperError::Network(e)
    }
}
