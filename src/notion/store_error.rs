use crate::request::RequestError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    Request(RequestError),
    InvalidCredentials(String),
    UnexpectedShape(String),
    DuplicateAddress {
        address: String,
        page_ids: Vec<String>,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Request(e) => write!(f, "Store request failed: {e}"),
            StoreError::InvalidCredentials(msg) => write!(f, "Invalid store credentials: {msg}"),
            StoreError::UnexpectedShape(msg) => write!(f, "Unexpected store response: {msg}"),
            StoreError::DuplicateAddress { address, page_ids } => write!(
                f,
                "{} pages share the address {address:?}: {}",
                page_ids.len(),
                page_ids.join(", ")
            ),
        }
    }
}

impl Error for StoreError {}

impl From<RequestError> for StoreError {
    fn from(e: RequestError) -> Self {
        StoreError::Request(e)
    }
}
