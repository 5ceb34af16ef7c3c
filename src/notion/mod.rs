pub mod client;
pub mod models;
pub mod payload;
mod store;
mod store_error;

pub use client::{NotionClient, StoreApi};
pub use models::StoredListing;
pub use store::{RemoteStore, UpdatePolicy, UpsertOutcome};
pub use store_error::StoreError;
