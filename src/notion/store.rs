// src/notion/store.rs

use crate::domain::changes::{ListingContent, ListingSnapshot, PropertyChange};
use crate::domain::FeatureRecord;
use crate::notion::client::StoreApi;
use crate::notion::models::{snapshot_from_properties, Page, StoredListing, PREDICTION};
use crate::notion::payload::{
    address_filter, checkbox_property, listing_children, listing_properties, new_page_body,
};
use crate::notion::StoreError;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// When an existing page gets rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UpdatePolicy {
    /// Rewrite if any stored property, the description or the notes differ.
    #[default]
    AnyChange,
    /// Rewrite only if the stored listing price differs.
    PriceChange,
    /// Always rewrite.
    Always,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created {
        page_id: String,
    },
    Updated {
        page_id: String,
        changes: Vec<PropertyChange>,
    },
    Unchanged {
        page_id: String,
    },
}

/// Keeps one page per listing address in the remote database.
pub struct RemoteStore<A: StoreApi> {
    api: A,
    database_id: String,
    policy: UpdatePolicy,
}

impl<A: StoreApi> RemoteStore<A> {
    pub fn new(api: A, database_id: impl Into<String>) -> Self {
        Self {
            api,
            database_id: database_id.into(),
            policy: UpdatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Checks the database is reachable with the configured credentials.
    pub fn verify(&self) -> Result<(), StoreError> {
        self.api.retrieve_database(&self.database_id)?;
        Ok(())
    }

    /// Addresses are unique in the database. Several matches are reported
    /// as an error rather than picking one.
    pub fn find_by_address(&self, address: &str) -> Result<Option<Page>, StoreError> {
        let mut pages = self
            .api
            .query_database(&self.database_id, Some(address_filter(address)))?;

        match pages.len() {
            0 => Ok(None),
            1 => Ok(pages.pop()),
            _ => Err(StoreError::DuplicateAddress {
                address: address.to_string(),
                page_ids: pages.into_iter().map(|p| p.id).collect(),
            }),
        }
    }

    pub fn upsert(&self, record: &FeatureRecord) -> Result<UpsertOutcome, StoreError> {
        match self.find_by_address(&record.address)? {
            Some(page) => {
                info!(page_id = %page.id, address = %record.address, "Found existing listing");
                self.update(&page.id, record)
            }
            None => {
                info!(
                    link = record.link.as_deref().unwrap_or(""),
                    address = %record.address,
                    "Creating new listing"
                );
                let page_id = self.create(record)?;
                Ok(UpsertOutcome::Created { page_id })
            }
        }
    }

    pub fn create(&self, record: &FeatureRecord) -> Result<String, StoreError> {
        let page = self
            .api
            .create_page(&new_page_body(&self.database_id, record))?;
        Ok(page.id)
    }

    /// Rewrites an existing page according to the update policy: scalar
    /// properties in place, then every content block replaced.
    pub fn update(&self, page_id: &str, record: &FeatureRecord) -> Result<UpsertOutcome, StoreError> {
        let stored = self.api.retrieve_page(page_id)?;
        let before = snapshot_from_properties(&stored.properties);
        let after = ListingSnapshot::from_record(record);
        let mut changes = before.diff(&after);
        if self.policy == UpdatePolicy::AnyChange {
            let stored_content = self.read_content(page_id)?;
            changes.extend(stored_content.diff(&ListingContent::from_record(record)));
        }

        let unchanged = match self.policy {
            UpdatePolicy::AnyChange => changes.is_empty(),
            UpdatePolicy::PriceChange => before.list_price == after.list_price,
            UpdatePolicy::Always => false,
        };
        if unchanged {
            info!(page_id, "Unchanged listing, won't update");
            return Ok(UpsertOutcome::Unchanged {
                page_id: page_id.to_string(),
            });
        }

        for change in &changes {
            debug!(
                page_id,
                field = %change.field_name,
                previous = change.previous_value.as_deref().unwrap_or(""),
                current = %change.current_value,
                "Property changed"
            );
        }

        info!(page_id, "Updating page properties");
        self.api
            .update_page_properties(page_id, &listing_properties(&after))?;

        self.replace_content(page_id, &listing_children(record))?;

        Ok(UpsertOutcome::Updated {
            page_id: page_id.to_string(),
            changes,
        })
    }

    /// Reads back the description paragraph and the notes nested under the
    /// list block.
    pub fn read_content(&self, page_id: &str) -> Result<ListingContent, StoreError> {
        let mut content = ListingContent::default();
        for block in self.api.list_block_children(page_id)? {
            match block.kind.as_str() {
                "paragraph" => content.description.push_str(&block.plain_text()),
                "bulleted_list_item" if block.has_children => {
                    for item in self.api.list_block_children(&block.id)? {
                        let note = item.plain_text();
                        if !note.trim().is_empty() {
                            content.notes.push(note);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(content)
    }

    /// Deletes every child block of the page and appends `children` in their place.
    pub fn replace_content(&self, page_id: &str, children: &[Value]) -> Result<(), StoreError> {
        info!(page_id, "Deleting child blocks");
        for block in self.api.list_block_children(page_id)? {
            self.api.delete_block(&block.id)?;
        }

        info!(page_id, "Adding updated child blocks");
        self.api.append_block_children(page_id, children)
    }

    pub fn list_listings(&self) -> Result<Vec<StoredListing>, StoreError> {
        let pages = self.api.query_database(&self.database_id, None)?;
        Ok(pages.iter().map(StoredListing::from_page).collect())
    }

    /// Sets only the prediction checkbox. Returns false when no page has
    /// the address.
    pub fn set_prediction(&self, address: &str, prediction: bool) -> Result<bool, StoreError> {
        let Some(page) = self.find_by_address(address)? else {
            return Ok(false);
        };

        let mut properties = Map::new();
        properties.insert(PREDICTION.to_string(), checkbox_property(prediction));
        self.api.update_page_properties(&page.id, &properties)?;
        Ok(true)
    }
}
