// src/notion/client.rs

use crate::config::Config;
use crate::notion::models::{Block, ListResponse, Page};
use crate::notion::StoreError;
use crate::request::{Pacing, RequestClient};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

/// The slice of the hosted database's REST surface the pipeline uses.
pub trait StoreApi {
    fn retrieve_database(&self, database_id: &str) -> Result<Value, StoreError>;

    /// All pages matching `filter`, across every result page.
    fn query_database(&self, database_id: &str, filter: Option<Value>)
        -> Result<Vec<Page>, StoreError>;

    fn retrieve_page(&self, page_id: &str) -> Result<Page, StoreError>;

    fn create_page(&self, body: &Value) -> Result<Page, StoreError>;

    fn update_page_properties(
        &self,
        page_id: &str,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError>;

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, StoreError>;

    fn delete_block(&self, block_id: &str) -> Result<(), StoreError>;

    fn append_block_children(&self, block_id: &str, children: &[Value]) -> Result<(), StoreError>;
}

pub struct NotionClient {
    http: RequestClient,
    base_url: String,
}

impl NotionClient {
    pub fn new(cfg: &Config) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", cfg.notion_api_token))
            .map_err(|e| StoreError::InvalidCredentials(e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("notion-version"),
            HeaderValue::from_str(&cfg.notion_version)
                .map_err(|e| StoreError::InvalidCredentials(e.to_string()))?,
        );

        let http = RequestClient::new(cfg.request_timeout, cfg.delay_secs.clone())?
            .with_headers(headers);

        Ok(Self {
            http,
            base_url: cfg.notion_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, StoreError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%method, url = %url, "Store call");
        let resp = self.http.request(method, &url, body, Pacing::Immediate)?;
        resp.json::<T>()
            .map_err(|e| StoreError::UnexpectedShape(format!("{path}: {e}")))
    }
}

impl StoreApi for NotionClient {
    fn retrieve_database(&self, database_id: &str) -> Result<Value, StoreError> {
        self.send(Method::GET, &format!("databases/{database_id}"), None)
    }

    fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<Vec<Page>, StoreError> {
        let path = format!("databases/{database_id}/query");
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = Map::new();
            if let Some(filter) = &filter {
                body.insert("filter".into(), filter.clone());
            }
            if let Some(c) = &cursor {
                body.insert("start_cursor".into(), json!(c));
            }

            let batch: ListResponse<Page> =
                self.send(Method::POST, &path, Some(&Value::Object(body)))?;
            pages.extend(batch.results);

            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }

    fn retrieve_page(&self, page_id: &str) -> Result<Page, StoreError> {
        self.send(Method::GET, &format!("pages/{page_id}"), None)
    }

    fn create_page(&self, body: &Value) -> Result<Page, StoreError> {
        self.send(Method::POST, "pages", Some(body))
    }

    fn update_page_properties(
        &self,
        page_id: &str,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let body = json!({ "properties": properties });
        let _: Value = self.send(Method::PATCH, &format!("pages/{page_id}"), Some(&body))?;
        Ok(())
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, StoreError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let path = match &cursor {
                Some(c) => format!("blocks/{block_id}/children?page_size=100&start_cursor={c}"),
                None => format!("blocks/{block_id}/children?page_size=100"),
            };
            let batch: ListResponse<Block> = self.send(Method::GET, &path, None)?;
            blocks.extend(batch.results);

            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }

    fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let _: Value = self.send(Method::DELETE, &format!("blocks/{block_id}"), None)?;
        Ok(())
    }

    fn append_block_children(&self, block_id: &str, children: &[Value]) -> Result<(), StoreError> {
        let body = json!({ "children": children });
        let _: Value = self.send(
            Method::PATCH,
            &format!("blocks/{block_id}/children"),
            Some(&body),
        )?;
        Ok(())
    }
}
