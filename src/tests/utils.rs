use crate::notion::models::{text_value, Block, Page, ADDRESS};
use crate::notion::{StoreApi, StoreError};
use crate::request::RequestError;
use crate::scraper::fetcher::PageSource;
use crate::scraper::ScraperError;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

pub const SEARCH_HTML: &str = include_str!("fixtures/search.html");
pub const WILLOW_HTML: &str = include_str!("fixtures/listing_willow.html");
pub const RIDGE_HTML: &str = include_str!("fixtures/listing_ridge.html");
pub const ALMADEN_HTML: &str = include_str!("fixtures/listing_almaden.html");

pub const BASE_URL: &str = "https://www.trulia.com";
pub const SEARCH_URL: &str = "https://www.trulia.com/for_sale/test_query/";
pub const WILLOW_URL: &str =
    "https://www.trulia.com/p/ca/san-jose/1234-willow-st-san-jose-ca-95125--1001";
pub const RIDGE_URL: &str = "https://www.trulia.com/p/ca/san-jose/lot-7-ridge-rd-san-jose-ca--1002";
pub const ALMADEN_URL: &str =
    "https://www.trulia.com/p/ca/san-jose/88-almaden-way-san-jose-ca-95118--1003";

/// Canned pages keyed by URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl FakePages {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// The search page plus all three listing pages.
    pub fn site() -> Self {
        Self::default()
            .with(SEARCH_URL, SEARCH_HTML)
            .with(WILLOW_URL, WILLOW_HTML)
            .with(RIDGE_URL, RIDGE_HTML)
            .with(ALMADEN_URL, ALMADEN_HTML)
    }
}

impl PageSource for FakePages {
    fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        self.requested.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| {
            ScraperError::Network(RequestError::ApiError {
                status: 404,
                url: url.to_string(),
                body: "Not Found".to_string(),
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RetrieveDatabase,
    Query,
    RetrievePage(String),
    CreatePage,
    UpdateProperties(String),
    ListBlocks(String),
    DeleteBlock(String),
    AppendBlocks(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreatePage | Call::UpdateProperties(_) | Call::DeleteBlock(_) | Call::AppendBlocks(_)
        )
    }
}

#[derive(Default)]
struct FakeState {
    pages: Vec<Page>,
    blocks: HashMap<String, Vec<(String, Value)>>,
    calls: Vec<Call>,
    next_id: usize,
}

impl FakeState {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    /// Nested `children` become blocks of their own, as the API stores them.
    fn append(&mut self, parent_id: &str, children: &[Value]) {
        for child in children {
            let id = self.fresh_id("block");
            self.blocks
                .entry(parent_id.to_string())
                .or_default()
                .push((id.clone(), child.clone()));

            let kind = child["type"].as_str().unwrap_or_default();
            if let Some(nested) = child[kind]["children"].as_array() {
                self.append(&id, nested);
            }
        }
    }
}

/// In-memory database that behaves like the hosted API for the calls the
/// store makes, and records every call.
#[derive(Default)]
pub struct FakeStore {
    state: RefCell<FakeState>,
}

impl FakeStore {
    /// Inserts a page directly, bypassing the call log.
    pub fn seed(&self, properties: Map<String, Value>) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.fresh_id("page");
        state.pages.push(Page {
            id: id.clone(),
            properties,
        });
        id
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn page_count(&self) -> usize {
        self.state.borrow().pages.len()
    }

    pub fn page(&self, page_id: &str) -> Option<Page> {
        self.state
            .borrow()
            .pages
            .iter()
            .find(|p| p.id == page_id)
            .cloned()
    }

    pub fn children(&self, page_id: &str) -> Vec<Value> {
        self.state
            .borrow()
            .blocks
            .get(page_id)
            .map(|blocks| blocks.iter().map(|(_, v)| v.clone()).collect())
            .unwrap_or_default()
    }

    fn log(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn not_found(what: &str) -> StoreError {
    StoreError::Request(RequestError::ApiError {
        status: 404,
        url: what.to_string(),
        body: "object_not_found".to_string(),
    })
}

impl StoreApi for FakeStore {
    fn retrieve_database(&self, database_id: &str) -> Result<Value, StoreError> {
        self.log(Call::RetrieveDatabase);
        Ok(json!({ "object": "database", "id": database_id }))
    }

    fn query_database(
        &self,
        _database_id: &str,
        filter: Option<Value>,
    ) -> Result<Vec<Page>, StoreError> {
        self.log(Call::Query);
        let wanted = filter
            .as_ref()
            .and_then(|f| f["rich_text"]["equals"].as_str().map(str::to_string));

        Ok(self
            .state
            .borrow()
            .pages
            .iter()
            .filter(|p| match &wanted {
                Some(address) => text_value(&p.properties, ADDRESS) == *address,
                None => true,
            })
            .cloned()
            .collect())
    }

    fn retrieve_page(&self, page_id: &str) -> Result<Page, StoreError> {
        self.log(Call::RetrievePage(page_id.to_string()));
        self.page(page_id).ok_or_else(|| not_found(page_id))
    }

    fn create_page(&self, body: &Value) -> Result<Page, StoreError> {
        self.log(Call::CreatePage);
        let properties = body["properties"]
            .as_object()
            .cloned()
            .ok_or_else(|| StoreError::UnexpectedShape("page body without properties".into()))?;

        let id = self.seed(properties);
        if let Some(children) = body["children"].as_array() {
            self.state.borrow_mut().append(&id, children);
        }
        self.page(&id).ok_or_else(|| not_found(&id))
    }

    fn update_page_properties(
        &self,
        page_id: &str,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.log(Call::UpdateProperties(page_id.to_string()));
        let mut state = self.state.borrow_mut();
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| not_found(page_id))?;
        for (name, value) in properties {
            page.properties.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, StoreError> {
        self.log(Call::ListBlocks(block_id.to_string()));
        let state = self.state.borrow();
        let Some(blocks) = state.blocks.get(block_id) else {
            return Ok(Vec::new());
        };

        blocks
            .iter()
            .map(|(id, v)| {
                let mut block = v.clone();
                block["id"] = json!(id);
                block["has_children"] = json!(state.blocks.get(id).is_some_and(|c| !c.is_empty()));
                serde_json::from_value::<Block>(block)
                    .map_err(|e| StoreError::UnexpectedShape(e.to_string()))
            })
            .collect()
    }

    fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        self.log(Call::DeleteBlock(block_id.to_string()));
        let mut state = self.state.borrow_mut();
        for blocks in state.blocks.values_mut() {
            blocks.retain(|(id, _)| id != block_id);
        }
        Ok(())
    }

    fn append_block_children(&self, block_id: &str, children: &[Value]) -> Result<(), StoreError> {
        self.log(Call::AppendBlocks(block_id.to_string()));
        self.state.borrow_mut().append(block_id, children);
        Ok(())
    }
}

/// One-shot HTTP responder on a loopback port. Each canned response answers
/// one connection, in order; the join handle yields the raw requests seen.
pub fn serve_responses(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            seen.push(read_request(&mut stream));

            let reply = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        seen
    });

    (base_url, handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
    let body_len = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while raw.len() < header_end + body_len {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&raw).into_owned()
}
