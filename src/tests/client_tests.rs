// src/tests/client_tests.rs

use super::utils::serve_responses;
use crate::config::Config;
use crate::notion::{NotionClient, StoreApi, StoreError};
use crate::request::{Pacing, RequestClient, RequestError, USER_AGENTS};
use serde_json::json;
use std::time::Duration;

fn config(base_url: &str) -> Config {
    let mut cfg = Config::new("secret-token");
    cfg.notion_base_url = base_url.to_string();
    cfg.request_timeout = Duration::from_secs(5);
    cfg.delay_secs = 0..=0;
    cfg
}

#[test]
fn query_follows_cursor_and_sends_credentials() {
    let (base, server) = serve_responses(vec![
        (
            200,
            json!({
                "object": "list",
                "results": [{ "object": "page", "id": "p1", "properties": {} }],
                "has_more": true,
                "next_cursor": "cursor-2"
            })
            .to_string(),
        ),
        (
            200,
            json!({
                "object": "list",
                "results": [{ "object": "page", "id": "p2", "properties": {} }],
                "has_more": false,
                "next_cursor": null
            })
            .to_string(),
        ),
    ]);

    let client = NotionClient::new(&config(&base)).unwrap();
    let pages = client
        .query_database("db-1", Some(json!({ "property": "Address" })))
        .unwrap();
    let requests = server.join().unwrap();

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(requests.len(), 2);

    let first = requests[0].to_lowercase();
    assert!(first.starts_with("post /databases/db-1/query "));
    assert!(first.contains("authorization: bearer secret-token"));
    assert!(first.contains("notion-version: 2022-02-22"));
    assert!(!requests[0].contains("start_cursor"));

    assert!(requests[1].contains(r#""start_cursor":"cursor-2""#));
    assert!(requests[1].contains(r#""filter":{"property":"Address"}"#));
}

#[test]
fn block_children_follow_cursor_and_carry_text() {
    let (base, server) = serve_responses(vec![
        (
            200,
            json!({
                "object": "list",
                "results": [{
                    "object": "block",
                    "id": "b1",
                    "type": "paragraph",
                    "has_children": false,
                    "paragraph": { "rich_text": [{ "type": "text", "plain_text": "Sunny." }] }
                }],
                "has_more": true,
                "next_cursor": "c2"
            })
            .to_string(),
        ),
        (
            200,
            json!({
                "object": "list",
                "results": [{
                    "object": "block",
                    "id": "b2",
                    "type": "bulleted_list_item",
                    "has_children": true,
                    "bulleted_list_item": { "rich_text": [] }
                }],
                "has_more": false,
                "next_cursor": null
            })
            .to_string(),
        ),
    ]);

    let client = NotionClient::new(&config(&base)).unwrap();
    let blocks = client.list_block_children("page-9").unwrap();
    let requests = server.join().unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, "paragraph");
    assert_eq!(blocks[0].plain_text(), "Sunny.");
    assert!(blocks[1].has_children);
    assert_eq!(blocks[1].plain_text(), "");

    assert!(requests[0].starts_with("GET /blocks/page-9/children?page_size=100 "));
    assert!(requests[1].starts_with("GET /blocks/page-9/children?page_size=100&start_cursor=c2 "));
}

#[test]
fn error_status_becomes_api_error_with_body() {
    let (base, server) = serve_responses(vec![(
        404,
        json!({ "object": "error", "code": "object_not_found" }).to_string(),
    )]);

    let client = NotionClient::new(&config(&base)).unwrap();
    let err = client.retrieve_page("missing").unwrap_err();
    server.join().unwrap();

    match err {
        StoreError::Request(RequestError::ApiError { status, url, body }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/pages/missing"));
            assert!(body.contains("object_not_found"));
        }
        other => panic!("expected an API error, got {other}"),
    }
}

#[test]
fn request_client_rotates_agent_and_rejects_server_errors() {
    let (base, server) = serve_responses(vec![
        (200, "{}".to_string()),
        (503, "busy".to_string()),
    ]);
    let client = RequestClient::new(Duration::from_secs(5), 0..=0).unwrap();

    let ok = client.get(&format!("{base}/search"), Pacing::Delayed).unwrap();
    assert_eq!(ok.status().as_u16(), 200);

    let err = client
        .get(&format!("{base}/listing"), Pacing::Immediate)
        .unwrap_err();
    let requests = server.join().unwrap();

    assert!(matches!(err, RequestError::ApiError { status: 503, ref body, .. } if body == "busy"));

    let first = requests[0].to_lowercase();
    assert!(USER_AGENTS
        .iter()
        .any(|ua| first.contains(&format!("user-agent: {}", ua.to_lowercase()))));
}
