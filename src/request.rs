// src/request.rs

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:77.0) Gecko/20100101 Firefox/77.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/83.0.4103.97 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:77.0) Gecko/20100101 Firefox/77.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/83.0.4103.97 Safari/537.36",
];

#[derive(Debug)]
pub enum RequestError {
    RequestFailed(String),
    ApiError {
        status: u16,
        url: String,
        body: String,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            RequestError::ApiError { status, url, body } => {
                write!(f, "HTTP {} from {}: {}", status, url, body)
            }
        }
    }
}

impl Error for RequestError {}

/// Whether to sleep a random interval before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Immediate,
    Delayed,
}

/// Blocking HTTP client that rotates its user agent on every call and can
/// wait a random number of seconds before a request goes out.
pub struct RequestClient {
    client: Client,
    user_agents: Vec<String>,
    delay_secs: RangeInclusive<u64>,
    headers: HeaderMap,
}

impl RequestClient {
    pub fn new(timeout: Duration, delay_secs: RangeInclusive<u64>) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            delay_secs,
            headers: HeaderMap::new(),
        })
    }

    /// Headers sent with every request, e.g. API credentials.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(USER_AGENTS[0])
    }

    pub fn pick_delay(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.delay_secs.clone());
        Duration::from_secs(secs)
    }

    pub fn get(&self, url: &str, pacing: Pacing) -> Result<Response, RequestError> {
        self.request(Method::GET, url, None, pacing)
    }

    /// Sends one request. Bodies are JSON encoded. Any non-2xx status is an
    /// `ApiError` carrying the response text; nothing is retried.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        pacing: Pacing,
    ) -> Result<Response, RequestError> {
        if pacing == Pacing::Delayed {
            let wait = self.pick_delay();
            debug!(?wait, url, "Waiting before request");
            std::thread::sleep(wait);
        }

        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(self.headers.clone())
            .header(USER_AGENT, self.pick_user_agent());

        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, url, "Sending request");
        let resp = builder
            .send()
            .map_err(|e| RequestError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(RequestError::ApiError {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(resp)
    }
}
