//! The network seam of the Backoff Client.
//!
//! `Transport` performs exactly one request and never retries. `HttpTransport`
//! is the reqwest-backed implementation used in production; tests substitute a
//! scripted transport so retry behaviour can be checked without a network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound call. Built once per logical request and reused for every attempt.
#[derive(Debug, Clone)]
pub struct RequestAttempt {
    pub method: Method,
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Applied to each attempt individually, not to the whole retry sequence.
    pub timeout: Duration,
}

impl RequestAttempt {
    pub fn get(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            endpoint: endpoint.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn post_json(endpoint: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: Method::Post,
            endpoint: endpoint.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            query: Vec::new(),
            body: Some(body),
            timeout,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Status and raw body of a completed HTTP exchange (any status code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The request never produced an HTTP status: refused connection, DNS failure, timeout,
/// or a body that could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{cause}")]
pub struct TransportFailure {
    pub cause: String,
}

impl TransportFailure {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &RequestAttempt)
        -> Result<TransportResponse, TransportFailure>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &RequestAttempt,
    ) -> Result<TransportResponse, TransportFailure> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &request.endpoint)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(describe)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(describe)?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

fn describe(e: reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        TransportFailure::new(format!("request timed out: {e}"))
    } else if e.is_connect() {
        TransportFailure::new(format!("connection failed: {e}"))
    } else {
        TransportFailure::new(e.to_string())
    }
}
