//! HTTP transport for the harness
//!
//! Every service call goes through the [`Transport`] trait so flows can be
//! driven against the real platform ([`HttpTransport`]) or against a scripted
//! stand-in in tests. The transport never retries; a failed call is reported
//! once and the caller decides what to do with it.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Errors raised below the polling core: the call itself failed, the service
/// answered with a non-success status, or the body was not JSON.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),
    /// Service answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// Body could not be parsed as JSON
    #[error("Invalid JSON response (HTTP {status}): {body}")]
    InvalidJson { status: u16, body: String },
}

/// HTTP verbs used by the platform's APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request. `url` is absolute: base URL joined with the path.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, base_url: &str, path: &str) -> Self {
        Self {
            method,
            url: join_url(base_url, path),
            bearer: None,
            body: None,
        }
    }

    pub fn get(base_url: &str, path: &str) -> Self {
        Self::new(Method::Get, base_url, path)
    }

    pub fn post(base_url: &str, path: &str) -> Self {
        Self::new(Method::Post, base_url, path)
    }

    pub fn put(base_url: &str, path: &str) -> Self {
        Self::new(Method::Put, base_url, path)
    }

    pub fn patch(base_url: &str, path: &str) -> Self {
        Self::new(Method::Patch, base_url, path)
    }

    pub fn delete(base_url: &str, path: &str) -> Self {
        Self::new(Method::Delete, base_url, path)
    }

    /// Append percent-encoded query parameters.
    pub fn query(mut self, pairs: &[(&str, &str)]) -> Self {
        match reqwest::Url::parse(&self.url) {
            Ok(mut url) => {
                url.query_pairs_mut().extend_pairs(pairs.iter());
                self.url = url.to_string();
            }
            Err(e) => log::warn!("Cannot add query to {}: {}", self.url, e),
        }
        self
    }

    /// Authorize with `token`. An empty token sends no Authorization header.
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Attach a JSON body. Serialization of plain serde structs cannot fail in
    /// practice; if it does the request is sent without a body and the service
    /// rejects it, which is what a test wants to see anyway.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => log::warn!("Dropping unserializable request body: {}", e),
        }
        self
    }
}

/// Status code plus raw body text, exactly as the service returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, TransportError> {
        serde_json::from_str(&self.body).map_err(|_| TransportError::InvalidJson {
            status: self.status,
            body: self.body.clone(),
        })
    }

    /// Parse the body as JSON, falling back to `{"error": <text>}` for bodies
    /// the service did not send as JSON (gateway errors, plain-text 401s).
    pub fn json_or_error_text(&self) -> Value {
        self.json()
            .unwrap_or_else(|_| serde_json::json!({ "error": self.body }))
    }

    /// Require a 2xx answer with a JSON body.
    pub fn success_json(&self) -> Result<Value, TransportError> {
        if !self.is_success() {
            return Err(TransportError::HttpStatus {
                status: self.status,
                body: self.body.clone(),
            });
        }
        self.json()
    }
}

/// Sends one request and returns whatever came back. Implementations must not
/// retry and must report any non-transport outcome (including 4xx/5xx) as an
/// `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
