//! reqwest-backed transport
//!
//! One `reqwest::Client` is built per transport and reused across requests
//! (avoids a TLS handshake per poll attempt).

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .header("Content-Type", "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            log::debug!("Payload: {}", body);
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read body: {}", e)))?;

        log::info!("{}: {} -- {}", request.method.as_str(), request.url, status);
        log::debug!("Response: {}", body);

        Ok(ApiResponse { status, body })
    }
}
