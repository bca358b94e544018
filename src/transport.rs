//! HTTP transport seam and its reqwest implementation.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;

/// A fully prepared request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    /// Sent as the query string for GET and as a form body otherwise
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTP round trip.
///
/// Implementations report every HTTP status as a [`TransportResponse`];
/// only failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Settings handed to the default transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Keep idle connections around for reuse
    pub use_persistent_connections: bool,
    /// Accept self-signed certificates (sandbox hosts)
    pub accept_invalid_certs: bool,
}

/// [`Transport`] backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if !config.use_persistent_connections {
            builder = builder.pool_max_idle_per_host(0);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.http_client.request(request.method.clone(), &request.url);
        builder = if request.method == Method::GET {
            builder.query(&request.params)
        } else {
            builder.form(&request.params)
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!("Received {} ({} bytes)", status, body.len());

        Ok(TransportResponse { status, body })
    }
}
