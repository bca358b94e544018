//! Razorgator Pearl web service client implementation.

use crate::error::{RazorgatorError, Result};
use crate::request::{prepare_options, Options};
use crate::response::{classify, ensure_success, ApiResponse};
use crate::transport::{
    ReqwestTransport, Transport, TransportConfig, TransportRequest, TransportResponse,
};
use crate::types::ResultType;
use crate::{DEFAULT_API_VERSION, DEFAULT_BASE_URI, DEFAULT_USER_AGENT};
use bytes::Bytes;
use reqwest::Method;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Configuration for the Razorgator client
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RazorgatorConfig {
    /// API security token, found under "About API" in Pearl
    pub api_token: String,
    /// Web service version, used in the `/WebserviceV{version}.asmx/` prefix
    pub api_version: String,
    /// Scheme and host of the web service
    pub base_uri: String,
    /// Keep connections open between requests
    pub use_persistent_connections: bool,
    /// How structured responses are returned
    pub result_type: ResultType,
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl RazorgatorConfig {
    /// Default configuration with the given token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(RazorgatorError::config(
                "API token must be specified in a string",
            ));
        }
        Url::parse(&self.base_uri).map_err(|e| {
            RazorgatorError::config(format!("Invalid base URI '{}': {}", self.base_uri, e))
        })?;
        Ok(())
    }

    /// Settings for the default transport. The sandbox uses a self-signed
    /// certificate, so it is accepted for sandbox hosts only.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            user_agent: self.user_agent.clone(),
            timeout_seconds: self.timeout_seconds,
            use_persistent_connections: self.use_persistent_connections,
            accept_invalid_certs: self.base_uri.contains("sandbox"),
        }
    }
}

impl Default for RazorgatorConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            use_persistent_connections: true,
            result_type: ResultType::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl fmt::Debug for RazorgatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RazorgatorConfig")
            .field("api_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("base_uri", &self.base_uri)
            .field("use_persistent_connections", &self.use_persistent_connections)
            .field("result_type", &self.result_type)
            .field("user_agent", &self.user_agent)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Web service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    GetOrders,
    GetCompletedOrders,
    GetOrder,
    ConfirmOrder,
    ShipOrder,
    RejectOrder,
    GetAirbill,
    DownloadAirbill,
    GetPurchaseOrder,
}

impl Endpoint {
    /// Path segment after the API prefix
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::GetOrders => "GetOrders",
            Endpoint::GetCompletedOrders => "GetCompletedOrders",
            Endpoint::GetOrder => "GetOrder",
            Endpoint::ConfirmOrder => "ConfirmOrder",
            Endpoint::ShipOrder => "ShipOrder",
            Endpoint::RejectOrder => "RejectOrder",
            Endpoint::GetAirbill => "GetAirbill",
            Endpoint::DownloadAirbill => "DownloadAirbill",
            Endpoint::GetPurchaseOrder => "GetPurchaseOrder",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::ConfirmOrder | Endpoint::ShipOrder | Endpoint::RejectOrder => Method::POST,
            _ => Method::GET,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main Razorgator web service client
pub struct RazorgatorClient {
    /// HTTP transport
    transport: Arc<dyn Transport>,
    /// Client configuration
    config: RazorgatorConfig,
    /// `/WebserviceV{version}.asmx/`
    api_prefix: String,
}

impl RazorgatorClient {
    /// Create a new client with default configuration
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_config(RazorgatorConfig::new(api_token))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: RazorgatorConfig) -> Result<Self> {
        let config = Self::normalize(config)?;
        let transport = ReqwestTransport::new(&config.transport_config())?;
        Ok(Self::build(config, Arc::new(transport)))
    }

    /// Create a client that sends requests through a custom transport
    pub fn with_transport(config: RazorgatorConfig, transport: impl Transport + 'static) -> Result<Self> {
        let config = Self::normalize(config)?;
        Ok(Self::build(config, Arc::new(transport)))
    }

    fn normalize(mut config: RazorgatorConfig) -> Result<RazorgatorConfig> {
        config.validate()?;
        if config.api_version.trim().is_empty() {
            config.api_version = DEFAULT_API_VERSION.to_string();
        }
        Ok(config)
    }

    fn build(config: RazorgatorConfig, transport: Arc<dyn Transport>) -> Self {
        let api_prefix = format!("/WebserviceV{}.asmx/", config.api_version);
        Self {
            transport,
            config,
            api_prefix,
        }
    }

    pub fn config(&self) -> &RazorgatorConfig {
        &self.config
    }

    pub fn api_token(&self) -> &str {
        &self.config.api_token
    }

    pub fn result_type(&self) -> ResultType {
        self.config.result_type
    }

    /// Change how structured responses are returned
    pub fn set_result_type(&mut self, result_type: ResultType) {
        self.config.result_type = result_type;
    }

    /// Replace the HTTP transport
    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Arc::new(transport);
    }

    /// List orders. Defaults to `status=UNCONFIRMED`.
    pub async fn list_orders(&self, options: Options) -> Result<ApiResponse> {
        let defaults = Options::new().with("status", "UNCONFIRMED");
        self.structured(Endpoint::GetOrders, &defaults, &options).await
    }

    /// List completed orders
    pub async fn list_completed_orders(&self, options: Options) -> Result<ApiResponse> {
        self.structured(Endpoint::GetCompletedOrders, &Options::new(), &options)
            .await
    }

    /// Get a single order by id
    pub async fn show_order(&self, order_id: i64) -> Result<ApiResponse> {
        let options = Options::new().with("orderId", order_id);
        self.structured(Endpoint::GetOrder, &Options::new(), &options)
            .await
    }

    /// Accept (confirm) an order
    pub async fn accept_order(&self, order_id: i64, options: Options) -> Result<ApiResponse> {
        let options = options.with("orderId", order_id);
        self.structured(Endpoint::ConfirmOrder, &Options::new(), &options)
            .await
    }

    /// Mark an order as shipped
    pub async fn ship_order(&self, order_id: i64, options: Options) -> Result<ApiResponse> {
        let options = options.with("orderId", order_id);
        self.structured(Endpoint::ShipOrder, &Options::new(), &options)
            .await
    }

    /// Reject an order
    pub async fn reject_order(&self, order_id: i64, order_token: &str) -> Result<ApiResponse> {
        let options = Options::new()
            .with("orderId", order_id)
            .with("orderToken", order_token);
        self.structured(Endpoint::RejectOrder, &Options::new(), &options)
            .await
    }

    /// Get an airbill (base64 encoded) and its tracking number
    pub async fn get_airbill(
        &self,
        order_id: i64,
        order_token: &str,
        purchase_order_id: i64,
    ) -> Result<ApiResponse> {
        let options = document_options(order_id, order_token, purchase_order_id);
        self.structured(Endpoint::GetAirbill, &Options::new(), &options)
            .await
    }

    /// Download an airbill as a PDF file
    pub async fn download_airbill(
        &self,
        order_id: i64,
        order_token: &str,
        purchase_order_id: i64,
    ) -> Result<Bytes> {
        let options = document_options(order_id, order_token, purchase_order_id);
        self.download(Endpoint::DownloadAirbill, &options).await
    }

    /// Get a purchase order (base64 encoded) and its id
    pub async fn get_purchase_order(
        &self,
        purchase_order_id: i64,
        order_id: i64,
        order_token: &str,
    ) -> Result<ApiResponse> {
        let options = document_options(order_id, order_token, purchase_order_id);
        self.structured(Endpoint::GetPurchaseOrder, &Options::new(), &options)
            .await
    }

    /// Download a purchase order as a PDF file.
    ///
    /// The service delivers purchase order PDFs from the `DownloadAirbill`
    /// endpoint.
    pub async fn download_purchase_order(
        &self,
        purchase_order_id: i64,
        order_id: i64,
        order_token: &str,
    ) -> Result<Bytes> {
        let options = document_options(order_id, order_token, purchase_order_id);
        self.download(Endpoint::DownloadAirbill, &options).await
    }

    /// Build the full URL for an endpoint
    pub fn build_url(&self, endpoint: Endpoint) -> Result<String> {
        let base = Url::parse(&self.config.base_uri)?;
        let url = base.join(&format!("{}{}", self.api_prefix, endpoint.name()))?;
        Ok(url.to_string())
    }

    async fn structured(
        &self,
        endpoint: Endpoint,
        defaults: &Options,
        options: &Options,
    ) -> Result<ApiResponse> {
        let response = self.send(endpoint, defaults, options).await?;
        let parsed = classify(&response.body, response.status, self.config.result_type)?;
        info!(
            "{} returned {}",
            endpoint,
            match &parsed {
                ApiResponse::ResultSet(results) => format!("{} records", results.count()),
                ApiResponse::Xml(document) => format!("<{}>", document.root_name()),
            }
        );
        Ok(parsed)
    }

    async fn download(&self, endpoint: Endpoint, options: &Options) -> Result<Bytes> {
        let response = self.send(endpoint, &Options::new(), options).await?;
        ensure_success(response.status)?;
        info!("{} returned {} bytes", endpoint, response.body.len());
        Ok(response.body)
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        defaults: &Options,
        options: &Options,
    ) -> Result<TransportResponse> {
        let request = TransportRequest {
            method: endpoint.method(),
            url: self.build_url(endpoint)?,
            params: prepare_options(defaults, options, &self.config.api_token),
            headers: default_headers(&self.config.user_agent),
        };
        debug!(
            "Calling {} with {} parameters",
            endpoint,
            request.params.len()
        );
        self.transport.send(request).await
    }
}

fn document_options(order_id: i64, order_token: &str, purchase_order_id: i64) -> Options {
    Options::new()
        .with("orderId", order_id)
        .with("orderToken", order_token)
        .with("purchaseOrderId", purchase_order_id)
}

fn default_headers(user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), user_agent.to_string()),
        ("Accept".to_string(), "application/xml".to_string()),
    ]
}
