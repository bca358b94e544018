//! Response classification.

use crate::error::{RazorgatorError, Result};
use crate::result_set::ResultSet;
use crate::types::ResultType;
use crate::xml::XmlDocument;
use tracing::{debug, warn};

/// Root element name that marks a list of orders
pub const ORDERS_ROOT: &str = "orders";

/// A structured response: either a result set or the document as received
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    ResultSet(ResultSet),
    Xml(XmlDocument),
}

impl ApiResponse {
    pub fn is_result_set(&self) -> bool {
        matches!(self, ApiResponse::ResultSet(_))
    }

    pub fn as_result_set(&self) -> Option<&ResultSet> {
        match self {
            ApiResponse::ResultSet(results) => Some(results),
            ApiResponse::Xml(_) => None,
        }
    }

    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            ApiResponse::ResultSet(results) => Some(results),
            ApiResponse::Xml(_) => None,
        }
    }

    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            ApiResponse::Xml(document) => Some(document),
            ApiResponse::ResultSet(_) => None,
        }
    }

    pub fn into_xml(self) -> Option<XmlDocument> {
        match self {
            ApiResponse::Xml(document) => Some(document),
            ApiResponse::ResultSet(_) => None,
        }
    }
}

/// Fail with a request error unless `status` is 2xx
pub fn ensure_success(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        warn!("Request failed with status {}", status);
        Err(RazorgatorError::Request { status })
    }
}

/// Turn a raw body into an [`ApiResponse`].
///
/// Non-2xx statuses fail before the body is looked at. In
/// [`ResultType::Xml`] mode the parsed document is always returned; in
/// [`ResultType::ResultSet`] mode an `<orders>` root (with or without a
/// namespace prefix) becomes a [`ResultSet`] and any other root is returned
/// as XML.
pub fn classify(body: &[u8], status: u16, result_type: ResultType) -> Result<ApiResponse> {
    ensure_success(status)?;

    let document = XmlDocument::from_bytes(body).map_err(|e| {
        warn!("Failed to parse XML response: {}", e);
        debug!("Response content: {}", String::from_utf8_lossy(body));
        e
    })?;

    match result_type {
        ResultType::Xml => Ok(ApiResponse::Xml(document)),
        ResultType::ResultSet if document.root().local_name() == ORDERS_ROOT => {
            Ok(ApiResponse::ResultSet(ResultSet::from_document(&document)))
        }
        ResultType::ResultSet => Ok(ApiResponse::Xml(document)),
    }
}
