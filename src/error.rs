//! Error types for the Razorgator client library.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RazorgatorError>;

/// Comprehensive error type for all Razorgator API operations
#[derive(Error, Debug)]
pub enum RazorgatorError {
    /// Invalid or missing construction parameters
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The web service answered with a non-success status
    #[error("An error occurred sending request. Status code: {status}")]
    Request { status: u16 },

    /// Low-level XML reader errors
    #[error("XML parsing error: {0}")]
    XmlParsing(#[from] quick_xml::Error),

    /// The body was readable but is not a well-formed document
    #[error("Malformed XML: {message}")]
    MalformedXml { message: String },

    /// Cursor seek outside the bounds of a result set
    #[error("Illegal index '{index}' for result set of {count} records")]
    OutOfRange { index: i64, count: usize },

    /// Network or HTTP-related errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParsing(#[from] url::ParseError),
}

impl RazorgatorError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new malformed document error
    pub fn malformed_xml(message: impl Into<String>) -> Self {
        Self::MalformedXml {
            message: message.into(),
        }
    }

    /// HTTP status carried by a request error
    pub fn status(&self) -> Option<u16> {
        match self {
            RazorgatorError::Request { status } => Some(*status),
            RazorgatorError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the response body could not be parsed as XML
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            RazorgatorError::XmlParsing(_) | RazorgatorError::MalformedXml { .. }
        )
    }

    /// Check if this error was raised while building the client
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RazorgatorError::Config { .. } | RazorgatorError::UrlParsing(_)
        )
    }
}
